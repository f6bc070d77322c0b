//! Application controller
//!
//! [`AppController`] owns the [`AppState`] and is the only component that
//! talks to the identity provider, the key-value store and the advisor.
//! Every UI event maps to one method; each method validates, updates state,
//! applies XP and persists the profile.

use crate::advisor::Advisor;
use crate::auth::{IdentityProvider, Session};
use crate::config::AppConfig;
use crate::error::{EngineError, EngineResult};
use crate::repositories::{KeyValueStore, ProfileStore, THEME_KEY};
use crate::services::{ActivityLedger, MoodJournal};
use crate::state::{AppState, RequestToken, Screen, ShownNotification};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, Timelike, Utc};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use vitality_shared::validation::{validate_body_metrics, validate_new_profile};
use vitality_shared::{
    classify_bmi, goal_progress, level_progress_percent, AppView, BmiData, ChatMessage,
    DashboardSnapshot, GamificationEngine, GamificationEvent, Mood, NewProfileInput, NewWorkout,
    Notification, NotificationKind, StorageError, UserProfile, WorkoutLogEntry, XpAward,
    DEFAULT_PROGRESS_PERCENT,
};

/// Source of the current local time
pub type Clock = Arc<dyn Fn() -> DateTime<FixedOffset> + Send + Sync>;

/// Number of workouts shown on the dashboard
const RECENT_WORKOUTS: usize = 5;

/// Value of an operation together with the gamification events it produced
#[derive(Debug, Clone, PartialEq)]
pub struct Awarded<T> {
    pub value: T,
    pub events: Vec<GamificationEvent>,
}

impl<T> Awarded<T> {
    /// New level, if the operation crossed a level boundary
    pub fn leveled_up(&self) -> Option<u32> {
        self.events.iter().find_map(|e| match e {
            GamificationEvent::LevelUp { level } => Some(*level),
            _ => None,
        })
    }
}

/// Pending advice request
#[derive(Debug, Clone)]
pub struct AdviceRequest {
    pub token: RequestToken,
    profile: UserProfile,
    bmi: BmiData,
}

impl AdviceRequest {
    pub async fn run(self, advisor: &Advisor) -> AdviceReply {
        let text = advisor.advice(&self.profile, &self.bmi).await;
        AdviceReply {
            token: self.token,
            text,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdviceReply {
    pub token: RequestToken,
    pub text: String,
}

/// Pending chat turn; `history` excludes the new message
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub token: RequestToken,
    history: Vec<ChatMessage>,
    message: String,
}

impl ChatRequest {
    pub async fn run(self, advisor: &Advisor) -> ChatReply {
        let text = advisor.chat(&self.history, &self.message).await;
        ChatReply {
            token: self.token,
            text,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatReply {
    pub token: RequestToken,
    pub text: String,
}

pub struct AppController {
    config: AppConfig,
    store: Arc<dyn KeyValueStore>,
    identity: Arc<dyn IdentityProvider>,
    advisor: Advisor,
    session_rx: watch::Receiver<Option<Session>>,
    clock: Clock,
    state: AppState,
}

impl AppController {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn KeyValueStore>,
        identity: Arc<dyn IdentityProvider>,
        advisor: Advisor,
    ) -> Self {
        Self::with_clock(config, store, identity, advisor, Arc::new(|| Local::now().fixed_offset()))
    }

    pub fn with_clock(
        config: AppConfig,
        store: Arc<dyn KeyValueStore>,
        identity: Arc<dyn IdentityProvider>,
        advisor: Advisor,
        clock: Clock,
    ) -> Self {
        let session_rx = identity.subscribe();
        let today = clock().date_naive();
        let state = AppState::new(config.hydration.daily_goal_ml, today);
        Self {
            config,
            store,
            identity,
            advisor,
            session_rx,
            clock,
            state,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn advisor(&self) -> &Advisor {
        &self.advisor
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        (self.clock)()
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Screen implied by the current state
    pub fn screen(&self) -> Screen {
        match (&self.state.session, &self.state.profile) {
            (None, _) => Screen::Auth,
            (Some(session), None) => Screen::Onboarding {
                suggested_name: session.suggested_name(),
            },
            (Some(_), Some(_)) => Screen::App {
                view: self.state.view,
            },
        }
    }

    // ========================================================================
    // Session lifecycle
    // ========================================================================

    /// Read the theme preference and the current session, then load the profile
    pub async fn start(&mut self) -> EngineResult<Screen> {
        self.state.dark_mode = self.read_theme().await;
        let session = self.session_rx.borrow_and_update().clone();
        self.handle_session_change(session).await
    }

    /// Apply a session change reported by the identity provider
    pub async fn handle_session_change(&mut self, session: Option<Session>) -> EngineResult<Screen> {
        let previous = self.state.user_id().map(str::to_string);
        let next = session.as_ref().map(|s| s.user_id.clone());

        self.state.bump_epoch();
        if previous != next {
            let today = self.today();
            self.state.clear_session_data(today);
        }
        self.state.session = session;

        let Some(user_id) = next else {
            if let Some(previous) = previous {
                info!(user_id = %previous, "Session ended");
            }
            return Ok(Screen::Auth);
        };

        if previous.as_deref() != Some(user_id.as_str()) || self.state.profile.is_none() {
            info!(user_id = %user_id, "Session started");
            let profile = ProfileStore::load(self.store.as_ref(), &user_id).await?;
            if let Some(profile) = profile {
                self.seed_chat(&profile.name);
                self.state.profile = Some(profile);
            }
        }

        Ok(self.screen())
    }

    /// Pick up a session change made outside this controller
    pub async fn sync_session(&mut self) -> EngineResult<Option<Screen>> {
        if !self.session_rx.has_changed().unwrap_or(false) {
            return Ok(None);
        }
        let session = self.session_rx.borrow_and_update().clone();
        self.handle_session_change(session).await.map(Some)
    }

    pub async fn sign_up(&mut self, email: &str, password: &str) -> EngineResult<Screen> {
        let session = self.identity.sign_up(email, password).await?;
        self.session_rx.borrow_and_update();
        self.handle_session_change(Some(session)).await
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> EngineResult<Screen> {
        let session = self.identity.sign_in(email, password).await?;
        self.session_rx.borrow_and_update();
        self.handle_session_change(Some(session)).await
    }

    pub async fn sign_out(&mut self) -> EngineResult<Screen> {
        self.identity.sign_out().await?;
        self.session_rx.borrow_and_update();
        self.handle_session_change(None).await
    }

    // ========================================================================
    // Profile
    // ========================================================================

    /// Create the profile, grant the onboarding bonus and persist it
    pub async fn complete_onboarding(&mut self, input: NewProfileInput) -> EngineResult<Screen> {
        self.require_session()?;
        validate_new_profile(&input).map_err(EngineError::Validation)?;

        let profile = GamificationEngine::onboarding_bonus(input.into_profile());
        info!(
            user_id = self.state.user_id().unwrap_or_default(),
            xp = profile.xp,
            "Onboarding complete"
        );

        self.seed_chat(&profile.name);
        self.publish(Notification::new(
            format!("Welcome, {}!", profile.name),
            NotificationKind::Success,
        ));
        self.state.view = AppView::Dashboard;
        self.state.profile = Some(profile);
        self.persist_profile().await?;

        Ok(self.screen())
    }

    /// Update height and weight; start weight is left untouched
    pub async fn update_body_metrics(
        &mut self,
        height_cm: f64,
        weight_kg: f64,
    ) -> EngineResult<Awarded<BmiData>> {
        validate_body_metrics(height_cm, weight_kg).map_err(EngineError::Validation)?;
        let profile = self.require_profile()?;

        self.state.profile = Some(profile.with_body_metrics(height_cm, weight_kg));
        let events = self.award(XpAward::body_metrics());
        self.persist_profile().await?;

        Ok(Awarded {
            value: classify_bmi(height_cm, weight_kg),
            events,
        })
    }

    /// Delete the stored profile and return to onboarding
    pub async fn reset_profile(&mut self) -> EngineResult<Screen> {
        let user_id = self.require_session()?.user_id.clone();

        let store = self.store.clone();
        self.persist_with_retries("profile reset", || {
            ProfileStore::reset(store.as_ref(), &user_id)
        })
        .await?;

        info!(user_id = %user_id, "Profile reset");
        self.state.bump_epoch();
        let today = self.today();
        let session = self.state.session.take();
        self.state.clear_session_data(today);
        self.state.session = session;

        Ok(self.screen())
    }

    // ========================================================================
    // Tracking
    // ========================================================================

    pub async fn log_workout(&mut self, workout: NewWorkout) -> EngineResult<Awarded<WorkoutLogEntry>> {
        self.require_session()?;
        let at = self.now().with_timezone(&Utc);
        let logged = self.state.ledger.add_workout(workout, at)?;
        debug!(
            workout_type = %logged.entry.workout_type,
            calories = logged.entry.calories_burned,
            "Workout logged"
        );

        let events = self.award(logged.award);
        self.persist_profile().await?;
        Ok(Awarded {
            value: logged.entry,
            events,
        })
    }

    /// Log one of the quick-add presets (0-based)
    pub async fn log_quick_workout(&mut self, index: usize) -> EngineResult<Awarded<WorkoutLogEntry>> {
        let workout = ActivityLedger::quick_workout(index)?;
        self.log_workout(workout).await
    }

    pub async fn log_library_workout(&mut self, id: &str) -> EngineResult<Awarded<WorkoutLogEntry>> {
        let workout = ActivityLedger::library_workout(id)?;
        self.log_workout(workout).await
    }

    /// Add water and return today's total
    pub async fn add_water(&mut self, amount_ml: u32) -> EngineResult<Awarded<u32>> {
        self.require_session()?;
        let today = self.today();
        let total = self.state.hydration.add_water(amount_ml, today)?;
        debug!(amount_ml, total_ml = total, "Water added");

        let events = self.award(XpAward::water());
        self.persist_profile().await?;
        Ok(Awarded {
            value: total,
            events,
        })
    }

    /// Record today's mood; every selection earns XP, including repeats
    pub async fn select_mood(&mut self, mood: Mood) -> EngineResult<Awarded<Mood>> {
        let profile = self.require_profile()?;
        let today = self.today();

        self.state.profile = Some(MoodJournal::set_mood(profile, mood, today));
        let events = self.award(XpAward::mood());
        self.persist_profile().await?;
        Ok(Awarded {
            value: mood,
            events,
        })
    }

    // ========================================================================
    // Navigation and preferences
    // ========================================================================

    /// Switch view; replies to requests started on the old view are dropped
    pub fn navigate(&mut self, view: AppView) -> Screen {
        self.state.bump_epoch();
        self.state.view = view;
        debug!(view = ?view, "Navigated");
        self.screen()
    }

    /// Flip dark mode and persist the preference
    pub async fn toggle_theme(&mut self) -> EngineResult<bool> {
        self.state.dark_mode = !self.state.dark_mode;
        let value = if self.state.dark_mode { "dark" } else { "light" };

        let store = self.store.clone();
        self.persist_with_retries("theme", || store.set(THEME_KEY, value.to_string()))
            .await?;
        Ok(self.state.dark_mode)
    }

    async fn read_theme(&self) -> bool {
        match self.store.get(THEME_KEY).await {
            Ok(value) => value.as_deref() == Some("dark"),
            Err(e) => {
                warn!("Could not read theme preference: {}", e);
                false
            }
        }
    }

    // ========================================================================
    // Advisor
    // ========================================================================

    pub fn begin_advice(&mut self) -> EngineResult<AdviceRequest> {
        let profile = self.require_profile()?.clone();
        let token = self.state.issue_token().ok_or(EngineError::NoSession)?;
        let bmi = classify_bmi(profile.height_cm, profile.weight_kg);
        self.state.advice = None;
        Ok(AdviceRequest { token, profile, bmi })
    }

    /// Store an advice reply; returns false if it arrived too late
    pub fn apply_advice(&mut self, reply: AdviceReply) -> bool {
        if !self.state.is_current(&reply.token) {
            debug!("Discarding stale advice reply");
            return false;
        }
        self.state.advice = Some(reply.text);
        true
    }

    pub fn begin_chat(&mut self, message: &str) -> EngineResult<ChatRequest> {
        let message = message.trim();
        if message.is_empty() {
            return Err(EngineError::Validation("Message cannot be empty".to_string()));
        }
        self.require_profile()?;
        let token = self.state.issue_token().ok_or(EngineError::NoSession)?;

        let history = self.state.chat.clone();
        self.state.chat.push(ChatMessage::user(message));
        Ok(ChatRequest {
            token,
            history,
            message: message.to_string(),
        })
    }

    /// Append a chat reply; returns false if it arrived too late
    pub fn apply_chat(&mut self, reply: ChatReply) -> bool {
        if !self.state.is_current(&reply.token) {
            debug!("Discarding stale chat reply");
            return false;
        }
        self.state.chat.push(ChatMessage::model(reply.text));
        true
    }

    /// Request advice and apply the reply
    pub async fn request_advice(&mut self) -> EngineResult<Option<String>> {
        let request = self.begin_advice()?;
        let reply = request.run(&self.advisor).await;
        let text = reply.text.clone();
        Ok(self.apply_advice(reply).then_some(text))
    }

    /// Send a chat message and apply the reply
    pub async fn send_chat(&mut self, message: &str) -> EngineResult<Option<String>> {
        let request = self.begin_chat(message)?;
        let reply = request.run(&self.advisor).await;
        let text = reply.text.clone();
        Ok(self.apply_chat(reply).then_some(text))
    }

    // ========================================================================
    // Read models
    // ========================================================================

    pub fn dashboard(&mut self, now: DateTime<FixedOffset>) -> EngineResult<DashboardSnapshot> {
        let profile = self.require_profile()?.clone();
        let water_ml = self.state.hydration.total_on(now.date_naive());

        Ok(DashboardSnapshot {
            greeting: greeting_for(now).to_string(),
            name: profile.name.clone(),
            view: self.state.view,
            level: profile.level,
            xp: profile.xp,
            level_progress_percent: level_progress_percent(profile.xp),
            badges: profile.badges.iter().cloned().collect(),
            bmi: classify_bmi(profile.height_cm, profile.weight_kg),
            goal: profile.goal,
            goal_progress: goal_progress(&profile, DEFAULT_PROGRESS_PERCENT),
            target_weight_kg: profile.target(),
            total_calories_today: self.state.ledger.total_calories_today(),
            water_ml,
            water_goal_ml: self.state.hydration.goal_ml(),
            water_percent: self.state.hydration.progress_percent(),
            today_mood: MoodJournal::mood_on(&profile, now.date_naive()),
            recent_workouts: self
                .state
                .ledger
                .recent_first()
                .into_iter()
                .take(RECENT_WORKOUTS)
                .collect(),
        })
    }

    /// Notifications still inside their display window; a level-up follows
    /// the XP notification of the same award
    pub fn visible_notifications(&self, now: DateTime<Utc>) -> Vec<&Notification> {
        self.state
            .notifications
            .iter()
            .filter(|shown| shown.is_visible(now))
            .map(|shown| &shown.notification)
            .collect()
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn require_session(&self) -> EngineResult<&Session> {
        self.state.session.as_ref().ok_or(EngineError::NoSession)
    }

    fn require_profile(&self) -> EngineResult<&UserProfile> {
        self.require_session()?;
        self.state.profile.as_ref().ok_or(EngineError::NoProfile)
    }

    fn seed_chat(&mut self, name: &str) {
        self.state.chat = vec![Advisor::greeting(name)];
    }

    fn publish(&mut self, notification: Notification) {
        self.publish_all(vec![notification]);
    }

    /// Replace whatever is on screen with this batch
    fn publish_all(&mut self, notifications: Vec<Notification>) {
        let shown_at = self.now().with_timezone(&Utc);
        self.state.notifications = notifications
            .into_iter()
            .map(|notification| ShownNotification {
                notification,
                shown_at,
            })
            .collect();
    }

    /// Apply an award to the loaded profile; a no-op without one
    fn award(&mut self, award: XpAward) -> Vec<GamificationEvent> {
        let Some(outcome) = GamificationEngine::award_xp(self.state.profile.as_ref(), award) else {
            debug!(amount = award.amount, "No profile loaded, award skipped");
            return Vec::new();
        };

        debug!(amount = award.amount, source = ?award.source, xp = outcome.profile.xp, "XP awarded");
        if let Some(level) = outcome.leveled_up() {
            info!(level, "Level up");
        }
        self.publish_all(outcome.events.iter().map(GamificationEvent::notification).collect());

        self.state.profile = Some(outcome.profile);
        outcome.events
    }

    async fn persist_profile(&self) -> EngineResult<()> {
        let (Some(user_id), Some(profile)) = (self.state.user_id(), self.state.profile.as_ref())
        else {
            return Ok(());
        };
        let store = self.store.clone();
        self.persist_with_retries("profile", || ProfileStore::save(store.as_ref(), user_id, profile))
            .await
    }

    /// Run a write, retrying up to `storage.persist_retries` extra times
    async fn persist_with_retries<F, Fut>(&self, what: &str, mut write: F) -> EngineResult<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), StorageError>>,
    {
        let retries = self.config.storage.persist_retries;
        let mut attempt = 0;
        loop {
            match write().await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < retries => {
                    attempt += 1;
                    let backoff = retry_backoff(self.config.storage.retry_backoff_ms, attempt);
                    warn!(
                        attempt,
                        retries,
                        backoff_ms = backoff.as_millis() as u64,
                        "Failed to persist {}: {}",
                        what,
                        e
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    error!(attempts = attempt + 1, "Giving up persisting {}: {}", what, e);
                    return Err(e.into());
                }
            }
        }
    }
}

/// Exponential backoff before retry `attempt` (1-based): base, 2x base, 4x base, ...
fn retry_backoff(base_ms: u64, attempt: u32) -> std::time::Duration {
    let factor = 1u64 << attempt.saturating_sub(1).min(10);
    std::time::Duration::from_millis(base_ms.saturating_mul(factor))
}

/// Time-of-day greeting
pub fn greeting_for(now: DateTime<FixedOffset>) -> &'static str {
    match now.hour() {
        0..=11 => "Good Morning",
        12..=17 => "Good Afternoon",
        _ => "Good Evening",
    }
}
