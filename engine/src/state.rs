//! Application state owned by the controller
//!
//! Everything the UI renders lives here. Session-scoped parts (workout
//! ledger, hydration, chat, notification) are dropped whenever the signed-in
//! user changes; the profile is the only part that is persisted.

use crate::auth::Session;
use crate::services::{ActivityLedger, HydrationTracker};
use chrono::{DateTime, NaiveDate, Utc};
use vitality_shared::{AppView, ChatMessage, Notification, UserProfile};

/// Which top-level screen the UI should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Auth,
    Onboarding { suggested_name: String },
    App { view: AppView },
}

/// Identifies the state an asynchronous request was started from
///
/// A reply is applied only if no navigation or session change happened
/// since the token was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    epoch: u64,
    user_id: String,
}

/// A notification together with the instant it was shown
#[derive(Debug, Clone, PartialEq)]
pub struct ShownNotification {
    pub notification: Notification,
    pub shown_at: DateTime<Utc>,
}

impl ShownNotification {
    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        now < self.shown_at + self.notification.visible_for
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub session: Option<Session>,
    pub profile: Option<UserProfile>,
    pub view: AppView,
    pub dark_mode: bool,
    pub ledger: ActivityLedger,
    pub hydration: HydrationTracker,
    /// Everything the last action announced, in event order
    pub notifications: Vec<ShownNotification>,
    pub advice: Option<String>,
    pub chat: Vec<ChatMessage>,
    epoch: u64,
}

impl AppState {
    pub fn new(water_goal_ml: u32, today: NaiveDate) -> Self {
        Self {
            session: None,
            profile: None,
            view: AppView::default(),
            dark_mode: false,
            ledger: ActivityLedger::new(),
            hydration: HydrationTracker::new(water_goal_ml, today),
            notifications: Vec::new(),
            advice: None,
            chat: Vec::new(),
            epoch: 0,
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.user_id.as_str())
    }

    /// Invalidate every outstanding request token
    pub fn bump_epoch(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    pub fn issue_token(&self) -> Option<RequestToken> {
        self.user_id().map(|user_id| RequestToken {
            epoch: self.epoch,
            user_id: user_id.to_string(),
        })
    }

    pub fn is_current(&self, token: &RequestToken) -> bool {
        token.epoch == self.epoch && self.user_id() == Some(token.user_id.as_str())
    }

    /// Drop everything that belongs to the previous user
    pub fn clear_session_data(&mut self, today: NaiveDate) {
        self.profile = None;
        self.view = AppView::default();
        self.ledger = ActivityLedger::new();
        self.hydration = HydrationTracker::new(self.hydration.goal_ml(), today);
        self.notifications.clear();
        self.advice = None;
        self.chat.clear();
    }
}
