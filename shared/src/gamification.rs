//! Experience points and levels
//!
//! The engine is a small state machine over `(xp, level)`. Awards are pure:
//! they take a profile snapshot and return a new one together with the
//! events the UI should show.

use crate::models::UserProfile;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// XP needed per level
pub const XP_PER_LEVEL: u64 = 500;

/// Starting XP granted when a profile is created
pub const ONBOARDING_XP: u64 = 100;

/// Badge granted on profile creation
pub const NEWCOMER_BADGE: &str = "Newcomer";

/// XP for a manually logged or quick-add workout
pub const WORKOUT_XP: u64 = 50;

/// XP per water addition, regardless of amount
pub const WATER_XP: u64 = 5;

/// XP per mood check-in
pub const MOOD_XP: u64 = 10;

/// XP for updating height/weight
pub const BODY_METRICS_XP: u64 = 20;

/// How long an award notification stays visible
pub const NOTIFICATION_VISIBLE_SECS: i64 = 2;

/// What earned the XP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XpSource {
    Workout,
    QuickWorkout,
    LibraryWorkout,
    Water,
    Mood,
    BodyMetrics,
}

/// An XP award waiting to be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpAward {
    pub amount: u64,
    pub source: XpSource,
}

impl XpAward {
    pub fn workout() -> Self {
        Self { amount: WORKOUT_XP, source: XpSource::Workout }
    }

    pub fn quick_workout() -> Self {
        Self { amount: WORKOUT_XP, source: XpSource::QuickWorkout }
    }

    /// Library workouts carry their own reward
    pub fn library_workout(amount: u64) -> Self {
        Self { amount, source: XpSource::LibraryWorkout }
    }

    pub fn water() -> Self {
        Self { amount: WATER_XP, source: XpSource::Water }
    }

    pub fn mood() -> Self {
        Self { amount: MOOD_XP, source: XpSource::Mood }
    }

    pub fn body_metrics() -> Self {
        Self { amount: BODY_METRICS_XP, source: XpSource::BodyMetrics }
    }
}

/// Kind of transient notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Xp,
    LevelUp,
    Success,
}

/// Transient UI notification; never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub visible_for: Duration,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
            visible_for: Duration::seconds(NOTIFICATION_VISIBLE_SECS),
        }
    }
}

/// Events produced by an award
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GamificationEvent {
    XpGained { amount: u64, source: XpSource },
    LevelUp { level: u32 },
}

impl GamificationEvent {
    pub fn notification(&self) -> Notification {
        match self {
            GamificationEvent::XpGained { amount, .. } => {
                Notification::new(format!("+{} XP", amount), NotificationKind::Xp)
            }
            GamificationEvent::LevelUp { level } => Notification::new(
                format!("Level Up! You are now Level {}!", level),
                NotificationKind::LevelUp,
            ),
        }
    }
}

/// Result of applying an award
#[derive(Debug, Clone, PartialEq)]
pub struct AwardOutcome {
    pub profile: UserProfile,
    pub events: Vec<GamificationEvent>,
}

impl AwardOutcome {
    /// New level, if this award crossed a level boundary
    pub fn leveled_up(&self) -> Option<u32> {
        self.events.iter().find_map(|e| match e {
            GamificationEvent::LevelUp { level } => Some(*level),
            _ => None,
        })
    }
}

/// Gamification rules
pub struct GamificationEngine;

impl GamificationEngine {
    /// Level implied by an XP total: `floor(xp / 500) + 1`
    pub fn level_for_xp(xp: u64) -> u32 {
        (xp / XP_PER_LEVEL) as u32 + 1
    }

    /// Apply an award to a profile
    ///
    /// Returns `None` when there is no profile; awarding before onboarding is
    /// a silent no-op. A level-up adds exactly one level even when a single
    /// award crosses several 500-point boundaries.
    pub fn award_xp(profile: Option<&UserProfile>, award: XpAward) -> Option<AwardOutcome> {
        let profile = profile?;

        let new_xp = profile.xp.saturating_add(award.amount);
        let mut new_level = profile.level;
        let mut events = vec![GamificationEvent::XpGained {
            amount: award.amount,
            source: award.source,
        }];

        if new_xp / XP_PER_LEVEL > profile.xp / XP_PER_LEVEL {
            new_level = new_level.saturating_add(1);
            events.push(GamificationEvent::LevelUp { level: new_level });
        }

        Some(AwardOutcome {
            profile: UserProfile {
                xp: new_xp,
                level: new_level,
                ..profile.clone()
            },
            events,
        })
    }

    /// Starting bonus for a freshly created profile
    pub fn onboarding_bonus(profile: UserProfile) -> UserProfile {
        UserProfile {
            xp: ONBOARDING_XP,
            level: 1,
            badges: [NEWCOMER_BADGE.to_string()].into_iter().collect(),
            ..profile
        }
    }
}
