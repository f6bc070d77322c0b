//! Vitality Shared Library
//!
//! Pure domain code used by the engine and the WASM bindings: the profile
//! model, progress derivations, gamification rules, the workout catalog and
//! input validation.

pub mod catalog;
pub mod errors;
pub mod gamification;
pub mod health_metrics;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use gamification::{
    AwardOutcome, GamificationEngine, GamificationEvent, Notification, NotificationKind, XpAward,
    XpSource,
};
pub use health_metrics::*;
pub use models::*;
pub use types::*;
