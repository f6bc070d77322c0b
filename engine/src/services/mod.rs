//! Stateful domain services
//!
//! Each service owns one slice of session state and knows which XP award
//! its events earn; the controller applies the awards.

pub mod activity;
pub mod hydration;
pub mod mood;

pub use activity::{ActivityLedger, LoggedWorkout, BASELINE_PASSIVE_KCAL};
pub use hydration::HydrationTracker;
pub use mood::MoodJournal;
