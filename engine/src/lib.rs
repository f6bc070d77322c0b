//! Vitality engine
//!
//! Gamification and progress-state engine for the Vitality fitness tracker.
//!
//! ## Architecture
//!
//! - Controller: owns application state and routes UI events
//! - Services: workout ledger, hydration and mood journal
//! - Repositories: key-value persistence and profile schema migrations
//! - Auth and advisor: identity and AI collaborators behind traits

pub mod advisor;
pub mod auth;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod repositories;
pub mod services;
pub mod state;

pub use controller::{AppController, Awarded};
pub use error::{EngineError, EngineResult};
pub use state::{AppState, Screen};
