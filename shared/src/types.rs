//! Input and view types exchanged between the UI layer and the engine

use crate::health_metrics::{BmiData, GoalProgress};
use crate::models::{
    ActivityLevel, AppView, FitnessGoal, Gender, Mood, UserProfile, WorkoutLogEntry,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

// ============================================================================
// Onboarding
// ============================================================================

/// Data collected by the onboarding flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProfileInput {
    #[validate(length(min = 1, max = 60, message = "Name must be between 1 and 60 characters"))]
    pub name: String,

    #[validate(range(min = 1, max = 120, message = "Age must be between 1 and 120"))]
    pub age: u32,

    pub gender: Gender,

    #[validate(range(min = 50.0, max = 300.0, message = "Height must be between 50 and 300 cm"))]
    pub height_cm: f64,

    #[validate(range(min = 20.0, max = 500.0, message = "Weight must be between 20 and 500 kg"))]
    pub weight_kg: f64,

    /// `Some(0.0)` means no target; checked by `validate_target_weight`
    pub target_weight_kg: Option<f64>,

    pub activity_level: ActivityLevel,
    pub goal: FitnessGoal,
}

impl NewProfileInput {
    /// Build the initial profile; start weight is the entered weight
    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            name: self.name.trim().to_string(),
            age: self.age,
            gender: self.gender,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            start_weight_kg: self.weight_kg,
            target_weight_kg: self.target_weight_kg,
            activity_level: self.activity_level,
            goal: self.goal,
            xp: 0,
            level: 1,
            badges: BTreeSet::new(),
            mood_logs: Vec::new(),
        }
    }
}

// ============================================================================
// Workouts
// ============================================================================

/// Where a logged workout came from; decides its XP reward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "origin")]
pub enum WorkoutOrigin {
    Manual,
    QuickAdd,
    Library { xp: u64 },
}

/// A workout about to be logged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWorkout {
    #[serde(rename = "type")]
    pub workout_type: String,
    pub duration_minutes: u32,
    pub calories_burned: u32,
    pub origin: WorkoutOrigin,
}

impl NewWorkout {
    pub fn manual(workout_type: impl Into<String>, duration_minutes: u32, calories_burned: u32) -> Self {
        Self {
            workout_type: workout_type.into(),
            duration_minutes,
            calories_burned,
            origin: WorkoutOrigin::Manual,
        }
    }
}

// ============================================================================
// Advisor chat
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One turn of the coaching conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: ChatRole::User, text: text.into() }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self { role: ChatRole::Model, text: text.into() }
    }
}

// ============================================================================
// Dashboard
// ============================================================================

/// Everything the dashboard renders, derived from current state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub greeting: String,
    pub name: String,
    pub view: AppView,
    pub level: u32,
    pub xp: u64,
    /// Progress through the current level, 0-100
    pub level_progress_percent: f64,
    pub badges: Vec<String>,
    pub bmi: BmiData,
    pub goal: FitnessGoal,
    pub goal_progress: GoalProgress,
    pub target_weight_kg: Option<f64>,
    pub total_calories_today: u32,
    pub water_ml: u32,
    pub water_goal_ml: u32,
    pub water_percent: f64,
    pub today_mood: Option<Mood>,
    pub recent_workouts: Vec<WorkoutLogEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> NewProfileInput {
        NewProfileInput {
            name: "  Riley ".to_string(),
            age: 34,
            gender: Gender::Other,
            height_cm: 170.0,
            weight_kg: 72.5,
            target_weight_kg: Some(68.0),
            activity_level: ActivityLevel::Active,
            goal: FitnessGoal::LoseWeight,
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_fields_rejected() {
        let mut bad = input();
        bad.height_cm = 0.0;
        bad.age = 0;
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut bad = input();
        bad.name = String::new();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_into_profile_sets_start_weight() {
        let profile = input().into_profile();
        assert_eq!(profile.name, "Riley");
        assert_eq!(profile.start_weight_kg, 72.5);
        assert_eq!(profile.weight_kg, 72.5);
        assert_eq!(profile.xp, 0);
        assert_eq!(profile.level, 1);
        assert!(profile.badges.is_empty());
    }

    #[test]
    fn test_chat_roles_serialize_lowercase() {
        let json = serde_json::to_value(ChatMessage::model("hi")).unwrap();
        assert_eq!(json["role"], "model");
    }
}
