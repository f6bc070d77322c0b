//! Data models for the Vitality engine

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Gender as entered during onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

/// Self-reported activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    #[default]
    Moderate,
    /// Hard exercise most days
    Active,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
        }
    }
}

/// Primary fitness goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    #[default]
    LoseWeight,
    Maintain,
    GainMuscle,
    ImproveEndurance,
}

impl FitnessGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitnessGoal::LoseWeight => "lose_weight",
            FitnessGoal::Maintain => "maintain",
            FitnessGoal::GainMuscle => "gain_muscle",
            FitnessGoal::ImproveEndurance => "improve_endurance",
        }
    }

    /// Human-readable label ("lose weight")
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

/// Daily mood check-in value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Great,
    Good,
    Neutral,
    Tired,
    Stressed,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Great,
        Mood::Good,
        Mood::Neutral,
        Mood::Tired,
        Mood::Stressed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Great => "great",
            Mood::Good => "good",
            Mood::Neutral => "neutral",
            Mood::Tired => "tired",
            Mood::Stressed => "stressed",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Mood::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| format!("Unknown mood: {}", s))
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            _ => Err(format!("Unknown activity level: {}", s)),
        }
    }
}

impl FromStr for FitnessGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "lose_weight" => Ok(FitnessGoal::LoseWeight),
            "maintain" => Ok(FitnessGoal::Maintain),
            "gain_muscle" => Ok(FitnessGoal::GainMuscle),
            "improve_endurance" => Ok(FitnessGoal::ImproveEndurance),
            _ => Err(format!("Unknown goal: {}", s)),
        }
    }
}

/// One mood check-in, keyed by calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub date: NaiveDate,
    pub mood: Mood,
}

/// Persisted user profile
///
/// Field names on the wire follow the web client's camelCase layout so that
/// records written by older clients keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    /// Height in centimeters
    #[serde(rename = "height")]
    pub height_cm: f64,
    /// Current weight in kilograms
    #[serde(rename = "weight")]
    pub weight_kg: f64,
    /// Weight at profile creation; never touched by later edits
    #[serde(rename = "startWeight")]
    pub start_weight_kg: f64,
    #[serde(rename = "targetWeight", default, skip_serializing_if = "Option::is_none")]
    pub target_weight_kg: Option<f64>,
    pub activity_level: ActivityLevel,
    pub goal: FitnessGoal,
    pub xp: u64,
    pub level: u32,
    pub badges: BTreeSet<String>,
    #[serde(default)]
    pub mood_logs: Vec<MoodEntry>,
}

impl UserProfile {
    /// Target weight, treating a zero target as "not set"
    pub fn target(&self) -> Option<f64> {
        self.target_weight_kg.filter(|t| *t > 0.0)
    }

    /// Copy of this profile with new body metrics; start weight is kept
    pub fn with_body_metrics(&self, height_cm: f64, weight_kg: f64) -> Self {
        Self {
            height_cm,
            weight_kg,
            ..self.clone()
        }
    }

    pub fn has_badge(&self, badge: &str) -> bool {
        self.badges.contains(badge)
    }
}

/// Workout entry held by the session ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutLogEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub workout_type: String,
    pub duration_minutes: u32,
    pub calories_burned: u32,
    pub timestamp: DateTime<Utc>,
}

/// Application views the controller can navigate between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum AppView {
    #[default]
    Dashboard,
    Tracker,
    Advisor,
    Profile,
}

impl FromStr for AppView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dashboard" => Ok(AppView::Dashboard),
            "tracker" => Ok(AppView::Tracker),
            "advisor" => Ok(AppView::Advisor),
            "profile" => Ok(AppView::Profile),
            _ => Err(format!("Unknown view: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> UserProfile {
        UserProfile {
            name: "Sam".to_string(),
            age: 30,
            gender: Gender::Other,
            height_cm: 175.0,
            weight_kg: 80.0,
            start_weight_kg: 82.0,
            target_weight_kg: Some(78.0),
            activity_level: ActivityLevel::Moderate,
            goal: FitnessGoal::LoseWeight,
            xp: 100,
            level: 1,
            badges: BTreeSet::from(["Newcomer".to_string()]),
            mood_logs: vec![],
        }
    }

    #[test]
    fn test_profile_uses_client_field_names() {
        let json = serde_json::to_value(sample_profile()).unwrap();
        assert_eq!(json["height"], 175.0);
        assert_eq!(json["startWeight"], 82.0);
        assert_eq!(json["targetWeight"], 78.0);
        assert_eq!(json["activityLevel"], "moderate");
        assert_eq!(json["goal"], "lose_weight");
        assert_eq!(json["moodLogs"], serde_json::json!([]));
    }

    #[test]
    fn test_body_metrics_keep_start_weight() {
        let updated = sample_profile().with_body_metrics(176.0, 75.0);
        assert_eq!(updated.weight_kg, 75.0);
        assert_eq!(updated.height_cm, 176.0);
        assert_eq!(updated.start_weight_kg, 82.0);
    }

    #[test]
    fn test_zero_target_is_unset() {
        let mut profile = sample_profile();
        profile.target_weight_kg = Some(0.0);
        assert_eq!(profile.target(), None);
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("Great".parse::<Mood>().unwrap(), Mood::Great);
        assert_eq!("gain muscle".parse::<FitnessGoal>().unwrap(), FitnessGoal::GainMuscle);
        assert_eq!("f".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("TRACKER".parse::<AppView>().unwrap(), AppView::Tracker);
        assert!("ecstatic".parse::<Mood>().is_err());
    }
}
