//! Progress calculations module
//!
//! Derives the presentation metrics shown on the dashboard: BMI category,
//! goal completion and the direction of weight change.
//!
//! All functions here are pure. Nothing is stored; every value is recomputed
//! from the current profile snapshot when it is needed.

use crate::gamification::XP_PER_LEVEL;
use crate::models::{FitnessGoal, UserProfile};
use serde::{Deserialize, Serialize};

/// Progress shown when the goal has no well-defined direction
///
/// The dashboard always draws a small sliver of the progress bar, so the
/// fallback is 5 rather than 0.
pub const DEFAULT_PROGRESS_PERCENT: f64 = 5.0;

/// Default daily hydration goal in ml
pub const DEFAULT_WATER_GOAL_ML: u32 = 2500;

// ============================================================================
// BMI Calculations
// ============================================================================

/// BMI category classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Get the BMI range for this category
    pub fn range(&self) -> (f64, f64) {
        match self {
            BmiCategory::Underweight => (0.0, 18.5),
            BmiCategory::Normal => (18.5, 25.0),
            BmiCategory::Overweight => (25.0, 30.0),
            BmiCategory::Obese => (30.0, f64::INFINITY),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

/// Derived BMI value; never persisted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiData {
    pub value: f64,
    pub category: BmiCategory,
}

impl BmiData {
    /// Value returned when the inputs do not give a finite BMI
    pub const FALLBACK: BmiData = BmiData {
        value: 0.0,
        category: BmiCategory::Normal,
    };

    /// False for the fallback and other non-physical values; callers must
    /// not display those as a measurement.
    pub fn is_measurement(&self) -> bool {
        self.value.is_finite() && self.value > 0.0
    }
}

/// Calculate BMI from weight and height
///
/// Formula: BMI = weight(kg) / height(m)²
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Classify a BMI value; each threshold is exclusive on the upper side
pub fn bmi_category(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Compute and classify BMI for a height/weight pair
pub fn classify_bmi(height_cm: f64, weight_kg: f64) -> BmiData {
    let value = calculate_bmi(weight_kg, height_cm);
    // NaN from text input, infinity from a zero height
    if !value.is_finite() {
        return BmiData::FALLBACK;
    }
    BmiData {
        value,
        category: bmi_category(value),
    }
}

/// Classify BMI from raw form text. Unparsable text counts as NaN.
pub fn classify_bmi_input(height_text: &str, weight_text: &str) -> BmiData {
    let parse = |s: &str| s.trim().parse::<f64>().unwrap_or(f64::NAN);
    classify_bmi(parse(height_text), parse(weight_text))
}

/// Calculate healthy weight range for a given height
///
/// Based on BMI 18.5-25 (normal range)
pub fn healthy_weight_range_kg(height_cm: f64) -> (f64, f64) {
    let height_m = height_cm / 100.0;
    let height_m_sq = height_m * height_m;
    (18.5 * height_m_sq, 25.0 * height_m_sq)
}

// ============================================================================
// Goal Progress
// ============================================================================

/// Direction of weight change since the profile was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightTrend {
    Down,
    Steady,
    Up,
}

/// Goal progress for the dashboard weight card
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    /// Current weight minus start weight
    pub weight_diff: f64,
    /// Current weight minus target weight (0 when not applicable)
    pub goal_diff: f64,
    pub progress_percent: f64,
    pub trend: WeightTrend,
}

/// Compute goal progress for a profile
///
/// Progress is only defined for directional goals whose target lies on the
/// correct side of the start weight; otherwise `default_percent` is used.
pub fn goal_progress(profile: &UserProfile, default_percent: f64) -> GoalProgress {
    let weight_diff = profile.weight_kg - profile.start_weight_kg;
    let target = profile.target();

    let goal_diff = match (profile.goal, target) {
        (FitnessGoal::Maintain, _) | (_, None) => 0.0,
        (_, Some(t)) => profile.weight_kg - t,
    };

    let progress_percent = match (profile.goal, target) {
        (FitnessGoal::LoseWeight, Some(t)) if t < profile.start_weight_kg => {
            let total = profile.start_weight_kg - t;
            let covered = profile.start_weight_kg - profile.weight_kg;
            clamp_percent(covered / total * 100.0)
        }
        (FitnessGoal::GainMuscle, Some(t)) if t > profile.start_weight_kg => {
            let total = t - profile.start_weight_kg;
            let covered = profile.weight_kg - profile.start_weight_kg;
            clamp_percent(covered / total * 100.0)
        }
        _ => default_percent,
    };

    let trend = if weight_diff < 0.0 {
        WeightTrend::Down
    } else if weight_diff > 0.0 {
        WeightTrend::Up
    } else {
        WeightTrend::Steady
    };

    GoalProgress {
        weight_diff,
        goal_diff,
        progress_percent,
        trend,
    }
}

fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

// ============================================================================
// Bars
// ============================================================================

/// Fill of the XP bar towards the next level
pub fn level_progress_percent(xp: u64) -> f64 {
    (xp % XP_PER_LEVEL) as f64 / XP_PER_LEVEL as f64 * 100.0
}

/// Fill of the hydration bar; the stored total may exceed the goal
pub fn water_progress_percent(current_ml: u32, goal_ml: u32) -> f64 {
    if goal_ml == 0 {
        return 0.0;
    }
    (current_ml as f64 / goal_ml as f64 * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityLevel, Gender};
    use proptest::prelude::*;
    use rstest::rstest;
    use std::collections::BTreeSet;

    fn profile(goal: FitnessGoal, start: f64, weight: f64, target: Option<f64>) -> UserProfile {
        UserProfile {
            name: "Alex".to_string(),
            age: 34,
            gender: Gender::Male,
            height_cm: 180.0,
            weight_kg: weight,
            start_weight_kg: start,
            target_weight_kg: target,
            activity_level: ActivityLevel::Moderate,
            goal,
            xp: 0,
            level: 1,
            badges: BTreeSet::new(),
            mood_logs: vec![],
        }
    }

    // =========================================================================
    // BMI Tests
    // =========================================================================

    #[test]
    fn test_bmi_calculation() {
        // 70kg, 175cm -> BMI ~22.86
        let bmi = classify_bmi(175.0, 70.0);
        assert!((bmi.value - 22.86).abs() < 0.1);
        assert_eq!(bmi.category, BmiCategory::Normal);
        assert!(bmi.is_measurement());
    }

    #[rstest]
    #[case(18.49, BmiCategory::Underweight)]
    #[case(18.5, BmiCategory::Normal)]
    #[case(24.99, BmiCategory::Normal)]
    #[case(25.0, BmiCategory::Overweight)]
    #[case(29.99, BmiCategory::Overweight)]
    #[case(30.0, BmiCategory::Obese)]
    fn test_bmi_thresholds(#[case] bmi: f64, #[case] expected: BmiCategory) {
        assert_eq!(bmi_category(bmi), expected);
    }

    #[test]
    fn test_exact_threshold_from_measurements() {
        // 100 cm height makes BMI equal to the weight
        assert_eq!(classify_bmi(100.0, 18.5).category, BmiCategory::Normal);
        assert_eq!(classify_bmi(100.0, 25.0).category, BmiCategory::Overweight);
        assert_eq!(classify_bmi(100.0, 30.0).category, BmiCategory::Obese);
    }

    #[test]
    fn test_non_numeric_input_falls_back() {
        let bmi = classify_bmi_input("abc", "70");
        assert_eq!(bmi, BmiData::FALLBACK);
        assert!(!bmi.is_measurement());

        let bmi = classify_bmi(0.0, 0.0);
        assert_eq!(bmi.category, BmiCategory::Normal);
        assert_eq!(bmi.value, 0.0);
    }

    #[test]
    fn test_zero_height_falls_back() {
        let bmi = classify_bmi(0.0, 70.0);
        assert_eq!(bmi, BmiData::FALLBACK);
        assert!(!bmi.is_measurement());
        assert_eq!(classify_bmi_input("0", "70"), BmiData::FALLBACK);
    }

    #[test]
    fn test_form_text_is_parsed() {
        let bmi = classify_bmi_input(" 200 ", "100");
        assert_eq!(bmi.value, 25.0);
        assert_eq!(bmi.category, BmiCategory::Overweight);
    }

    #[test]
    fn test_healthy_weight_range() {
        // For 175cm, healthy range should be ~56.7-76.6 kg
        let (min, max) = healthy_weight_range_kg(175.0);
        assert!((min - 56.7).abs() < 0.5);
        assert!((max - 76.6).abs() < 0.5);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: Heavier weight = higher BMI (same height)
        #[test]
        fn prop_bmi_increases_with_weight(
            weight1 in 50.0f64..100.0,
            weight2 in 100.0f64..150.0,
            height in 150.0f64..200.0
        ) {
            let bmi1 = classify_bmi(height, weight1);
            let bmi2 = classify_bmi(height, weight2);
            prop_assert!(bmi2.value > bmi1.value);
        }

        /// Property: Category range contains the classified value
        #[test]
        fn prop_category_range_contains_value(weight in 30.0f64..200.0, height in 120.0f64..220.0) {
            let bmi = classify_bmi(height, weight);
            let (low, high) = bmi.category.range();
            prop_assert!(bmi.value >= low && bmi.value < high);
        }
    }

    // =========================================================================
    // Goal Progress Tests
    // =========================================================================

    #[test]
    fn test_weight_loss_halfway() {
        let p = profile(FitnessGoal::LoseWeight, 82.0, 80.0, Some(78.0));
        let progress = goal_progress(&p, DEFAULT_PROGRESS_PERCENT);
        assert!((progress.progress_percent - 50.0).abs() < 1e-9);
        assert_eq!(progress.weight_diff, -2.0);
        assert_eq!(progress.goal_diff, 2.0);
        assert_eq!(progress.trend, WeightTrend::Down);
    }

    #[test]
    fn test_maintain_uses_default() {
        for weight in [60.0, 75.0, 90.0] {
            let p = profile(FitnessGoal::Maintain, 75.0, weight, Some(70.0));
            let progress = goal_progress(&p, DEFAULT_PROGRESS_PERCENT);
            assert_eq!(progress.progress_percent, 5.0);
            assert_eq!(progress.goal_diff, 0.0);
        }
    }

    #[test]
    fn test_muscle_gain_progress() {
        let p = profile(FitnessGoal::GainMuscle, 70.0, 73.0, Some(76.0));
        let progress = goal_progress(&p, DEFAULT_PROGRESS_PERCENT);
        assert!((progress.progress_percent - 50.0).abs() < 1e-9);
        assert_eq!(progress.trend, WeightTrend::Up);
    }

    #[test]
    fn test_target_on_wrong_side_uses_default() {
        // Losing weight with a target above the start weight
        let p = profile(FitnessGoal::LoseWeight, 70.0, 69.0, Some(75.0));
        assert_eq!(goal_progress(&p, 5.0).progress_percent, 5.0);

        // Gaining with a target below the start weight
        let p = profile(FitnessGoal::GainMuscle, 70.0, 69.0, Some(65.0));
        assert_eq!(goal_progress(&p, 5.0).progress_percent, 5.0);
    }

    #[test]
    fn test_progress_is_clamped() {
        // Overshot the target
        let p = profile(FitnessGoal::LoseWeight, 82.0, 70.0, Some(78.0));
        assert_eq!(goal_progress(&p, 5.0).progress_percent, 100.0);

        // Moved away from the target
        let p = profile(FitnessGoal::LoseWeight, 82.0, 85.0, Some(78.0));
        assert_eq!(goal_progress(&p, 5.0).progress_percent, 0.0);
    }

    #[test]
    fn test_missing_target() {
        let p = profile(FitnessGoal::LoseWeight, 82.0, 80.0, None);
        let progress = goal_progress(&p, DEFAULT_PROGRESS_PERCENT);
        assert_eq!(progress.goal_diff, 0.0);
        assert_eq!(progress.progress_percent, DEFAULT_PROGRESS_PERCENT);
    }

    #[test]
    fn test_endurance_goal_uses_caller_default() {
        let p = profile(FitnessGoal::ImproveEndurance, 70.0, 70.0, Some(68.0));
        let progress = goal_progress(&p, 12.0);
        assert_eq!(progress.progress_percent, 12.0);
        assert_eq!(progress.goal_diff, 2.0);
        assert_eq!(progress.trend, WeightTrend::Steady);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: Progress always stays within 0-100
        #[test]
        fn prop_progress_bounded(
            start in 50.0f64..150.0,
            weight in 40.0f64..160.0,
            target in 40.0f64..160.0
        ) {
            let p = profile(FitnessGoal::LoseWeight, start, weight, Some(target));
            let progress = goal_progress(&p, DEFAULT_PROGRESS_PERCENT);
            prop_assert!((0.0..=100.0).contains(&progress.progress_percent));
        }
    }

    // =========================================================================
    // Bar Tests
    // =========================================================================

    #[test]
    fn test_level_bar() {
        assert_eq!(level_progress_percent(0), 0.0);
        assert_eq!(level_progress_percent(250), 50.0);
        assert_eq!(level_progress_percent(510), 2.0);
    }

    #[test]
    fn test_water_bar_caps_at_full() {
        assert_eq!(water_progress_percent(1250, 2500), 50.0);
        assert_eq!(water_progress_percent(4000, 2500), 100.0);
        assert_eq!(water_progress_percent(100, 0), 0.0);
    }
}
