//! Vitality WASM Module
//!
//! Browser bindings for the progress calculations, so the web client renders
//! the same numbers the engine computes.

use vitality_shared::{GamificationEngine, UserProfile, DEFAULT_PROGRESS_PERCENT};
use wasm_bindgen::prelude::*;

/// BMI value, or 0 when either input is not a usable measurement
#[wasm_bindgen]
pub fn bmi_value(height_cm: f64, weight_kg: f64) -> f64 {
    vitality_shared::classify_bmi(height_cm, weight_kg).value
}

/// BMI category label ("Underweight", "Normal", "Overweight" or "Obese")
#[wasm_bindgen]
pub fn bmi_category(height_cm: f64, weight_kg: f64) -> String {
    vitality_shared::classify_bmi(height_cm, weight_kg)
        .category
        .as_str()
        .to_string()
}

#[wasm_bindgen]
pub fn level_for_xp(xp: u32) -> u32 {
    GamificationEngine::level_for_xp(u64::from(xp))
}

/// Progress through the current level, 0-100
#[wasm_bindgen]
pub fn level_progress_percent(xp: u32) -> f64 {
    vitality_shared::level_progress_percent(u64::from(xp))
}

#[wasm_bindgen]
pub fn water_progress_percent(current_ml: u32, goal_ml: u32) -> f64 {
    vitality_shared::water_progress_percent(current_ml, goal_ml)
}

/// Goal completion for a stored profile record (camelCase JSON)
#[wasm_bindgen]
pub fn goal_progress_percent(profile_json: &str) -> Result<f64, JsValue> {
    goal_progress_from_json(profile_json).map_err(|e| JsValue::from_str(&e))
}

fn goal_progress_from_json(profile_json: &str) -> Result<f64, String> {
    let profile: UserProfile =
        serde_json::from_str(profile_json).map_err(|e| format!("Invalid profile: {}", e))?;
    Ok(vitality_shared::goal_progress(&profile, DEFAULT_PROGRESS_PERCENT).progress_percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_json(goal: &str, target: f64) -> String {
        format!(
            r#"{{"name":"Ana","age":30,"gender":"female","height":165.0,"weight":80.0,
                "startWeight":82.0,"targetWeight":{},"activityLevel":"light","goal":"{}",
                "xp":100,"level":1,"badges":["Newcomer"]}}"#,
            target, goal
        )
    }

    #[test]
    fn test_bmi() {
        assert!((bmi_value(175.0, 70.0) - 22.86).abs() < 0.01);
        assert_eq!(bmi_category(175.0, 70.0), "Normal");
        assert_eq!(bmi_value(0.0, 70.0), 0.0);
    }

    #[test]
    fn test_levels() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(499), 1);
        assert_eq!(level_for_xp(500), 2);
        assert_eq!(level_progress_percent(750), 50.0);
    }

    #[test]
    fn test_water_progress_caps_at_100() {
        assert_eq!(water_progress_percent(750, 2500), 30.0);
        assert_eq!(water_progress_percent(4000, 2500), 100.0);
    }

    #[test]
    fn test_goal_progress_from_json() {
        assert_eq!(goal_progress_from_json(&profile_json("lose_weight", 78.0)), Ok(50.0));
        assert_eq!(goal_progress_from_json(&profile_json("maintain", 78.0)), Ok(5.0));
        assert!(goal_progress_from_json("[]").is_err());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_invalid_profile_is_a_js_error() {
        let err = goal_progress_percent("not json").unwrap_err();
        assert!(err.as_string().unwrap().starts_with("Invalid profile"));
    }
}
