//! Input validation functions
//!
//! Plain validators for single values plus `validator` derive checks on
//! [`NewProfileInput`]. Every check returns a short message fit for inline
//! display.

use crate::types::{NewProfileInput, NewWorkout};
use once_cell::sync::Lazy;
use regex_lite::Regex;
use validator::{Validate, ValidationErrors};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Largest single water addition accepted, in ml
pub const MAX_WATER_ADDITION_ML: u32 = 10_000;

/// Longest loggable workout: one day
pub const MAX_WORKOUT_MINUTES: u32 = 1440;

pub const MAX_WORKOUT_CALORIES: u32 = 50_000;

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

// ============================================================================
// Body metrics
// ============================================================================

/// Validate height value (in cm)
pub fn validate_height_cm(height_cm: f64) -> Result<(), String> {
    if !height_cm.is_finite() {
        return Err("Height must be a valid number".to_string());
    }
    if height_cm < 50.0 {
        return Err("Height must be at least 50 cm".to_string());
    }
    if height_cm > 300.0 {
        return Err("Height must be at most 300 cm".to_string());
    }
    Ok(())
}

/// Validate weight value (in kg)
pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
    if !weight_kg.is_finite() {
        return Err("Weight must be a valid number".to_string());
    }
    if weight_kg < 20.0 {
        return Err("Weight must be at least 20 kg".to_string());
    }
    if weight_kg > 500.0 {
        return Err("Weight must be at most 500 kg".to_string());
    }
    Ok(())
}

/// Validate an optional target weight; zero means "no target"
pub fn validate_target_weight(target_kg: Option<f64>) -> Result<(), String> {
    match target_kg {
        None => Ok(()),
        Some(t) if t == 0.0 => Ok(()),
        Some(t) => validate_weight(t).map_err(|e| format!("Target {}", e.to_lowercase())),
    }
}

// ============================================================================
// Activity
// ============================================================================

/// Validate duration in minutes
pub fn validate_duration_minutes(minutes: u32) -> Result<(), String> {
    if minutes > MAX_WORKOUT_MINUTES {
        return Err("Duration cannot exceed 24 hours".to_string());
    }
    Ok(())
}

/// Validate calorie value
pub fn validate_calories(calories: u32) -> Result<(), String> {
    if calories > MAX_WORKOUT_CALORIES {
        return Err("Calorie value unreasonably high".to_string());
    }
    Ok(())
}

pub fn validate_workout(workout: &NewWorkout) -> Result<(), String> {
    if workout.workout_type.trim().is_empty() {
        return Err("Workout type cannot be empty".to_string());
    }
    validate_duration_minutes(workout.duration_minutes)?;
    validate_calories(workout.calories_burned)
}

/// Validate a single water addition
pub fn validate_water_amount(amount_ml: u32) -> Result<(), String> {
    if amount_ml == 0 {
        return Err("Water amount must be positive".to_string());
    }
    if amount_ml > MAX_WATER_ADDITION_ML {
        return Err("Water amount cannot exceed 10000 ml".to_string());
    }
    Ok(())
}

// ============================================================================
// Profile
// ============================================================================

/// Flatten derive errors into one message, ordered by field name
pub fn describe_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                (field.clone(), message)
            })
        })
        .collect();
    fields.sort();
    fields
        .into_iter()
        .map(|(_, message)| message)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Full onboarding check: derive rules plus the finiteness checks they miss
pub fn validate_new_profile(input: &NewProfileInput) -> Result<(), String> {
    if input.name.trim().is_empty() {
        return Err("Name cannot be empty".to_string());
    }
    input.validate().map_err(|e| describe_errors(&e))?;
    validate_height_cm(input.height_cm)?;
    validate_weight(input.weight_kg)?;
    validate_target_weight(input.target_weight_kg)
}

/// Validate an edit of height and weight from the profile screen
pub fn validate_body_metrics(height_cm: f64, weight_kg: f64) -> Result<(), String> {
    validate_height_cm(height_cm)?;
    validate_weight(weight_kg)
}
