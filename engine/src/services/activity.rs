//! Workout logging for the active session
//!
//! Provides:
//! - Append-only workout ledger with UUID entry ids
//! - Quick-add presets and library workouts as loggable entries
//! - Calorie aggregates (daily total with passive baseline, totals by day)

use crate::error::{EngineError, EngineResult};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;
use vitality_shared::catalog::{find_library_workout, QUICK_WORKOUTS};
use vitality_shared::validation::validate_workout;
use vitality_shared::{NewWorkout, WorkoutLogEntry, WorkoutOrigin, XpAward};

/// Passive burn added to the logged total on the dashboard
pub const BASELINE_PASSIVE_KCAL: u32 = 450;

/// A workout after it has been written to the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedWorkout {
    pub entry: WorkoutLogEntry,
    pub award: XpAward,
}

/// Session-scoped workout log
#[derive(Debug, Clone, Default)]
pub struct ActivityLedger {
    entries: Vec<WorkoutLogEntry>,
}

impl ActivityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a workout
    pub fn add_workout(&mut self, workout: NewWorkout, at: DateTime<Utc>) -> EngineResult<LoggedWorkout> {
        validate_workout(&workout).map_err(EngineError::Validation)?;

        let award = Self::award_for(workout.origin);
        let entry = WorkoutLogEntry {
            id: Uuid::new_v4().to_string(),
            workout_type: workout.workout_type.trim().to_string(),
            duration_minutes: workout.duration_minutes,
            calories_burned: workout.calories_burned,
            timestamp: at,
        };
        self.entries.push(entry.clone());

        Ok(LoggedWorkout { entry, award })
    }

    /// XP earned by a workout of the given origin
    pub fn award_for(origin: WorkoutOrigin) -> XpAward {
        match origin {
            WorkoutOrigin::Manual => XpAward::workout(),
            WorkoutOrigin::QuickAdd => XpAward::quick_workout(),
            WorkoutOrigin::Library { xp } => XpAward::library_workout(xp),
        }
    }

    /// Build the entry for a quick-add preset (0-based)
    pub fn quick_workout(index: usize) -> EngineResult<NewWorkout> {
        let preset = QUICK_WORKOUTS.get(index).ok_or_else(|| {
            EngineError::Validation(format!(
                "Quick workout must be between 1 and {}",
                QUICK_WORKOUTS.len()
            ))
        })?;
        Ok(NewWorkout {
            workout_type: preset.workout_type.to_string(),
            duration_minutes: preset.duration_minutes,
            calories_burned: preset.calories,
            origin: WorkoutOrigin::QuickAdd,
        })
    }

    /// Build the entry for a library workout; the log shows its title
    pub fn library_workout(id: &str) -> EngineResult<NewWorkout> {
        let workout = find_library_workout(id)
            .ok_or_else(|| EngineError::Validation(format!("Unknown library workout: {}", id)))?;
        Ok(NewWorkout {
            workout_type: workout.title.to_string(),
            duration_minutes: workout.duration_minutes,
            calories_burned: workout.calories,
            origin: WorkoutOrigin::Library { xp: workout.xp },
        })
    }

    /// Entries in the order they were logged
    pub fn entries(&self) -> &[WorkoutLogEntry] {
        &self.entries
    }

    /// Newest first, as the tracker lists them
    pub fn recent_first(&self) -> Vec<WorkoutLogEntry> {
        self.entries.iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every session entry plus the passive baseline
    pub fn total_calories_today(&self) -> u32 {
        self.entries
            .iter()
            .fold(BASELINE_PASSIVE_KCAL, |acc, e| acc.saturating_add(e.calories_burned))
    }

    /// Logged calories grouped by calendar date in `tz`
    pub fn calories_by_day<Tz: TimeZone>(&self, tz: &Tz) -> BTreeMap<NaiveDate, u32> {
        let mut totals = BTreeMap::new();
        for entry in &self.entries {
            let day = entry.timestamp.with_timezone(tz).date_naive();
            let total: &mut u32 = totals.entry(day).or_default();
            *total = total.saturating_add(entry.calories_burned);
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use vitality_shared::XpSource;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, h, 0, 0).unwrap()
    }

    #[test]
    fn test_add_workout_assigns_unique_ids() {
        let mut ledger = ActivityLedger::new();
        let a = ledger.add_workout(NewWorkout::manual("Swim", 30, 250), at(8)).unwrap();
        let b = ledger.add_workout(NewWorkout::manual("Swim", 30, 250), at(9)).unwrap();

        assert_ne!(a.entry.id, b.entry.id);
        assert_eq!(a.award, XpAward::workout());
        assert_eq!(ledger.entries().len(), 2);
        assert_eq!(ledger.recent_first()[0].id, b.entry.id);
    }

    #[test]
    fn test_total_includes_baseline() {
        let mut ledger = ActivityLedger::new();
        assert_eq!(ledger.total_calories_today(), 450);
        ledger.add_workout(NewWorkout::manual("Run", 30, 300), at(7)).unwrap();
        ledger.add_workout(NewWorkout::manual("Row", 20, 150), at(18)).unwrap();
        assert_eq!(ledger.total_calories_today(), 900);
    }

    #[test]
    fn test_invalid_workout_is_not_logged() {
        let mut ledger = ActivityLedger::new();
        let result = ledger.add_workout(NewWorkout::manual("Marathon", 2000, 3000), at(6));
        assert!(matches!(result, Err(EngineError::Validation(_))));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_quick_presets() {
        let cycling = ActivityLedger::quick_workout(1).unwrap();
        assert_eq!(cycling.workout_type, "Cycling");
        assert_eq!(cycling.duration_minutes, 45);
        assert_eq!(cycling.calories_burned, 400);
        assert_eq!(ActivityLedger::award_for(cycling.origin).amount, 50);
        assert!(ActivityLedger::quick_workout(3).is_err());
    }

    #[test]
    fn test_library_workout_uses_title_and_reward() {
        let mut ledger = ActivityLedger::new();
        let tabata = ActivityLedger::library_workout("w2").unwrap();
        let logged = ledger.add_workout(tabata, at(12)).unwrap();

        assert_eq!(logged.entry.workout_type, "Tabata Torch");
        assert_eq!(logged.entry.calories_burned, 280);
        assert_eq!(logged.award.amount, 80);
        assert_eq!(logged.award.source, XpSource::LibraryWorkout);
        assert!(ActivityLedger::library_workout("w0").is_err());
    }

    #[test]
    fn test_calories_by_day_uses_local_dates() {
        let mut ledger = ActivityLedger::new();
        ledger.add_workout(NewWorkout::manual("Run", 30, 300), at(1)).unwrap();
        ledger.add_workout(NewWorkout::manual("Lift", 40, 200), at(10)).unwrap();

        // UTC-5: 01:00Z falls on the previous local day
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let totals = ledger.calories_by_day(&tz);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&NaiveDate::from_ymd_opt(2026, 5, 3).unwrap()], 300);
        assert_eq!(totals[&NaiveDate::from_ymd_opt(2026, 5, 4).unwrap()], 200);

        let utc_totals = ledger.calories_by_day(&Utc);
        assert_eq!(utc_totals.len(), 1);
    }
}
