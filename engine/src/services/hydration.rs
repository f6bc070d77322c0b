//! Hydration tracking service
//!
//! Water intake accumulates for the current local day. The total starts
//! over the first time it is touched on a later date.

use crate::error::{EngineError, EngineResult};
use chrono::NaiveDate;
use tracing::debug;
use vitality_shared::validation::validate_water_amount;
use vitality_shared::water_progress_percent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydrationTracker {
    current_ml: u32,
    day: NaiveDate,
    goal_ml: u32,
}

impl HydrationTracker {
    pub fn new(goal_ml: u32, today: NaiveDate) -> Self {
        Self {
            current_ml: 0,
            day: today,
            goal_ml,
        }
    }

    /// Add water and return the new daily total
    ///
    /// The total is not capped at the goal; only the progress bar is.
    pub fn add_water(&mut self, amount_ml: u32, today: NaiveDate) -> EngineResult<u32> {
        validate_water_amount(amount_ml).map_err(EngineError::Validation)?;
        self.roll_over(today);
        self.current_ml = self.current_ml.saturating_add(amount_ml);
        Ok(self.current_ml)
    }

    /// Total for `today`
    pub fn total_on(&mut self, today: NaiveDate) -> u32 {
        self.roll_over(today);
        self.current_ml
    }

    /// Goal completion for display, 0-100
    pub fn progress_percent(&self) -> f64 {
        water_progress_percent(self.current_ml, self.goal_ml)
    }

    pub fn goal_ml(&self) -> u32 {
        self.goal_ml
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    fn roll_over(&mut self, today: NaiveDate) {
        if today > self.day {
            debug!(previous_day = %self.day, total_ml = self.current_ml, "Starting a new hydration day");
            self.current_ml = 0;
            self.day = today;
        }
    }
}
