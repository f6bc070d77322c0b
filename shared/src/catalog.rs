//! Predefined workout library and quick-add presets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Difficulty tier of a library workout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A predefined workout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LibraryWorkout {
    pub id: &'static str,
    pub title: &'static str,
    #[serde(rename = "type")]
    pub workout_type: &'static str,
    pub duration_minutes: u32,
    pub calories: u32,
    pub difficulty: Difficulty,
    pub xp: u64,
    pub description: &'static str,
}

/// The ten library workouts, in display order
pub static WORKOUT_LIBRARY: [LibraryWorkout; 10] = [
    LibraryWorkout {
        id: "w1",
        title: "Morning Mobility Flow",
        workout_type: "Yoga",
        duration_minutes: 15,
        calories: 80,
        difficulty: Difficulty::Beginner,
        xp: 25,
        description: "Gentle stretching to wake up your joints and muscles.",
    },
    LibraryWorkout {
        id: "w2",
        title: "Tabata Torch",
        workout_type: "HIIT",
        duration_minutes: 20,
        calories: 280,
        difficulty: Difficulty::Advanced,
        xp: 80,
        description: "High-intensity intervals: 20s work, 10s rest. Maximum effort.",
    },
    LibraryWorkout {
        id: "w3",
        title: "Full Body Power",
        workout_type: "Strength",
        duration_minutes: 45,
        calories: 350,
        difficulty: Difficulty::Intermediate,
        xp: 60,
        description: "Compound movements targeting all major muscle groups.",
    },
    LibraryWorkout {
        id: "w4",
        title: "5K Tempo Run",
        workout_type: "Running",
        duration_minutes: 30,
        calories: 320,
        difficulty: Difficulty::Intermediate,
        xp: 70,
        description: "Steady state cardio at a challenging but sustainable pace.",
    },
    LibraryWorkout {
        id: "w5",
        title: "Core Crusher",
        workout_type: "Strength",
        duration_minutes: 12,
        calories: 90,
        difficulty: Difficulty::Intermediate,
        xp: 30,
        description: "Intense ab circuit focusing on stability and strength.",
    },
    LibraryWorkout {
        id: "w6",
        title: "Deep Sleep Stretch",
        workout_type: "Yoga",
        duration_minutes: 20,
        calories: 50,
        difficulty: Difficulty::Beginner,
        xp: 20,
        description: "Relaxing poses to calm the nervous system before bed.",
    },
    LibraryWorkout {
        id: "w7",
        title: "Leg Day Destruction",
        workout_type: "Strength",
        duration_minutes: 50,
        calories: 400,
        difficulty: Difficulty::Advanced,
        xp: 90,
        description: "Heavy squats, lunges, and deadlifts. Not for the faint of heart.",
    },
    LibraryWorkout {
        id: "w8",
        title: "Power Walk",
        workout_type: "Cardio",
        duration_minutes: 40,
        calories: 200,
        difficulty: Difficulty::Beginner,
        xp: 40,
        description: "Brisk walking to get the heart rate up without high impact.",
    },
    LibraryWorkout {
        id: "w9",
        title: "Jump Rope Skipping",
        workout_type: "Cardio",
        duration_minutes: 15,
        calories: 180,
        difficulty: Difficulty::Intermediate,
        xp: 45,
        description: "Great for coordination and cardiovascular endurance.",
    },
    LibraryWorkout {
        id: "w10",
        title: "Desk Detox",
        workout_type: "Mobility",
        duration_minutes: 5,
        calories: 20,
        difficulty: Difficulty::Beginner,
        xp: 10,
        description: "Quick stretches to counteract sitting all day.",
    },
];

/// Quick-add preset shown on the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickWorkout {
    #[serde(rename = "type")]
    pub workout_type: &'static str,
    pub duration_minutes: u32,
    pub calories: u32,
}

pub static QUICK_WORKOUTS: [QuickWorkout; 3] = [
    QuickWorkout { workout_type: "Running", duration_minutes: 30, calories: 300 },
    QuickWorkout { workout_type: "Cycling", duration_minutes: 45, calories: 400 },
    QuickWorkout { workout_type: "Yoga", duration_minutes: 20, calories: 100 },
];

// ============================================================================
// Library search
// ============================================================================

/// Library filter chip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LibraryFilter {
    #[default]
    All,
    /// Matches the workout type exactly ("HIIT", "Yoga", ...)
    Type(&'static str),
    Difficulty(Difficulty),
}

/// Workout types offered as filter chips
pub const LIBRARY_TYPES: [&str; 6] = ["HIIT", "Strength", "Yoga", "Cardio", "Running", "Mobility"];

impl LibraryFilter {
    pub fn matches(&self, workout: &LibraryWorkout) -> bool {
        match self {
            LibraryFilter::All => true,
            LibraryFilter::Type(t) => workout.workout_type == *t,
            LibraryFilter::Difficulty(d) => workout.difficulty == *d,
        }
    }
}

impl FromStr for LibraryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(LibraryFilter::All);
        }
        if let Some(t) = LIBRARY_TYPES.iter().find(|t| t.eq_ignore_ascii_case(s)) {
            return Ok(LibraryFilter::Type(*t));
        }
        [Difficulty::Beginner, Difficulty::Intermediate, Difficulty::Advanced]
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .map(LibraryFilter::Difficulty)
            .ok_or_else(|| format!("Unknown filter: {}", s))
    }
}

/// Search the library by title/type substring, combined with a filter
pub fn search_library(query: &str, filter: LibraryFilter) -> Vec<&'static LibraryWorkout> {
    let needle = query.to_lowercase();
    WORKOUT_LIBRARY
        .iter()
        .filter(|w| {
            w.title.to_lowercase().contains(&needle)
                || w.workout_type.to_lowercase().contains(&needle)
        })
        .filter(|w| filter.matches(w))
        .collect()
}

pub fn find_library_workout(id: &str) -> Option<&'static LibraryWorkout> {
    WORKOUT_LIBRARY.iter().find(|w| w.id == id)
}
