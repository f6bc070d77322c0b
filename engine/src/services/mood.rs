//! Daily mood check-ins

use chrono::{Local, NaiveDate};
use vitality_shared::{Mood, MoodEntry, UserProfile};

/// Mood journal stored on the profile, one entry per date
pub struct MoodJournal;

impl MoodJournal {
    /// Record `mood` for `date`, replacing an entry already made that day
    pub fn set_mood(profile: &UserProfile, mood: Mood, date: NaiveDate) -> UserProfile {
        let mut updated = profile.clone();
        match updated.mood_logs.iter_mut().find(|e| e.date == date) {
            Some(entry) => entry.mood = mood,
            None => updated.mood_logs.push(MoodEntry { date, mood }),
        }
        updated
    }

    pub fn set_today_mood(profile: &UserProfile, mood: Mood) -> UserProfile {
        Self::set_mood(profile, mood, Local::now().date_naive())
    }

    pub fn mood_on(profile: &UserProfile, date: NaiveDate) -> Option<Mood> {
        profile
            .mood_logs
            .iter()
            .find(|e| e.date == date)
            .map(|e| e.mood)
    }

    pub fn today_mood(profile: &UserProfile) -> Option<Mood> {
        Self::mood_on(profile, Local::now().date_naive())
    }
}
