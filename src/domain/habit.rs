use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{new_id, TimeOfDay};

/// Duration used when a scheduled habit has none (minutes)
pub const DEFAULT_HABIT_DURATION: u32 = 30;

/// XP per completion when none is given
pub const DEFAULT_HABIT_XP: u32 = 10;

/// XP lost on relapse when none is given
pub const DEFAULT_HABIT_PENALTY: u32 = 20;

/// Build habits are done; break habits are avoided and can relapse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitKind {
    #[default]
    Build,
    Break,
}

impl HabitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitKind::Build => "build",
            HabitKind::Break => "break",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "build" => Some(Self::Build),
            "break" => Some(Self::Break),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: HabitKind,
    #[serde(default)]
    pub completed_dates: BTreeSet<NaiveDate>,
    #[serde(default)]
    pub streak: u32,
    pub xp_value: u32,
    #[serde(default)]
    pub penalty_value: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

/// Outcome of toggling a habit for a day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HabitToggle {
    Completed,
    Undone,
}

impl Habit {
    pub fn new(title: impl Into<String>, kind: HabitKind, xp_value: u32, penalty_value: u32) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            kind,
            completed_dates: BTreeSet::new(),
            streak: 0,
            xp_value,
            penalty_value,
            time: None,
            duration: None,
        }
    }

    pub fn is_done_on(&self, day: NaiveDate) -> bool {
        self.completed_dates.contains(&day)
    }

    pub fn scheduled_duration(&self) -> u32 {
        self.duration.unwrap_or(DEFAULT_HABIT_DURATION)
    }

    /// Flip completion for `day`. Undoing only removes that day's entry and
    /// floors the streak at zero.
    pub fn toggle(&mut self, day: NaiveDate) -> HabitToggle {
        if self.completed_dates.remove(&day) {
            self.streak = self.streak.saturating_sub(1);
            HabitToggle::Undone
        } else {
            self.completed_dates.insert(day);
            self.streak += 1;
            HabitToggle::Completed
        }
    }

    /// Reset the streak after a relapse. Completion history is kept.
    pub fn relapse(&mut self) {
        self.streak = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_toggle_twice_is_inverse() {
        let mut habit = Habit::new("Meditate", HabitKind::Build, 15, 0);
        habit.completed_dates.insert(day("2024-05-01"));
        habit.streak = 3;
        let before = habit.clone();

        assert_eq!(habit.toggle(day("2024-05-02")), HabitToggle::Completed);
        assert_eq!(habit.streak, 4);
        assert_eq!(habit.toggle(day("2024-05-02")), HabitToggle::Undone);
        assert_eq!(habit, before);
    }

    #[test]
    fn test_undo_floors_streak_at_zero() {
        let mut habit = Habit::new("Walk", HabitKind::Build, 10, 0);
        habit.completed_dates.insert(day("2024-05-02"));
        habit.streak = 0;
        assert_eq!(habit.toggle(day("2024-05-02")), HabitToggle::Undone);
        assert_eq!(habit.streak, 0);
        assert!(habit.completed_dates.is_empty());
    }

    #[test]
    fn test_relapse_keeps_history() {
        let mut habit = Habit::new("No sugar", HabitKind::Break, 10, 30);
        habit.toggle(day("2024-05-01"));
        habit.toggle(day("2024-05-02"));
        habit.relapse();
        assert_eq!(habit.streak, 0);
        assert_eq!(habit.completed_dates.len(), 2);
    }

    #[test]
    fn test_deserialize_date_list() {
        let json = r#"{"id":"h1","title":"Read","type":"build","completedDates":["2024-01-02","2024-01-01"],"streak":2,"xpValue":10,"penaltyValue":0}"#;
        let habit: Habit = serde_json::from_str(json).unwrap();
        assert_eq!(habit.completed_dates.len(), 2);
        assert!(habit.is_done_on(day("2024-01-01")));
        assert_eq!(habit.scheduled_duration(), DEFAULT_HABIT_DURATION);
    }
}
