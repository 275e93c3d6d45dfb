//! Aggregated views over mood logs, tasks and habits
//!
//! Produces the per-day series the insights screen plots and the short
//! summary handed to the delegate for a written insight.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::{Habit, JournalEntry, MoodLog, Task};

/// "All time" never plots more than this many days
pub const ALL_RANGE_MAX_DAYS: i64 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightRange {
    #[default]
    Week,
    Month,
    #[serde(rename = "90days")]
    NinetyDays,
    All,
}

impl InsightRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightRange::Week => "week",
            InsightRange::Month => "month",
            InsightRange::NinetyDays => "90days",
            InsightRange::All => "all",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "week" | "7" => Some(InsightRange::Week),
            "month" | "30" => Some(InsightRange::Month),
            "90days" | "90" => Some(InsightRange::NinetyDays),
            "all" => Some(InsightRange::All),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InsightRange::Week => "Last 7 Days",
            InsightRange::Month => "Last 30 Days",
            InsightRange::NinetyDays => "90 Days",
            InsightRange::All => "All Time",
        }
    }

    /// Number of days covered. `All` starts at the earliest record, with a
    /// one-week minimum and a cap of [`ALL_RANGE_MAX_DAYS`].
    pub fn span_days(&self, today: NaiveDate, earliest: Option<NaiveDate>) -> i64 {
        match self {
            InsightRange::Week => 7,
            InsightRange::Month => 30,
            InsightRange::NinetyDays => 90,
            InsightRange::All => earliest
                .map(|first| (today - first).num_days() + 1)
                .unwrap_or(7)
                .clamp(7, ALL_RANGE_MAX_DAYS),
        }
    }

    /// Consecutive days ending with `today`, oldest first
    pub fn days(&self, today: NaiveDate, earliest: Option<NaiveDate>) -> Vec<NaiveDate> {
        let span = self.span_days(today, earliest);
        (0..span)
            .rev()
            .map(|back| today - Duration::days(back))
            .collect()
    }
}

impl std::fmt::Display for InsightRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One plotted day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayPoint {
    pub date: NaiveDate,
    /// Value of the last mood logged that day, 0 if none
    pub mood: u8,
    /// Tasks completed plus habits done that day
    pub productivity: u32,
}

/// Build the daily mood and productivity series for `days`.
/// Mood logs are expected in insertion order. `local_date` maps stored
/// timestamps onto the same calendar as `days`.
pub fn daily_points<F>(
    days: &[NaiveDate],
    moods: &[MoodLog],
    tasks: &[Task],
    habits: &[Habit],
    local_date: F,
) -> Vec<DayPoint>
where
    F: Fn(DateTime<Utc>) -> NaiveDate,
{
    days.iter()
        .map(|&date| {
            let mood = moods
                .iter()
                .rev()
                .find(|log| local_date(log.date) == date)
                .map(|log| log.mood.value())
                .unwrap_or(0);

            let tasks_done = tasks
                .iter()
                .filter(|t| t.completed)
                .filter(|t| t.completed_at.is_some_and(|at| local_date(at) == date))
                .count();
            let habits_done = habits.iter().filter(|h| h.is_done_on(date)).count();

            DayPoint {
                date,
                mood,
                productivity: (tasks_done + habits_done) as u32,
            }
        })
        .collect()
}

/// Oldest date anything was recorded
pub fn earliest_record<F>(
    moods: &[MoodLog],
    tasks: &[Task],
    habits: &[Habit],
    entries: &[JournalEntry],
    local_date: F,
) -> Option<NaiveDate>
where
    F: Fn(DateTime<Utc>) -> NaiveDate,
{
    let mood_days = moods.iter().map(|m| local_date(m.date));
    let task_days = tasks.iter().filter_map(|t| t.completed_at.map(&local_date));
    let habit_days = habits.iter().filter_map(|h| h.completed_dates.first().copied());
    let entry_days = entries.iter().map(|e| local_date(e.date));

    mood_days
        .chain(task_days)
        .chain(habit_days)
        .chain(entry_days)
        .min()
}

/// Headline numbers, also fed to the delegate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightSummary {
    pub task_count: usize,
    pub tasks_completed: usize,
    /// Titles of habits with a running streak
    pub active_habits: Vec<String>,
    pub journal_count: usize,
    pub mood_count: usize,
    pub average_mood: Option<f32>,
}

impl InsightSummary {
    pub fn collect(
        moods: &[MoodLog],
        tasks: &[Task],
        habits: &[Habit],
        entries: &[JournalEntry],
    ) -> Self {
        let average_mood = if moods.is_empty() {
            None
        } else {
            let total: u32 = moods.iter().map(|m| m.mood.value() as u32).sum();
            Some(total as f32 / moods.len() as f32)
        };

        Self {
            task_count: tasks.len(),
            tasks_completed: tasks.iter().filter(|t| t.completed).count(),
            active_habits: habits
                .iter()
                .filter(|h| h.streak > 0)
                .map(|h| h.title.clone())
                .collect(),
            journal_count: entries.len(),
            mood_count: moods.len(),
            average_mood,
        }
    }

    /// Whether there is anything worth analyzing
    pub fn has_data(&self) -> bool {
        self.mood_count > 0 || self.task_count > 0 || self.journal_count > 0
    }

    /// One-line digest used in prompts
    pub fn describe(&self) -> String {
        format!(
            "Tasks Completed: {}, Active Habits: {}",
            self.tasks_completed,
            self.active_habits.join(", ")
        )
    }
}
