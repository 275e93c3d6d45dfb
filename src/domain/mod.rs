//! Core domain types for Lumen
//!
//! Field names serialize in camelCase so stored snapshots keep the layout the
//! web client wrote.

mod chat;
mod goal;
mod habit;
mod journal;
mod settings;
mod task;
mod time_of_day;

pub use chat::{ChatMessage, ChatRole, PlanProposal, ProposedTask};
pub use goal::{Goal, GoalStatus};
pub use habit::{
    Habit, HabitKind, HabitToggle, DEFAULT_HABIT_DURATION, DEFAULT_HABIT_PENALTY, DEFAULT_HABIT_XP,
};
pub use journal::{CheckInAnswer, JournalEntry, JournalKind, Mood, MoodLog, MAX_CHECK_IN_RATING};
pub use settings::{
    AppTheme, PersonaTone, QuoteCategory, ThemeColors, UserSettings, LIKED_QUOTES_LIMIT, PIN_LENGTH,
};
pub use task::{Priority, Recurrence, Task, TaskKind, DEFAULT_TASK_DURATION, DEFAULT_TASK_XP};
pub use time_of_day::{TimeOfDay, MINUTES_PER_DAY};

/// Generate a fresh entity identity
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
