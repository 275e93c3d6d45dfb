use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, TimeOfDay};

/// Duration given to tasks that never had one set (minutes)
pub const DEFAULT_TASK_DURATION: u32 = 30;

/// XP granted by a task that never had an estimate
pub const DEFAULT_TASK_XP: u32 = 20;

/// How often a task repeats once completed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    /// Date of the next occurrence after `date` (None for one-off tasks).
    ///
    /// Monthly recurrence clamps to the last day of a shorter month.
    pub fn advance(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Recurrence::None => None,
            Recurrence::Daily => date.checked_add_days(Days::new(1)),
            Recurrence::Weekly => date.checked_add_days(Days::new(7)),
            Recurrence::Monthly => date.checked_add_months(Months::new(1)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::None => "none",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "once" => Some(Self::None),
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Todo items live on the timeline; affirmations are shown separately
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Affirmation,
    #[default]
    Todo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(rename = "type", default)]
    pub kind: TaskKind,
    /// Calendar day the task belongs to
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Present when the task is placed on the timeline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_time: Option<TimeOfDay>,
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub is_calendar_event: bool,
    #[serde(default = "default_xp")]
    pub xp_value: u32,
}

fn default_duration() -> u32 {
    DEFAULT_TASK_DURATION
}

fn default_xp() -> u32 {
    DEFAULT_TASK_XP
}

impl Task {
    /// A new, unscheduled todo for `date`
    pub fn new(text: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
            completed: false,
            completed_at: None,
            kind: TaskKind::Todo,
            date,
            due_date: None,
            due_time: None,
            duration: DEFAULT_TASK_DURATION,
            recurrence: Recurrence::None,
            priority: Priority::Medium,
            is_calendar_event: false,
            xp_value: DEFAULT_TASK_XP,
        }
    }

    /// XP granted on completion (a zero value falls back to the default)
    pub fn reward(&self) -> u32 {
        if self.xp_value == 0 {
            DEFAULT_TASK_XP
        } else {
            self.xp_value
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.due_time.is_some()
    }

    /// Fresh, uncompleted copy dated at the next recurrence
    pub fn next_occurrence(&self) -> Option<Task> {
        let date = self.recurrence.advance(self.date)?;
        Some(Task {
            id: new_id(),
            completed: false,
            completed_at: None,
            date,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_recurrence_advance() {
        assert_eq!(Recurrence::None.advance(date("2024-01-01")), None);
        assert_eq!(Recurrence::Daily.advance(date("2024-01-01")), Some(date("2024-01-02")));
        assert_eq!(Recurrence::Weekly.advance(date("2024-12-28")), Some(date("2025-01-04")));
        assert_eq!(Recurrence::Monthly.advance(date("2024-01-31")), Some(date("2024-02-29")));
    }

    #[test]
    fn test_next_occurrence_gets_fresh_identity() {
        let mut task = Task::new("Stretch", date("2024-01-01"));
        task.recurrence = Recurrence::Daily;
        task.completed = true;
        task.completed_at = Some(Utc::now());

        let next = task.next_occurrence().unwrap();
        assert_ne!(next.id, task.id);
        assert!(!next.completed);
        assert!(next.completed_at.is_none());
        assert_eq!(next.date, date("2024-01-02"));
        assert_eq!(next.recurrence, Recurrence::Daily);
        assert_eq!(next.text, "Stretch");
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let json = r#"{"id":"1","text":"Read","date":"2024-03-05"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.duration, DEFAULT_TASK_DURATION);
        assert_eq!(task.xp_value, DEFAULT_TASK_XP);
        assert_eq!(task.kind, TaskKind::Todo);
        assert_eq!(task.recurrence, Recurrence::None);
        assert!(!task.completed);
    }

    #[test]
    fn test_serialized_field_names() {
        let mut task = Task::new("Plan", date("2024-03-05"));
        task.due_time = TimeOfDay::parse("08:15");
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["type"], "todo");
        assert_eq!(value["dueTime"], "08:15");
        assert_eq!(value["xpValue"], 20);
        assert!(value.get("completedAt").is_none());
    }
}
