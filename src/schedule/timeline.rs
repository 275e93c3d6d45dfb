//! Day view: timeline (items with a time of day) vs. inbox (items without)

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Habit, HabitKind, Priority, Recurrence, Task, TaskKind, TimeOfDay};

/// Identity of something that can sit on the timeline
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ItemRef {
    Task(String),
    Habit(String),
}

impl ItemRef {
    pub fn id(&self) -> &str {
        match self {
            ItemRef::Task(id) | ItemRef::Habit(id) => id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ItemRef::Task(_) => "task",
            ItemRef::Habit(_) => "habit",
        }
    }
}

/// What an item represents, for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Todo,
    HabitBuild,
    HabitBreak,
}

/// Tasks and habits flattened into one shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineItem {
    pub item: ItemRef,
    pub text: String,
    pub kind: ItemKind,
    pub completed: bool,
    pub time: Option<TimeOfDay>,
    pub duration: u32,
    pub priority: Priority,
    pub xp_value: u32,
}

impl TimelineItem {
    fn from_task(task: &Task) -> Self {
        Self {
            item: ItemRef::Task(task.id.clone()),
            text: task.text.clone(),
            kind: ItemKind::Todo,
            completed: task.completed,
            time: task.due_time,
            duration: task.duration,
            priority: task.priority,
            xp_value: task.reward(),
        }
    }

    fn from_habit(habit: &Habit, today: NaiveDate) -> Self {
        Self {
            item: ItemRef::Habit(habit.id.clone()),
            text: habit.title.clone(),
            kind: match habit.kind {
                HabitKind::Build => ItemKind::HabitBuild,
                HabitKind::Break => ItemKind::HabitBreak,
            },
            completed: habit.is_done_on(today),
            time: habit.time,
            duration: habit.scheduled_duration(),
            // habits always render as medium
            priority: Priority::Medium,
            xp_value: habit.xp_value,
        }
    }

    /// End of the slot in minutes past midnight (may run past 24:00)
    pub fn end_minutes(&self) -> Option<u32> {
        self.time.map(|t| t.minutes() as u32 + self.duration)
    }
}

/// Everything the tasks tab shows for one day
#[derive(Debug, Clone, Default, Serialize)]
pub struct DayView {
    pub date: Option<NaiveDate>,
    /// Scheduled items, sorted by start time
    pub timeline: Vec<TimelineItem>,
    /// Unscheduled items for today plus overdue open tasks
    pub inbox: Vec<TimelineItem>,
    /// Future or recurring todos
    pub upcoming: Vec<TimelineItem>,
}

impl DayView {
    /// Build the view for `today`.
    ///
    /// Timeline: todos dated today with a due time, and habits with a time.
    /// Inbox: todos dated today without a due time, earlier open todos
    /// without a due time, and habits without a time. Overlapping slots are
    /// kept as-is.
    pub fn build(tasks: &[Task], habits: &[Habit], today: NaiveDate) -> Self {
        let todos = || tasks.iter().filter(|t| t.kind == TaskKind::Todo);

        let mut timeline: Vec<TimelineItem> = todos()
            .filter(|t| t.date == today && t.due_time.is_some())
            .map(TimelineItem::from_task)
            .chain(
                habits
                    .iter()
                    .filter(|h| h.time.is_some())
                    .map(|h| TimelineItem::from_habit(h, today)),
            )
            .collect();
        // stable: tasks before habits at equal times
        timeline.sort_by_key(|item| item.time);

        let inbox = todos()
            .filter(|t| t.due_time.is_none())
            .filter(|t| t.date == today || (t.date < today && !t.completed))
            .map(TimelineItem::from_task)
            .chain(
                habits
                    .iter()
                    .filter(|h| h.time.is_none())
                    .map(|h| TimelineItem::from_habit(h, today)),
            )
            .collect();

        let upcoming = todos()
            .filter(|t| t.date > today || t.recurrence != Recurrence::None)
            .map(TimelineItem::from_task)
            .collect();

        Self {
            date: Some(today),
            timeline,
            inbox,
            upcoming,
        }
    }

    pub fn find(&self, item: &ItemRef) -> Option<&TimelineItem> {
        self.timeline
            .iter()
            .chain(self.inbox.iter())
            .find(|i| &i.item == item)
    }
}
