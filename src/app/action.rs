//! Every state mutation the app knows about

use chrono::NaiveDate;

use crate::domain::{
    ChatMessage, CheckInAnswer, GoalStatus, HabitKind, JournalKind, Mood, Priority, Recurrence,
    TaskKind, UserSettings,
};
use crate::schedule::ItemRef;

/// Input for a new task. Unset fields take the usual defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub text: String,
    pub kind: TaskKind,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    /// "HH:MM"; a task with a time lands on the timeline
    pub due_time: Option<String>,
    pub duration: Option<u32>,
    pub priority: Priority,
    pub recurrence: Recurrence,
    /// Defaults to the configured task reward
    pub xp_value: Option<u32>,
}

impl NewTask {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Input for a new habit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewHabit {
    pub title: String,
    pub kind: HabitKind,
    pub xp_value: Option<u32>,
    pub penalty_value: Option<u32>,
    pub time: Option<String>,
    pub duration: Option<u32>,
}

impl NewHabit {
    pub fn new(title: impl Into<String>, kind: HabitKind) -> Self {
        Self {
            title: title.into(),
            kind,
            ..Default::default()
        }
    }
}

/// Input for a journal entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewEntry {
    Free {
        content: String,
        prompt: Option<String>,
    },
    CheckIn {
        kind: JournalKind,
        answers: Vec<CheckInAnswer>,
    },
}

/// A closed set of state mutations, applied through
/// [`Controller::dispatch`](super::Controller::dispatch)
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddTask(NewTask),
    /// Toggle completion; completing a second time undoes the first
    CompleteTask { id: String },
    DeleteTask { id: String },

    /// Drop an item onto today's timeline at `start_minutes` past midnight
    ScheduleItem { item: ItemRef, start_minutes: i32 },
    ResizeItem { item: ItemRef, duration_minutes: i32 },
    UnscheduleItem { item: ItemRef },

    AddHabit(NewHabit),
    /// Toggle today's completion
    ToggleHabit { id: String },
    RelapseHabit { id: String },
    DeleteHabit { id: String },

    AddJournalEntry(NewEntry),
    DeleteJournalEntry { id: String },
    LogMood { mood: Mood, note: Option<String> },

    AddGoal { title: String },
    SetGoalStatus { id: String, status: GoalStatus },
    DeleteGoal { id: String },
    /// Register a goal and queue a chat message asking for a breakdown
    BreakdownGoal { title: String },

    AcceptPlan { message_id: String },
    AppendChatMessage(ChatMessage),
    ClearChat,

    UpdateSettings(Box<UserSettings>),
    LikeQuote { quote: String },
}

impl Action {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddTask(_) => "add_task",
            Action::CompleteTask { .. } => "complete_task",
            Action::DeleteTask { .. } => "delete_task",
            Action::ScheduleItem { .. } => "schedule_item",
            Action::ResizeItem { .. } => "resize_item",
            Action::UnscheduleItem { .. } => "unschedule_item",
            Action::AddHabit(_) => "add_habit",
            Action::ToggleHabit { .. } => "toggle_habit",
            Action::RelapseHabit { .. } => "relapse_habit",
            Action::DeleteHabit { .. } => "delete_habit",
            Action::AddJournalEntry(_) => "add_journal_entry",
            Action::DeleteJournalEntry { .. } => "delete_journal_entry",
            Action::LogMood { .. } => "log_mood",
            Action::AddGoal { .. } => "add_goal",
            Action::SetGoalStatus { .. } => "set_goal_status",
            Action::DeleteGoal { .. } => "delete_goal",
            Action::BreakdownGoal { .. } => "breakdown_goal",
            Action::AcceptPlan { .. } => "accept_plan",
            Action::AppendChatMessage(_) => "append_chat_message",
            Action::ClearChat => "clear_chat",
            Action::UpdateSettings(_) => "update_settings",
            Action::LikeQuote { .. } => "like_quote",
        }
    }
}
