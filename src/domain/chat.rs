use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::task::{Priority, Task, DEFAULT_TASK_DURATION, DEFAULT_TASK_XP};
use super::{new_id, TimeOfDay};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// A task suggested by the companion, pending user approval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedTask {
    pub text: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub duration: Option<u32>,
    /// `YYYY-MM-DD`, kept raw since it comes straight from the model
    #[serde(default)]
    pub date: Option<String>,
    /// `HH:MM`, kept raw for the same reason
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub xp: Option<u32>,
}

impl ProposedTask {
    /// Turn an approved proposal into a real task. Unparseable dates fall
    /// back to `today`; unparseable times leave the task in the inbox.
    pub fn into_task(self, today: NaiveDate) -> Task {
        let date = self
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
            .unwrap_or(today);

        let mut task = Task::new(self.text, date);
        task.priority = self.priority;
        task.duration = self.duration.filter(|d| *d > 0).unwrap_or(DEFAULT_TASK_DURATION);
        task.due_time = self.time.as_deref().and_then(TimeOfDay::parse);
        task.xp_value = self.xp.filter(|xp| *xp > 0).unwrap_or(DEFAULT_TASK_XP);
        task
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanProposal {
    pub title: String,
    pub tasks: Vec<ProposedTask>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    #[serde(default)]
    pub text: String,
    /// Kept as stored; Lumen itself never sets it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// JSON result returned to the model for a tool call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_proposal: Option<PlanProposal>,
    #[serde(default)]
    pub is_plan_accepted: bool,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_role(ChatRole::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::with_role(ChatRole::Model, text)
    }

    fn with_role(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            role,
            text: text.into(),
            tool_call_id: None,
            tool_response: None,
            plan_proposal: None,
            is_plan_accepted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proposed_task_defaults() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let proposal: ProposedTask =
            serde_json::from_str(r#"{"text":"Outline chapter 1","time":"late"}"#).unwrap();
        let task = proposal.into_task(today);
        assert_eq!(task.date, today);
        assert_eq!(task.duration, DEFAULT_TASK_DURATION);
        assert_eq!(task.xp_value, DEFAULT_TASK_XP);
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.due_time.is_none());
        assert!(!task.completed);
    }

    #[test]
    fn test_proposed_task_keeps_given_values() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let proposal = ProposedTask {
            text: "Run 5k".to_string(),
            priority: Priority::High,
            duration: Some(45),
            date: Some("2024-06-03".to_string()),
            time: Some("07:30".to_string()),
            xp: Some(60),
        };
        let task = proposal.into_task(today);
        assert_eq!(task.date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(task.due_time.map(|t| t.to_string()).as_deref(), Some("07:30"));
        assert_eq!(task.duration, 45);
        assert_eq!(task.xp_value, 60);
    }
}
