//! Tools the companion may call during a chat
//!
//! Calls arrive as a name plus loosely-typed JSON arguments and are turned
//! into a [`ToolCommand`] before anything acts on them.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::{PlanProposal, ProposedTask};

pub const PROPOSE_PLAN: &str = "propose_plan";
pub const ADD_GOAL: &str = "add_goal";

/// Title used when a plan arrives without one
pub const DEFAULT_PLAN_TITLE: &str = "Proposed Schedule";

/// A raw tool invocation from the model
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub name: String,
    pub args: Value,
}

/// A validated tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCommand {
    /// Show tasks for the user to approve; nothing is added yet
    ProposePlan(PlanProposal),
    /// Register a high-level goal
    AddGoal { title: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Tool not found")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArgs { tool: &'static str, message: String },
}

#[derive(Deserialize)]
struct ProposePlanArgs {
    #[serde(default)]
    title: Option<String>,
    tasks: Vec<ProposedTask>,
}

#[derive(Deserialize)]
struct AddGoalArgs {
    title: String,
}

impl TryFrom<&ToolCall> for ToolCommand {
    type Error = ToolError;

    fn try_from(call: &ToolCall) -> Result<Self, Self::Error> {
        match call.name.as_str() {
            PROPOSE_PLAN => {
                let args: ProposePlanArgs = serde_json::from_value(call.args.clone())
                    .map_err(|e| invalid(PROPOSE_PLAN, e.to_string()))?;
                let title = args
                    .title
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| DEFAULT_PLAN_TITLE.to_string());
                Ok(ToolCommand::ProposePlan(PlanProposal {
                    title,
                    tasks: args.tasks,
                }))
            }
            ADD_GOAL => {
                let args: AddGoalArgs = serde_json::from_value(call.args.clone())
                    .map_err(|e| invalid(ADD_GOAL, e.to_string()))?;
                let title = args.title.trim().to_string();
                if title.is_empty() {
                    return Err(invalid(ADD_GOAL, "title is empty".to_string()));
                }
                Ok(ToolCommand::AddGoal { title })
            }
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }
}

fn invalid(tool: &'static str, message: String) -> ToolError {
    ToolError::InvalidArgs { tool, message }
}

/// What executing a tool produced, echoed back into the chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    Plan(PlanProposal),
    GoalAdded { goal_id: String },
    Error { message: String },
}

impl ToolOutcome {
    pub fn to_json(&self) -> Value {
        match self {
            ToolOutcome::Plan(plan) => json!({ "result": "success", "plan": plan }),
            ToolOutcome::GoalAdded { goal_id } => {
                json!({ "result": "success", "goalId": goal_id, "name": ADD_GOAL })
            }
            ToolOutcome::Error { message } => json!({ "result": "error", "message": message }),
        }
    }
}

impl From<ToolError> for ToolOutcome {
    fn from(err: ToolError) -> Self {
        ToolOutcome::Error {
            message: err.to_string(),
        }
    }
}

/// Function declarations sent with every chat request
pub fn tool_declarations() -> Value {
    json!([{
        "functionDeclarations": [
            {
                "name": PROPOSE_PLAN,
                "description": "Propose a list of tasks/missions for the user to review and approve. Use this for goal breakdown or scheduling.",
                "parameters": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING", "description": "Title of this plan (e.g. 'Morning Routine', 'Goal Roadmap')" },
                        "tasks": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "text": { "type": "STRING", "description": "Task title" },
                                    "priority": { "type": "STRING", "enum": ["low", "medium", "high"] },
                                    "duration": { "type": "INTEGER", "description": "Duration in minutes" },
                                    "date": { "type": "STRING", "description": "YYYY-MM-DD" },
                                    "time": { "type": "STRING", "description": "HH:MM (Optional)" },
                                    "xp": { "type": "INTEGER", "description": "Suggested XP (10-100)" }
                                }
                            }
                        }
                    },
                    "required": ["tasks"]
                }
            },
            {
                "name": ADD_GOAL,
                "description": "Add a high-level goal or objective to the user's profile.",
                "parameters": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING", "description": "The high-level goal title (e.g., 'Learn React', 'Run a Marathon')" }
                    },
                    "required": ["title"]
                }
            }
        ]
    }])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: Value) -> ToolCall {
        ToolCall {
            name: name.to_string(),
            args,
        }
    }

    #[test]
    fn test_propose_plan_defaults_title() {
        let cmd = ToolCommand::try_from(&call(
            "propose_plan",
            json!({ "tasks": [{ "text": "Stretch", "time": "07:00", "xp": 15 }] }),
        ))
        .unwrap();
        let ToolCommand::ProposePlan(plan) = cmd else {
            panic!("expected a plan");
        };
        assert_eq!(plan.title, "Proposed Schedule");
        assert_eq!(plan.tasks.len(), 1);
        assert_eq!(plan.tasks[0].xp, Some(15));
    }

    #[test]
    fn test_add_goal_requires_title() {
        let cmd = ToolCommand::try_from(&call("add_goal", json!({ "title": " Run a marathon " }))).unwrap();
        assert_eq!(cmd, ToolCommand::AddGoal { title: "Run a marathon".to_string() });

        assert!(matches!(
            ToolCommand::try_from(&call("add_goal", json!({ "title": "" }))),
            Err(ToolError::InvalidArgs { tool: "add_goal", .. })
        ));
        assert!(ToolCommand::try_from(&call("add_goal", json!({}))).is_err());
    }

    #[test]
    fn test_unknown_tool_result() {
        let err = ToolCommand::try_from(&call("launch_rocket", json!({}))).unwrap_err();
        let outcome = ToolOutcome::from(err);
        assert!(matches!(outcome, ToolOutcome::Error { .. }));
        assert_eq!(
            outcome.to_json(),
            json!({ "result": "error", "message": "Tool not found" })
        );
    }

    #[test]
    fn test_declarations_cover_every_tool() {
        let decls = tool_declarations();
        let names: Vec<&str> = decls[0]["functionDeclarations"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|d| d["name"].as_str())
            .collect();
        assert_eq!(names, vec![PROPOSE_PLAN, ADD_GOAL]);
    }
}
