//! The AI companion ("Sophus")
//!
//! [`Delegate`] is the seam between the app and a language model. Calls are
//! blocking and never fail from the caller's point of view: implementations
//! absorb transport and parse errors and answer with the fixed fallbacks in
//! [`fallback`].
//!
//! - [`GeminiDelegate`] talks to the Gemini REST API
//! - [`OfflineDelegate`] answers with fallbacks only, used without an API key

pub mod fallback;
mod gemini;
mod offline;
mod parse;
pub mod prompts;
mod tools;

pub use gemini::{GeminiDelegate, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use offline::OfflineDelegate;
pub use parse::{parse_check_in_questions, parse_recommendations, parse_xp, MAX_XP, MIN_XP};
pub use tools::{
    tool_declarations, ToolCall, ToolCommand, ToolError, ToolOutcome, ADD_GOAL, DEFAULT_PLAN_TITLE,
    PROPOSE_PLAN,
};

use serde::{Deserialize, Serialize};

use crate::config::AssistantConfig;
use crate::domain::{
    ChatMessage, Habit, JournalEntry, JournalKind, MoodLog, PersonaTone, Priority, UserSettings,
    DEFAULT_TASK_XP,
};
use crate::insights::InsightSummary;

/// Who the companion is talking to and how
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub user_name: String,
    pub tone: PersonaTone,
    pub custom_prompt: Option<String>,
}

impl Persona {
    pub fn from_settings(settings: &UserSettings) -> Self {
        Self {
            user_name: settings.name.clone(),
            tone: settings.tone,
            custom_prompt: settings.custom_tone_prompt.clone(),
        }
    }
}

/// One piece of a streamed chat reply
#[derive(Debug, Clone, PartialEq)]
pub enum ChatChunk {
    Text(String),
    ToolCall(ToolCall),
}

/// A task suggestion for the inbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub text: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "default_recommendation_xp")]
    pub xp: u32,
}

fn default_recommendation_xp() -> u32 {
    DEFAULT_TASK_XP
}

/// Streamed chat reply
pub type ChatStream<'a> = Box<dyn Iterator<Item = ChatChunk> + Send + 'a>;

/// Capabilities the app asks of a language model
pub trait Delegate: Send + Sync {
    /// Short name for logs and `status` output
    fn name(&self) -> &'static str;

    /// One journaling prompt. `recent` is only shared when the user allows it.
    fn journal_prompt(&self, recent: &[JournalEntry], share_content: bool) -> String;

    /// A written insight over the aggregated numbers
    fn insight(&self, summary: &InsightSummary, persona: &Persona) -> String;

    /// XP for a task, always within [`MIN_XP`]..=[`MAX_XP`]
    fn estimate_xp(&self, description: &str, priority: Priority, duration: u32) -> u32;

    /// Suggested tasks given the current inbox load and habits
    fn recommend_tasks(&self, open_tasks: usize, habits: &[Habit], context: &str)
    -> Vec<Recommendation>;

    /// Reply to `message` given the prior `history`
    fn stream_chat(&self, history: &[ChatMessage], message: &str, persona: &Persona)
    -> ChatStream<'_>;

    /// Pattern read over recent mood logs
    fn mood_trend(&self, logs: &[MoodLog], user_name: &str) -> String;

    /// Quote of the day tuned by the user's quote preferences
    fn affirmation(&self, settings: &UserSettings) -> String;

    /// Three rating questions for a check-in; none for free writing
    fn check_in_questions(&self, kind: JournalKind, tone: PersonaTone) -> Vec<String>;
}

/// Pick the delegate for this run: Gemini when an API key is configured,
/// offline fallbacks otherwise.
pub fn delegate_for(config: &AssistantConfig) -> Box<dyn Delegate> {
    match config.api_key() {
        Some(key) => Box::new(GeminiDelegate::from_config(config, key)),
        None => {
            tracing::info!(env = %config.api_key_env, "No API key set, companion runs offline");
            Box::new(OfflineDelegate)
        }
    }
}
