//! Shared test utilities for controller integration tests

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::TempDir;

use lumen::app::{Action, Controller, NewTask};
use lumen::assistant::{
    fallback, ChatChunk, ChatStream, Delegate, Persona, Recommendation, ToolCall,
};
use lumen::clock::FixedClock;
use lumen::insights::InsightSummary;
use lumen::store::Store;
use lumen::{
    ChatMessage, Habit, JournalEntry, JournalKind, MoodLog, PersonaTone, Priority, UserSettings,
};

pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

/// Open a controller on the store inside `dir` with the given clock
pub fn open_controller(dir: &Path, clock: &FixedClock) -> Controller {
    let store = Store::open_in_dir(dir).expect("Failed to open store");
    Controller::open(store, Arc::new(clock.clone())).expect("Failed to open controller")
}

/// A fresh data dir plus a controller pinned to `date`
pub fn fresh_controller(date: &str) -> (TempDir, FixedClock, Controller) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let clock = FixedClock::at_date(day(date));
    let controller = open_controller(dir.path(), &clock);
    (dir, clock, controller)
}

pub fn add_task(controller: &mut Controller, text: &str) -> String {
    controller
        .dispatch(Action::AddTask(NewTask::new(text)))
        .expect("Failed to add task");
    controller
        .state()
        .tasks
        .last()
        .map(|t| t.id.clone())
        .expect("task was added")
}

pub fn tool(name: &str, args: serde_json::Value) -> ChatChunk {
    ChatChunk::ToolCall(ToolCall {
        name: name.to_string(),
        args,
    })
}

/// Delegate that replays a fixed chat reply and the offline fallbacks
/// for everything else
pub struct ScriptedDelegate {
    pub reply: Vec<ChatChunk>,
}

impl ScriptedDelegate {
    pub fn new(reply: Vec<ChatChunk>) -> Self {
        Self { reply }
    }
}

impl Delegate for ScriptedDelegate {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn journal_prompt(&self, _recent: &[JournalEntry], _share_content: bool) -> String {
        fallback::JOURNAL_PROMPT.to_string()
    }

    fn insight(&self, _summary: &InsightSummary, _persona: &Persona) -> String {
        fallback::INSIGHT.to_string()
    }

    fn estimate_xp(&self, _description: &str, _priority: Priority, _duration: u32) -> u32 {
        fallback::ESTIMATED_XP
    }

    fn recommend_tasks(
        &self,
        _open_tasks: usize,
        _habits: &[Habit],
        _context: &str,
    ) -> Vec<Recommendation> {
        fallback::recommendations()
    }

    fn stream_chat(
        &self,
        _history: &[ChatMessage],
        _message: &str,
        _persona: &Persona,
    ) -> ChatStream<'_> {
        Box::new(self.reply.clone().into_iter())
    }

    fn mood_trend(&self, _logs: &[MoodLog], _user_name: &str) -> String {
        fallback::MOOD_TREND.to_string()
    }

    fn affirmation(&self, _settings: &UserSettings) -> String {
        fallback::AFFIRMATION.to_string()
    }

    fn check_in_questions(&self, kind: JournalKind, _tone: PersonaTone) -> Vec<String> {
        fallback::check_in_questions(kind)
    }
}
