//! Gemini REST client
//!
//! Single-shot prompts go through `generateContent`; chat replies stream
//! from `streamGenerateContent?alt=sse`.

mod stream;
mod types;


use anyhow::{Context, Result};
use serde_json::json;
use std::time::Duration;

use super::fallback;
use super::parse::{parse_check_in_questions, parse_recommendations, parse_xp};
use super::prompts;
use super::tools::tool_declarations;
use super::{ChatChunk, ChatStream, Delegate, Persona, Recommendation};
use crate::config::AssistantConfig;
use crate::domain::{
    ChatMessage, ChatRole, Habit, JournalEntry, JournalKind, MoodLog, PersonaTone, Priority,
    UserSettings,
};
use crate::insights::InsightSummary;
use stream::{ChunkStream, SseStream};
use types::{Content, GenerateRequest, GenerateResponse, GenerationConfig, Part};

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Delegate backed by the Gemini API
#[derive(Clone)]
pub struct GeminiDelegate {
    base_url: String,
    model: String,
    api_key: String,
    client: ureq::Agent,
}

impl GeminiDelegate {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, DEFAULT_BASE_URL, DEFAULT_MODEL, Duration::from_secs(60))
    }

    pub fn from_config(config: &AssistantConfig, api_key: String) -> Self {
        Self::with_endpoint(
            api_key,
            &config.base_url,
            &config.model,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn with_endpoint(
        api_key: impl Into<String>,
        base_url: &str,
        model: &str,
        timeout: Duration,
    ) -> Self {
        let client = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(timeout)
            .build();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    fn url(&self, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, self.model, method)
    }

    /// One `generateContent` round trip. `Ok(None)` means the model answered
    /// with no text.
    fn generate(&self, request: &GenerateRequest) -> Result<Option<String>> {
        let response: GenerateResponse = self
            .client
            .post(&self.url("generateContent"))
            .set("x-goog-api-key", &self.api_key)
            .send_json(request)
            .context("Failed to reach Gemini")?
            .into_json()
            .context("Failed to parse Gemini response")?;
        Ok(response.text().map(|t| t.trim().to_string()))
    }

    /// Text reply to `prompt`, with separate answers for an empty reply and
    /// for a failed call
    fn text_or(&self, what: &str, prompt: String, if_empty: &str, if_failed: &str) -> String {
        match self.generate(&GenerateRequest::prompt(prompt)) {
            Ok(Some(text)) if !text.is_empty() => text,
            Ok(_) => if_empty.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "{} failed, using fallback", what);
                if_failed.to_string()
            }
        }
    }

    fn json_reply(&self, what: &str, prompt: String, schema: serde_json::Value) -> Option<String> {
        let request = GenerateRequest {
            generation_config: Some(GenerationConfig::json(schema)),
            ..GenerateRequest::prompt(prompt)
        };
        match self.generate(&request) {
            Ok(text) => Some(text.unwrap_or_else(|| "[]".to_string())),
            Err(e) => {
                tracing::warn!(error = %e, "{} failed, using fallback", what);
                None
            }
        }
    }

    fn chat_request(&self, history: &[ChatMessage], message: &str, persona: &Persona) -> GenerateRequest {
        let mut contents = history_contents(history);
        contents.push(Content::text("user", message));

        GenerateRequest {
            contents,
            system_instruction: Some(Content::system(prompts::system_instruction(persona))),
            tools: Some(tool_declarations()),
            generation_config: None,
        }
    }
}

/// Map stored chat history to request contents.
///
/// Tool notices go back as plain model text, since the function calls that
/// produced them are not stored. Empty placeholder replies are dropped.
fn history_contents(history: &[ChatMessage]) -> Vec<Content> {
    history
        .iter()
        .filter_map(|msg| {
            if msg.text.trim().is_empty() {
                return None;
            }
            let role = match msg.role {
                ChatRole::User => "user",
                ChatRole::Model => "model",
            };
            Some(Content::text(role, msg.text.clone()))
        })
        .collect()
}

impl Delegate for GeminiDelegate {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn journal_prompt(&self, recent: &[JournalEntry], share_content: bool) -> String {
        self.text_or(
            "Journal prompt",
            prompts::journal_prompt(recent, share_content),
            fallback::JOURNAL_PROMPT_EMPTY,
            fallback::JOURNAL_PROMPT,
        )
    }

    fn insight(&self, summary: &InsightSummary, persona: &Persona) -> String {
        self.text_or(
            "Insight",
            prompts::insight(summary, persona),
            fallback::INSIGHT_EMPTY,
            fallback::INSIGHT,
        )
    }

    fn estimate_xp(&self, description: &str, priority: Priority, duration: u32) -> u32 {
        match self.generate(&GenerateRequest::prompt(prompts::estimate_xp(
            description,
            priority,
            duration,
        ))) {
            Ok(text) => parse_xp(text.as_deref().unwrap_or("")),
            Err(e) => {
                tracing::warn!(error = %e, "XP estimate failed, using fallback");
                fallback::ESTIMATED_XP
            }
        }
    }

    fn recommend_tasks(
        &self,
        open_tasks: usize,
        habits: &[Habit],
        context: &str,
    ) -> Vec<Recommendation> {
        let schema = json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "text": { "type": "STRING" },
                    "priority": { "type": "STRING", "enum": ["low", "medium", "high"] },
                    "xp": { "type": "INTEGER" }
                }
            }
        });
        let Some(reply) = self.json_reply(
            "Task recommendations",
            prompts::recommend_tasks(open_tasks, habits, context),
            schema,
        ) else {
            return fallback::recommendations();
        };

        parse_recommendations(&reply).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Unreadable recommendations, using fallback");
            fallback::recommendations()
        })
    }

    fn stream_chat(
        &self,
        history: &[ChatMessage],
        message: &str,
        persona: &Persona,
    ) -> ChatStream<'_> {
        let request = self.chat_request(history, message, persona);
        let url = format!("{}?alt=sse", self.url("streamGenerateContent"));

        match self
            .client
            .post(&url)
            .set("x-goog-api-key", &self.api_key)
            .send_json(&request)
        {
            Ok(response) => Box::new(ChunkStream::new(SseStream::new(response.into_reader()))),
            Err(e) => {
                tracing::warn!(error = %e, "Chat request failed, using fallback");
                Box::new(std::iter::once(ChatChunk::Text(fallback::CHAT_ERROR.to_string())))
            }
        }
    }

    fn mood_trend(&self, logs: &[MoodLog], user_name: &str) -> String {
        if logs.len() < fallback::MOOD_TREND_MIN_LOGS {
            return fallback::MOOD_TREND_NEEDS_DATA.to_string();
        }
        self.text_or(
            "Mood trend",
            prompts::mood_trend(logs, user_name),
            fallback::MOOD_TREND_EMPTY,
            fallback::MOOD_TREND,
        )
    }

    fn affirmation(&self, settings: &UserSettings) -> String {
        self.text_or(
            "Affirmation",
            prompts::affirmation(settings),
            fallback::AFFIRMATION_EMPTY,
            fallback::AFFIRMATION,
        )
    }

    fn check_in_questions(&self, kind: JournalKind, tone: PersonaTone) -> Vec<String> {
        if !kind.is_check_in() {
            return Vec::new();
        }
        let schema = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
        match self.json_reply("Check-in questions", prompts::check_in_questions(kind, tone), schema) {
            Some(reply) => parse_check_in_questions(&reply),
            None => fallback::check_in_questions(kind),
        }
    }
}
