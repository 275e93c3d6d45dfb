//! Deterministic answers used whenever the model cannot be reached or
//! returns something unusable

use super::Recommendation;
use crate::domain::{JournalKind, Priority};

pub const JOURNAL_PROMPT: &str = "What is on your mind right now?";
pub const JOURNAL_PROMPT_EMPTY: &str = "What is one small thing you can control today?";

pub const INSIGHT: &str = "Gathering more data...";
pub const INSIGHT_EMPTY: &str = "Consistency is key.";

/// Minimum number of mood logs before a trend is attempted
pub const MOOD_TREND_MIN_LOGS: usize = 3;
pub const MOOD_TREND_NEEDS_DATA: &str = "I need a few more mood entries to spot the patterns.";
pub const MOOD_TREND: &str = "I am analyzing the currents of your emotions.";
pub const MOOD_TREND_EMPTY: &str = "Keep tracking your journey.";

pub const ESTIMATED_XP: u32 = 20;

pub const CHAT_ERROR: &str = "System Error: Connection unstable.";

pub const AFFIRMATION: &str = "I am enough.";
pub const AFFIRMATION_EMPTY: &str = "I am the architect of my reality.";

pub const CHECK_IN_QUESTIONS: [&str; 3] = ["How are you?", "What went well?", "What to improve?"];

pub fn recommendations() -> Vec<Recommendation> {
    vec![Recommendation {
        text: "Review your goals".to_string(),
        priority: Priority::Medium,
        xp: 15,
    }]
}

/// Default questions for a check-in kind (none for free writing)
pub fn check_in_questions(kind: JournalKind) -> Vec<String> {
    if kind.is_check_in() {
        CHECK_IN_QUESTIONS.iter().map(|q| q.to_string()).collect()
    } else {
        Vec::new()
    }
}
