use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

/// Free writing or one of the time-of-day check-ins
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalKind {
    #[default]
    Free,
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl JournalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JournalKind::Free => "free",
            JournalKind::Morning => "morning",
            JournalKind::Afternoon => "afternoon",
            JournalKind::Evening => "evening",
            JournalKind::Night => "night",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Some(Self::Free),
            "morning" => Some(Self::Morning),
            "afternoon" => Some(Self::Afternoon),
            "evening" => Some(Self::Evening),
            "night" => Some(Self::Night),
            _ => None,
        }
    }

    pub fn is_check_in(&self) -> bool {
        !matches!(self, JournalKind::Free)
    }
}

/// Highest rating accepted for a check-in answer
pub const MAX_CHECK_IN_RATING: u8 = 10;

/// One rated answer of a structured check-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInAnswer {
    pub question: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: JournalKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub check_in_data: Vec<CheckInAnswer>,
}

impl JournalEntry {
    pub fn free(content: impl Into<String>, prompt: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            date: now,
            content: content.into(),
            prompt,
            mood: None,
            kind: JournalKind::Free,
            check_in_data: Vec::new(),
        }
    }

    pub fn check_in(kind: JournalKind, answers: Vec<CheckInAnswer>, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            date: now,
            content: format!("Completed {} check-in", kind.as_str()),
            prompt: None,
            mood: None,
            kind,
            check_in_data: answers,
        }
    }

    /// Free entries need text; check-ins need at least one comment
    pub fn has_content(&self) -> bool {
        if self.kind.is_check_in() {
            self.check_in_data.iter().any(|a| !a.comment.trim().is_empty())
        } else {
            !self.content.trim().is_empty()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Excited,
    Happy,
    Motivated,
    Content,
    Grateful,
    Calm,
    Tired,
    Sad,
    Anxious,
    Stressed,
    Frustrated,
    Overwhelmed,
}

impl Mood {
    pub fn all() -> &'static [Mood] {
        &[
            Self::Excited,
            Self::Happy,
            Self::Motivated,
            Self::Content,
            Self::Grateful,
            Self::Calm,
            Self::Tired,
            Self::Sad,
            Self::Anxious,
            Self::Stressed,
            Self::Frustrated,
            Self::Overwhelmed,
        ]
    }

    /// Chart value on a 1..=5 scale
    pub fn value(&self) -> u8 {
        match self {
            Self::Excited | Self::Happy | Self::Motivated | Self::Grateful => 5,
            Self::Content | Self::Calm => 4,
            Self::Tired | Self::Anxious | Self::Stressed | Self::Frustrated => 2,
            Self::Sad | Self::Overwhelmed => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excited => "Excited",
            Self::Happy => "Happy",
            Self::Motivated => "Motivated",
            Self::Content => "Content",
            Self::Grateful => "Grateful",
            Self::Calm => "Calm",
            Self::Tired => "Tired",
            Self::Sad => "Sad",
            Self::Anxious => "Anxious",
            Self::Stressed => "Stressed",
            Self::Frustrated => "Frustrated",
            Self::Overwhelmed => "Overwhelmed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodLog {
    pub id: String,
    pub date: DateTime<Utc>,
    pub mood: Mood,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl MoodLog {
    pub fn new(mood: Mood, note: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            date: now,
            mood,
            note,
        }
    }
}
