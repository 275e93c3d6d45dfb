//! Journal, moods, goals, plans and settings

use chrono::{DateTime, Utc};

use super::{required, Changed, Controller};
use crate::app::action::NewEntry;
use crate::assistant::prompts::goal_breakdown_message;
use crate::domain::{
    ChatMessage, Goal, GoalStatus, JournalEntry, Mood, MoodLog, UserSettings, LIKED_QUOTES_LIMIT,
    MAX_CHECK_IN_RATING, PIN_LENGTH,
};
use crate::error::{LumenError, Result};
use crate::gamification::{GamificationEvent, XpKind, XpRewards};
use crate::store::StorageKey;

impl Controller {
    pub(super) fn add_journal_entry(
        &mut self,
        new: NewEntry,
        now: DateTime<Utc>,
        changed: &mut Changed,
    ) -> Result<Vec<GamificationEvent>> {
        let entry = match new {
            NewEntry::Free { content, prompt } => {
                let prompt = prompt.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
                JournalEntry::free(content.trim(), prompt, now)
            }
            NewEntry::CheckIn { kind, answers } => {
                if !kind.is_check_in() {
                    return Err(LumenError::invalid("Check-ins need a time of day"));
                }
                if let Some(bad) = answers.iter().find(|a| a.rating > MAX_CHECK_IN_RATING) {
                    return Err(LumenError::invalid(format!(
                        "Rating {} is out of range 0..={MAX_CHECK_IN_RATING}",
                        bad.rating
                    )));
                }
                JournalEntry::check_in(kind, answers, now)
            }
        };
        if !entry.has_content() {
            return Err(LumenError::invalid("Journal entry is empty"));
        }

        tracing::debug!(id = %entry.id, kind = entry.kind.as_str(), "Journal entry added");
        self.state.entries.insert(0, entry);
        self.state.stats.journals_written += 1;
        let events = self.state.stats.apply_xp(
            XpRewards::JOURNAL_ENTRY,
            "Journal Entry",
            XpKind::Gain,
            now,
        );

        changed.insert(StorageKey::Entries);
        changed.insert(StorageKey::Stats);
        Ok(events)
    }

    pub(super) fn delete_journal_entry(
        &mut self,
        id: &str,
        changed: &mut Changed,
    ) -> Result<Vec<GamificationEvent>> {
        let idx = self.state.entry_index(id)?;
        self.state.entries.remove(idx);
        changed.insert(StorageKey::Entries);
        Ok(Vec::new())
    }

    pub(super) fn log_mood(
        &mut self,
        mood: Mood,
        note: Option<String>,
        now: DateTime<Utc>,
        changed: &mut Changed,
    ) -> Result<Vec<GamificationEvent>> {
        let note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        self.state.moods.push(MoodLog::new(mood, note, now));
        self.state.stats.moods_logged += 1;
        let events = self
            .state
            .stats
            .apply_xp(XpRewards::MOOD_LOG, "Mood Log", XpKind::Gain, now);

        changed.insert(StorageKey::Moods);
        changed.insert(StorageKey::Stats);
        Ok(events)
    }

    /// Newest goals go first; returns the new id
    pub(super) fn add_goal(
        &mut self,
        title: &str,
        now: DateTime<Utc>,
        changed: &mut Changed,
    ) -> Result<String> {
        let goal = Goal::new(required(title, "Goal title")?, now);
        let id = goal.id.clone();
        tracing::debug!(%id, "Goal added");
        self.state.goals.insert(0, goal);
        changed.insert(StorageKey::Goals);
        Ok(id)
    }

    pub(super) fn set_goal_status(
        &mut self,
        id: &str,
        status: GoalStatus,
        changed: &mut Changed,
    ) -> Result<Vec<GamificationEvent>> {
        let idx = self.state.goal_index(id)?;
        self.state.goals[idx].status = status;
        changed.insert(StorageKey::Goals);
        Ok(Vec::new())
    }

    pub(super) fn delete_goal(
        &mut self,
        id: &str,
        changed: &mut Changed,
    ) -> Result<Vec<GamificationEvent>> {
        let idx = self.state.goal_index(id)?;
        self.state.goals.remove(idx);
        changed.insert(StorageKey::Goals);
        Ok(Vec::new())
    }

    /// Add the goal and leave a user message waiting for the companion
    pub(super) fn breakdown_goal(
        &mut self,
        title: &str,
        now: DateTime<Utc>,
        changed: &mut Changed,
    ) -> Result<Vec<GamificationEvent>> {
        if self.chat_in_flight {
            return Err(LumenError::ChatBusy);
        }
        let title = required(title, "Goal title")?;
        self.add_goal(&title, now, changed)?;
        self.state
            .chat
            .push(ChatMessage::user(goal_breakdown_message(&title)));
        changed.insert(StorageKey::Chat);
        Ok(Vec::new())
    }

    /// Turn a proposed plan into real tasks
    pub(super) fn accept_plan(
        &mut self,
        message_id: &str,
        changed: &mut Changed,
    ) -> Result<Vec<GamificationEvent>> {
        let idx = self.state.message_index(message_id)?;
        let today = self.today();
        let message = &mut self.state.chat[idx];

        let Some(plan) = message.plan_proposal.clone() else {
            return Err(LumenError::invalid(format!("Message {message_id} has no plan")));
        };
        if message.is_plan_accepted {
            return Err(LumenError::invalid(format!("Plan '{}' was already accepted", plan.title)));
        }
        message.is_plan_accepted = true;

        let count = plan.tasks.len();
        self.state
            .tasks
            .extend(plan.tasks.into_iter().map(|proposed| proposed.into_task(today)));
        tracing::debug!(title = %plan.title, count, "Plan accepted");

        changed.insert(StorageKey::Tasks);
        changed.insert(StorageKey::Chat);
        Ok(Vec::new())
    }

    pub(super) fn clear_chat(&mut self, changed: &mut Changed) -> Result<Vec<GamificationEvent>> {
        if self.chat_in_flight {
            return Err(LumenError::ChatBusy);
        }
        self.state.chat.clear();
        changed.insert(StorageKey::Chat);
        Ok(Vec::new())
    }

    pub(super) fn update_settings(
        &mut self,
        mut settings: UserSettings,
        changed: &mut Changed,
    ) -> Result<Vec<GamificationEvent>> {
        settings.name = required(&settings.name, "Name")?;
        if settings.app_lock_enabled && !UserSettings::is_valid_pin(&settings.app_lock_pin) {
            return Err(LumenError::invalid(format!(
                "PIN must be exactly {PIN_LENGTH} digits"
            )));
        }
        if settings.liked_quotes.len() > LIKED_QUOTES_LIMIT {
            let excess = settings.liked_quotes.len() - LIKED_QUOTES_LIMIT;
            settings.liked_quotes.drain(..excess);
        }

        self.state.settings = settings;
        changed.insert(StorageKey::Settings);
        Ok(Vec::new())
    }

    pub(super) fn like_quote(
        &mut self,
        quote: &str,
        changed: &mut Changed,
    ) -> Result<Vec<GamificationEvent>> {
        let quote = required(quote, "Quote")?;
        self.state.settings.like_quote(quote);
        changed.insert(StorageKey::Settings);
        Ok(Vec::new())
    }
}
