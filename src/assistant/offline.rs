use super::fallback;
use super::{ChatChunk, ChatStream, Delegate, Persona, Recommendation};
use crate::domain::{
    ChatMessage, Habit, JournalEntry, JournalKind, MoodLog, PersonaTone, Priority, UserSettings,
};
use crate::insights::InsightSummary;

/// Delegate that never touches the network
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineDelegate;

impl Delegate for OfflineDelegate {
    fn name(&self) -> &'static str {
        "offline"
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
        Box::new(std::iter::once(ChatChunk::Text(fallback::CHAT_ERROR.to_string())))
    }

    fn mood_trend(&self, logs: &[MoodLog], _user_name: &str) -> String {
        if logs.len() < fallback::MOOD_TREND_MIN_LOGS {
            fallback::MOOD_TREND_NEEDS_DATA.to_string()
        } else {
            fallback::MOOD_TREND.to_string()
        }
    }

    fn affirmation(&self, _settings: &UserSettings) -> String {
        fallback::AFFIRMATION.to_string()
    }

    fn check_in_questions(&self, kind: JournalKind, _tone: PersonaTone) -> Vec<String> {
        fallback::check_in_questions(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Mood;
    use chrono::Utc;

    #[test]
    fn test_offline_answers_are_fallbacks() {
        let delegate = OfflineDelegate;
        assert_eq!(delegate.journal_prompt(&[], true), "What is on your mind right now?");
        assert_eq!(delegate.estimate_xp("Anything", Priority::High, 120), 20);
        assert_eq!(delegate.affirmation(&UserSettings::default()), "I am enough.");

        let recs = delegate.recommend_tasks(0, &[], "Self-improvement");
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].text, "Review your goals");
        assert_eq!(recs[0].xp, 15);

        let persona = Persona::from_settings(&UserSettings::default());
        let chunks: Vec<ChatChunk> = delegate.stream_chat(&[], "hi", &persona).collect();
        assert_eq!(
            chunks,
            vec![ChatChunk::Text("System Error: Connection unstable.".to_string())]
        );
    }

    #[test]
    fn test_mood_trend_needs_three_logs() {
        let delegate = OfflineDelegate;
        let logs: Vec<MoodLog> = (0..2).map(|_| MoodLog::new(Mood::Calm, None, Utc::now())).collect();
        assert_eq!(
            delegate.mood_trend(&logs, "Ada"),
            "I need a few more mood entries to spot the patterns."
        );
    }

    #[test]
    fn test_free_writing_has_no_questions() {
        let delegate = OfflineDelegate;
        assert!(delegate.check_in_questions(JournalKind::Free, PersonaTone::Stoic).is_empty());
        assert_eq!(delegate.check_in_questions(JournalKind::Evening, PersonaTone::Stoic).len(), 3);
    }
}
