//! The single authoritative application state

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{ChatMessage, Goal, Habit, JournalEntry, MoodLog, Task, UserSettings};
use crate::error::{LumenError, Result};
use crate::gamification::{initial_badges, Badge, UserStats};
use crate::schedule::DayView;
use crate::store::{StorageKey, Store};

/// Everything the app knows, one field per storage key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppState {
    pub settings: UserSettings,
    /// Journal entries, newest first
    pub entries: Vec<JournalEntry>,
    /// Mood logs in the order they were recorded
    pub moods: Vec<MoodLog>,
    pub tasks: Vec<Task>,
    pub habits: Vec<Habit>,
    /// Goals, newest first
    pub goals: Vec<Goal>,
    pub chat: Vec<ChatMessage>,
    pub stats: UserStats,
    pub badges: Vec<Badge>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            entries: Vec::new(),
            moods: Vec::new(),
            tasks: Vec::new(),
            habits: Vec::new(),
            goals: Vec::new(),
            chat: Vec::new(),
            stats: UserStats::default(),
            badges: initial_badges(),
        }
    }
}

impl AppState {
    /// Load every collection; keys never written take their defaults
    pub fn load(store: &Store) -> Result<Self> {
        let defaults = Self::default();
        let mut badges: Vec<Badge> = store.load(StorageKey::Badges)?.unwrap_or(defaults.badges);

        // Badges added after a snapshot was written start out locked
        for seeded in initial_badges() {
            if !badges.iter().any(|b| b.id == seeded.id) {
                badges.push(seeded);
            }
        }

        let mut stats: UserStats = store.load(StorageKey::Stats)?.unwrap_or(defaults.stats);
        stats.sync_level();

        Ok(Self {
            settings: store.load(StorageKey::Settings)?.unwrap_or(defaults.settings),
            entries: store.load(StorageKey::Entries)?.unwrap_or_default(),
            moods: store.load(StorageKey::Moods)?.unwrap_or_default(),
            tasks: store.load(StorageKey::Tasks)?.unwrap_or_default(),
            habits: store.load(StorageKey::Habits)?.unwrap_or_default(),
            goals: store.load(StorageKey::Goals)?.unwrap_or_default(),
            chat: store.load(StorageKey::Chat)?.unwrap_or_default(),
            stats,
            badges,
        })
    }

    /// Write the collection behind `key`
    pub fn save_key(&self, store: &Store, key: StorageKey) -> Result<()> {
        match key {
            StorageKey::Settings => store.save(key, &self.settings),
            StorageKey::Entries => store.save(key, &self.entries),
            StorageKey::Moods => store.save(key, &self.moods),
            StorageKey::Tasks => store.save(key, &self.tasks),
            StorageKey::Habits => store.save(key, &self.habits),
            StorageKey::Goals => store.save(key, &self.goals),
            StorageKey::Chat => store.save(key, &self.chat),
            StorageKey::Stats => store.save(key, &self.stats),
            StorageKey::Badges => store.save(key, &self.badges),
        }
    }

    pub fn day_view(&self, today: NaiveDate) -> DayView {
        DayView::build(&self.tasks, &self.habits, today)
    }

    pub(crate) fn task_index(&self, id: &str) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| LumenError::not_found("Task", id))
    }

    pub(crate) fn habit_index(&self, id: &str) -> Result<usize> {
        self.habits
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| LumenError::not_found("Habit", id))
    }

    pub(crate) fn goal_index(&self, id: &str) -> Result<usize> {
        self.goals
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| LumenError::not_found("Goal", id))
    }

    pub(crate) fn entry_index(&self, id: &str) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| LumenError::not_found("Journal entry", id))
    }

    pub(crate) fn message_index(&self, id: &str) -> Result<usize> {
        self.chat
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| LumenError::not_found("Chat message", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamification::XpKind;
    use chrono::Utc;

    #[test]
    fn test_empty_store_loads_defaults() {
        let store = Store::open_in_memory().unwrap();
        let state = AppState::load(&store).unwrap();
        assert_eq!(state, AppState::default());
        assert_eq!(state.badges.len(), 8);
        assert_eq!(state.settings.name, "Traveler");
        assert_eq!(state.stats.level, 1);
    }

    #[test]
    fn test_save_and_reload() {
        let store = Store::open_in_memory().unwrap();
        let mut state = AppState::default();
        state.stats.apply_xp(40, "Task: Read", XpKind::Gain, Utc::now());
        state.goals.push(Goal::new("Run a 10k", Utc::now()));
        for key in StorageKey::ALL {
            state.save_key(&store, key).unwrap();
        }

        let loaded = AppState::load(&store).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_partial_stats_merge_over_defaults() {
        let store = Store::open_in_memory().unwrap();
        store.put_raw(StorageKey::Stats, r#"{"xp":130,"currentStreak":2}"#).unwrap();
        store.put_raw(StorageKey::Badges, r#"[]"#).unwrap();

        let state = AppState::load(&store).unwrap();
        assert_eq!(state.stats.xp, 130);
        assert_eq!(state.stats.current_streak, 2);
        assert_eq!(state.stats.level, 2);
        assert_eq!(state.badges.len(), 8);
    }

    #[test]
    fn test_missing_ids_are_not_found() {
        let state = AppState::default();
        assert!(matches!(
            state.task_index("nope"),
            Err(LumenError::NotFound { kind: "Task", .. })
        ));
    }
}
