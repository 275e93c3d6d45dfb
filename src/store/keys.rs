use serde::Serialize;

/// Named slots the app state is persisted under. Each holds one JSON
/// snapshot of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum StorageKey {
    Settings,
    Entries,
    Moods,
    Tasks,
    Habits,
    Goals,
    Chat,
    Stats,
    Badges,
}

impl StorageKey {
    pub const ALL: [StorageKey; 9] = [
        StorageKey::Settings,
        StorageKey::Entries,
        StorageKey::Moods,
        StorageKey::Tasks,
        StorageKey::Habits,
        StorageKey::Goals,
        StorageKey::Chat,
        StorageKey::Stats,
        StorageKey::Badges,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Settings => "lumen_settings",
            StorageKey::Entries => "lumen_entries",
            StorageKey::Moods => "lumen_moods",
            StorageKey::Tasks => "lumen_tasks",
            StorageKey::Habits => "lumen_habits",
            StorageKey::Goals => "lumen_goals",
            StorageKey::Chat => "lumen_chat",
            StorageKey::Stats => "lumen_stats",
            StorageKey::Badges => "lumen_badges",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == s)
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
