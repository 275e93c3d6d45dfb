use super::levels::Rank;

/// A level change caused by an XP gain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUp {
    pub old_level: u32,
    pub new_level: u32,
    pub rank: Rank,
}

/// Things front ends may want to celebrate (or mourn)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GamificationEvent {
    XpAwarded { amount: u32, source: String },
    XpLost { amount: u32, source: String },
    LevelUp(LevelUp),
    BadgeUnlocked { id: String, name: String },
    StreakExtended { count: u32 },
    StreakReset,
}

impl std::fmt::Display for GamificationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::XpAwarded { amount, source } => write!(f, "+{amount} XP ({source})"),
            Self::XpLost { amount, source } => write!(f, "-{amount} XP ({source})"),
            Self::LevelUp(up) => write!(f, "Level up! {} -> {} [{}]", up.old_level, up.new_level, up.rank),
            Self::BadgeUnlocked { name, .. } => write!(f, "Badge unlocked: {name}"),
            Self::StreakExtended { count } => write!(f, "Streak: {count} day(s)"),
            Self::StreakReset => write!(f, "Streak reset"),
        }
    }
}
