//! Gamification: XP, levels, ranks, login streak and badges
//!
//! Everything here is plain state derivation over [`UserStats`] and the badge
//! list. Callers pass in "now"/"today" so results are deterministic.

mod badges;
mod events;
mod levels;
mod stats;
mod streaks;

pub use badges::{evaluate_badges, initial_badges, Badge, BadgeCriteria, BADGE_BONUS_XP};
pub use events::{GamificationEvent, LevelUp};
pub use levels::{level_for_xp, progress_in_level, xp_to_next_level, Rank, XP_PER_LEVEL};
pub use stats::{UserStats, XpKind, XpLog, XP_HISTORY_LIMIT};

/// Fixed XP rewards for logging actions
pub struct XpRewards;

impl XpRewards {
    pub const JOURNAL_ENTRY: u32 = 25;
    pub const MOOD_LOG: u32 = 10;
}
