//! XP → level → rank mapping

use serde::{Deserialize, Serialize};

/// XP needed per level; levels are a flat 100 XP apart
pub const XP_PER_LEVEL: u32 = 100;

/// Level for a given XP total: `floor(xp / 100) + 1`
pub fn level_for_xp(xp: u32) -> u32 {
    xp / XP_PER_LEVEL + 1
}

/// Hunter rank shown next to the level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    #[default]
    #[serde(rename = "E-Rank")]
    E,
    #[serde(rename = "D-Rank")]
    D,
    #[serde(rename = "C-Rank")]
    C,
    #[serde(rename = "B-Rank")]
    B,
    #[serde(rename = "A-Rank")]
    A,
    #[serde(rename = "S-Rank")]
    S,
    #[serde(rename = "National Level")]
    National,
}

/// Rank thresholds: a rank applies while the level is below its ceiling
static RANK_CEILINGS: &[(u32, Rank)] = &[
    (5, Rank::E),
    (10, Rank::D),
    (20, Rank::C),
    (35, Rank::B),
    (50, Rank::A),
    (75, Rank::S),
];

impl Rank {
    pub fn for_level(level: u32) -> Rank {
        RANK_CEILINGS
            .iter()
            .find(|(ceiling, _)| level < *ceiling)
            .map(|(_, rank)| *rank)
            .unwrap_or(Rank::National)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rank::E => "E-Rank",
            Rank::D => "D-Rank",
            Rank::C => "C-Rank",
            Rank::B => "B-Rank",
            Rank::A => "A-Rank",
            Rank::S => "S-Rank",
            Rank::National => "National Level",
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Progress within the current level (0.0 - 1.0)
pub fn progress_in_level(xp: u32) -> f32 {
    (xp % XP_PER_LEVEL) as f32 / XP_PER_LEVEL as f32
}

/// XP still needed to reach the next level
pub fn xp_to_next_level(xp: u32) -> u32 {
    XP_PER_LEVEL - xp % XP_PER_LEVEL
}
