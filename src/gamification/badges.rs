//! Badge definitions and unlock evaluation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::events::GamificationEvent;
use super::stats::{UserStats, XpKind};

/// XP bonus granted once per unlocked badge
pub const BADGE_BONUS_XP: u32 = 100;

/// Which stat a badge watches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeCriteria {
    Tasks,
    Streak,
    Journals,
    Moods,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    #[serde(default)]
    pub unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_unlocked: Option<DateTime<Utc>>,
    pub criteria_type: BadgeCriteria,
    pub criteria_threshold: u32,
}

/// Static seed data for a badge
struct BadgeDef {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    criteria: BadgeCriteria,
    threshold: u32,
}

static BADGES: &[BadgeDef] = &[
    BadgeDef {
        id: "first_step",
        name: "First Step",
        description: "Complete your first task.",
        icon: "Footprints",
        criteria: BadgeCriteria::Tasks,
        threshold: 1,
    },
    BadgeDef {
        id: "streak_3",
        name: "Momentum",
        description: "Log in 3 days in a row.",
        icon: "Zap",
        criteria: BadgeCriteria::Streak,
        threshold: 3,
    },
    BadgeDef {
        id: "streak_7",
        name: "Unstoppable",
        description: "Log in 7 days in a row.",
        icon: "Flame",
        criteria: BadgeCriteria::Streak,
        threshold: 7,
    },
    BadgeDef {
        id: "journal_5",
        name: "Reflector",
        description: "Write 5 journal entries.",
        icon: "Book",
        criteria: BadgeCriteria::Journals,
        threshold: 5,
    },
    BadgeDef {
        id: "mood_master",
        name: "Self-Aware",
        description: "Log your mood 5 times.",
        icon: "Heart",
        criteria: BadgeCriteria::Moods,
        threshold: 5,
    },
    // Higher tier
    BadgeDef {
        id: "hunter_initiate",
        name: "Hunter Initiate",
        description: "Complete 25 tasks.",
        icon: "Target",
        criteria: BadgeCriteria::Tasks,
        threshold: 25,
    },
    BadgeDef {
        id: "shadow_scribe",
        name: "Shadow Scribe",
        description: "Write 20 journal entries.",
        icon: "Feather",
        criteria: BadgeCriteria::Journals,
        threshold: 20,
    },
    BadgeDef {
        id: "iron_will",
        name: "Iron Will",
        description: "Reach a 30-day streak.",
        icon: "Shield",
        criteria: BadgeCriteria::Streak,
        threshold: 30,
    },
];

/// Badges seeded on first run, all locked
pub fn initial_badges() -> Vec<Badge> {
    BADGES
        .iter()
        .map(|def| Badge {
            id: def.id.to_string(),
            name: def.name.to_string(),
            description: def.description.to_string(),
            icon: def.icon.to_string(),
            unlocked: false,
            date_unlocked: None,
            criteria_type: def.criteria,
            criteria_threshold: def.threshold,
        })
        .collect()
}

impl Badge {
    pub fn is_satisfied_by(&self, stats: &UserStats) -> bool {
        stats.metric(self.criteria_type) >= self.criteria_threshold
    }
}

/// Unlock every locked badge whose criterion is met and grant the bonus.
///
/// Already unlocked badges are skipped, so evaluating twice with the same
/// stats awards nothing the second time.
pub fn evaluate_badges(
    stats: &mut UserStats,
    badges: &mut [Badge],
    now: DateTime<Utc>,
) -> Vec<GamificationEvent> {
    let mut events = Vec::new();

    for badge in badges.iter_mut().filter(|b| !b.unlocked) {
        if !badge.is_satisfied_by(stats) {
            continue;
        }

        badge.unlocked = true;
        badge.date_unlocked = Some(now);
        tracing::info!(badge = %badge.id, "Badge unlocked");

        events.push(GamificationEvent::BadgeUnlocked {
            id: badge.id.clone(),
            name: badge.name.clone(),
        });
        events.extend(stats.apply_xp(
            BADGE_BONUS_XP,
            format!("Badge: {}", badge.name),
            XpKind::Gain,
            now,
        ));
    }

    events
}
