//! Player stats and the XP ledger

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::badges::BadgeCriteria;
use super::events::{GamificationEvent, LevelUp};
use super::levels::{level_for_xp, Rank};
use crate::domain::new_id;

/// Number of XP log entries retained
pub const XP_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XpKind {
    Gain,
    Loss,
}

/// One immutable XP movement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpLog {
    pub id: String,
    pub date: DateTime<Utc>,
    pub amount: u32,
    /// e.g. "Task: Title", "Badge: Name", "Habit: Name"
    pub source: String,
    #[serde(rename = "type")]
    pub kind: XpKind,
}

/// Aggregate progress of the single local user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStats {
    pub xp: u32,
    /// Lifetime XP gained
    pub xp_gained: u32,
    /// Lifetime XP lost
    pub xp_lost: u32,
    pub level: u32,
    pub rank: Rank,
    pub current_streak: u32,
    pub longest_streak: u32,
    #[serde(deserialize_with = "lenient_date")]
    pub last_login_date: Option<NaiveDate>,
    pub tasks_completed: u32,
    pub journals_written: u32,
    pub moods_logged: u32,
    pub xp_history: Vec<XpLog>,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            xp: 0,
            xp_gained: 0,
            xp_lost: 0,
            level: 1,
            rank: Rank::E,
            current_streak: 0,
            longest_streak: 0,
            last_login_date: None,
            tasks_completed: 0,
            journals_written: 0,
            moods_logged: 0,
            xp_history: Vec::new(),
        }
    }
}

impl UserStats {
    /// Apply an XP movement. Losses clamp the total at zero; the log records
    /// the requested amount. Level and rank are recomputed from the new total.
    pub fn apply_xp(
        &mut self,
        amount: u32,
        source: impl Into<String>,
        kind: XpKind,
        at: DateTime<Utc>,
    ) -> Vec<GamificationEvent> {
        let source = source.into();
        let old_level = self.level;
        let mut events = Vec::new();

        match kind {
            XpKind::Gain => {
                self.xp = self.xp.saturating_add(amount);
                self.xp_gained = self.xp_gained.saturating_add(amount);
                events.push(GamificationEvent::XpAwarded {
                    amount,
                    source: source.clone(),
                });
            }
            XpKind::Loss => {
                self.xp = self.xp.saturating_sub(amount);
                self.xp_lost = self.xp_lost.saturating_add(amount);
                events.push(GamificationEvent::XpLost {
                    amount,
                    source: source.clone(),
                });
            }
        }

        self.sync_level();

        self.xp_history.push(XpLog {
            id: new_id(),
            date: at,
            amount,
            source,
            kind,
        });
        if self.xp_history.len() > XP_HISTORY_LIMIT {
            let excess = self.xp_history.len() - XP_HISTORY_LIMIT;
            self.xp_history.drain(..excess);
        }

        if self.level > old_level {
            tracing::info!(old_level, new_level = self.level, rank = %self.rank, "Level up");
            events.push(GamificationEvent::LevelUp(LevelUp {
                old_level,
                new_level: self.level,
                rank: self.rank,
            }));
        }

        events
    }

    /// Bring level and rank in line with the XP total
    pub fn sync_level(&mut self) {
        self.level = level_for_xp(self.xp);
        self.rank = Rank::for_level(self.level);
    }

    /// Current value of the stat a badge criterion watches
    pub fn metric(&self, criteria: BadgeCriteria) -> u32 {
        match criteria {
            BadgeCriteria::Tasks => self.tasks_completed,
            BadgeCriteria::Streak => self.current_streak,
            BadgeCriteria::Journals => self.journals_written,
            BadgeCriteria::Moods => self.moods_logged,
        }
    }
}

/// Older snapshots stored an empty string before the first login
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        let s = s.trim();
        // Accept full ISO timestamps too, keeping only the date part
        let day = s.get(..10).unwrap_or(s);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_gain_and_level() {
        let mut stats = UserStats::default();
        let events = stats.apply_xp(20, "Task: Read", XpKind::Gain, at());
        assert_eq!(stats.xp, 20);
        assert_eq!(stats.level, 1);
        assert_eq!(events.len(), 1);

        let events = stats.apply_xp(100, "Badge: First Step", XpKind::Gain, at());
        assert_eq!(stats.xp, 120);
        assert_eq!(stats.level, 2);
        assert!(events.iter().any(|e| matches!(e, GamificationEvent::LevelUp(up) if up.new_level == 2)));
        assert_eq!(stats.xp_gained, 120);
    }

    #[test]
    fn test_loss_clamps_at_zero() {
        let mut stats = UserStats::default();
        stats.apply_xp(15, "Habit: Walk", XpKind::Gain, at());
        stats.apply_xp(40, "Relapse: Sugar", XpKind::Loss, at());
        assert_eq!(stats.xp, 0);
        assert_eq!(stats.level, 1);
        assert_eq!(stats.xp_lost, 40);
        assert_eq!(stats.xp_history.last().unwrap().amount, 40);
    }

    #[test]
    fn test_xp_and_level_hold_for_any_sequence() {
        let mut stats = UserStats::default();
        let moves: [(u32, XpKind); 12] = [
            (20, XpKind::Gain),
            (50, XpKind::Loss),
            (100, XpKind::Gain),
            (35, XpKind::Gain),
            (500, XpKind::Loss),
            (7, XpKind::Gain),
            (0, XpKind::Loss),
            (250, XpKind::Gain),
            (99, XpKind::Loss),
            (1, XpKind::Loss),
            (300, XpKind::Gain),
            (1000, XpKind::Loss),
        ];
        let mut expected: i64 = 0;
        for (amount, kind) in moves {
            stats.apply_xp(amount, "test", kind, at());
            expected = match kind {
                XpKind::Gain => expected + amount as i64,
                XpKind::Loss => (expected - amount as i64).max(0),
            };
            assert_eq!(stats.xp as i64, expected);
            assert_eq!(stats.level, stats.xp / 100 + 1);
            assert_eq!(stats.rank, Rank::for_level(stats.level));
        }
    }

    #[test]
    fn test_history_keeps_last_fifty() {
        let mut stats = UserStats::default();
        for i in 0..60 {
            stats.apply_xp(1, format!("entry {i}"), XpKind::Gain, at());
        }
        assert_eq!(stats.xp_history.len(), XP_HISTORY_LIMIT);
        assert_eq!(stats.xp_history.first().unwrap().source, "entry 10");
        assert_eq!(stats.xp_history.last().unwrap().source, "entry 59");
    }

    #[test]
    fn test_deserialize_legacy_snapshot() {
        let json = r#"{"xp":250,"level":3,"rank":"E-Rank","lastLoginDate":"","tasksCompleted":4}"#;
        let stats: UserStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.xp, 250);
        assert_eq!(stats.last_login_date, None);
        assert_eq!(stats.tasks_completed, 4);
        assert!(stats.xp_history.is_empty());

        let json = r#"{"lastLoginDate":"2024-03-09"}"#;
        let stats: UserStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.last_login_date, NaiveDate::from_ymd_opt(2024, 3, 9));
    }
}
