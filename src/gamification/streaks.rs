//! Daily login streak

use chrono::NaiveDate;

use super::events::GamificationEvent;
use super::stats::UserStats;

impl UserStats {
    /// Advance the login streak for `today`; run once per session.
    ///
    /// Same day is a no-op. A login exactly one day after the last one
    /// extends the streak; any other gap (or no previous login) restarts it
    /// at 1. The local date is trusted as-is.
    pub fn advance_daily_streak(&mut self, today: NaiveDate) -> Option<GamificationEvent> {
        if self.last_login_date == Some(today) {
            return None;
        }

        let continues = self
            .last_login_date
            .and_then(|last| last.succ_opt())
            .is_some_and(|next| next == today);
        let had_streak = self.current_streak > 0;

        self.current_streak = if continues { self.current_streak + 1 } else { 1 };
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.last_login_date = Some(today);

        tracing::debug!(streak = self.current_streak, %today, "Daily streak advanced");

        if continues || !had_streak {
            Some(GamificationEvent::StreakExtended {
                count: self.current_streak,
            })
        } else {
            Some(GamificationEvent::StreakReset)
        }
    }
}
