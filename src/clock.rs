//! Source of "now" for everything date-dependent (streaks, recurrence,
//! timeline, timestamps)

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, Utc};
use std::sync::{Arc, Mutex};

pub trait Clock: Send + Sync {
    /// Current instant, used for timestamps
    fn now(&self) -> DateTime<Utc>;

    /// Calendar day as the user sees it
    fn today(&self) -> NaiveDate {
        self.local_date(self.now())
    }

    /// Calendar day a stored timestamp falls on, in the same zone as `today`
    fn local_date(&self, at: DateTime<Utc>) -> NaiveDate;
}

/// Wall clock; "today" follows the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&Local).date_naive()
    }
}

/// Manually driven clock for tests and replays. Days are UTC unless an
/// offset is given.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
    offset: FixedOffset,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
            offset: Utc.fix(),
        }
    }

    /// Same instant, seen from a zone `offset_secs` east of UTC
    pub fn with_offset(mut self, offset_secs: i32) -> Self {
        if let Some(offset) = FixedOffset::east_opt(offset_secs) {
            self.offset = offset;
        }
        self
    }

    /// Clock pinned to noon UTC on `day`
    pub fn at_date(day: NaiveDate) -> Self {
        let noon = day
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now);
        Self::new(noon)
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().expect("clock lock") = now;
    }

    pub fn advance_days(&self, days: i64) {
        let mut now = self.now.lock().expect("clock lock");
        *now += chrono::Duration::days(days);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }

    fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_advances() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let clock = FixedClock::at_date(day);
        assert_eq!(clock.today(), day);

        let shared = clock.clone();
        shared.advance_days(2);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_offset_moves_the_day_not_the_instant() {
        let late = DateTime::parse_from_rfc3339("2024-06-04T02:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let new_york = FixedClock::new(late).with_offset(-4 * 3600);

        assert_eq!(new_york.now(), late);
        assert_eq!(new_york.today(), NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(FixedClock::new(late).today(), NaiveDate::from_ymd_opt(2024, 6, 4).unwrap());
    }
}
