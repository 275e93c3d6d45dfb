use serde::{Deserialize, Serialize};

/// Minutes in a day
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time of day with minute precision, stored as `HH:MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Build from minutes since midnight (must be < 24:00)
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self(hour * 60 + minute))
    }

    /// Parse an `HH:MM` string
    pub fn parse(value: &str) -> Option<Self> {
        let (hour, minute) = value.trim().split_once(':')?;
        let hour = hour.parse::<u16>().ok()?;
        let minute = minute.parse::<u16>().ok()?;
        Self::from_hm(hour, minute)
    }

    pub fn minutes(&self) -> u16 {
        self.0
    }

    pub fn hour(&self) -> u16 {
        self.0 / 60
    }

    pub fn minute(&self) -> u16 {
        self.0 % 60
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid time of day '{value}', expected HH:MM"))
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let t = TimeOfDay::parse("09:07").unwrap();
        assert_eq!(t.minutes(), 9 * 60 + 7);
        assert_eq!(t.to_string(), "09:07");
        assert_eq!(TimeOfDay::parse("7:5").unwrap().to_string(), "07:05");
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(TimeOfDay::parse("24:00").is_none());
        assert!(TimeOfDay::parse("12:60").is_none());
        assert!(TimeOfDay::parse("noon").is_none());
        assert!(TimeOfDay::from_minutes(MINUTES_PER_DAY).is_none());
    }

    #[test]
    fn test_serde_as_string() {
        let t = TimeOfDay::from_hm(18, 30).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"18:30\"");
        let back: TimeOfDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
        assert!(serde_json::from_str::<TimeOfDay>("\"25:00\"").is_err());
    }
}
