use serde::{Deserialize, Serialize};

/// Number of digits in the app lock PIN
pub const PIN_LENGTH: usize = 6;

/// Liked quotes remembered for tuning affirmations
pub const LIKED_QUOTES_LIMIT: usize = 20;

/// Personality of the chat companion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonaTone {
    #[default]
    #[serde(rename = "Empathetic & Gentle")]
    Empathetic,
    #[serde(rename = "Stoic & Direct")]
    Stoic,
    #[serde(rename = "High Energy & Motivational")]
    Motivational,
    #[serde(rename = "Analytical & Strategic")]
    Analytical,
    #[serde(rename = "Custom Personality")]
    Custom,
}

impl PersonaTone {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Empathetic => "Empathetic & Gentle",
            Self::Stoic => "Stoic & Direct",
            Self::Motivational => "High Energy & Motivational",
            Self::Analytical => "Analytical & Strategic",
            Self::Custom => "Custom Personality",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "empathetic" => Some(Self::Empathetic),
            "stoic" => Some(Self::Stoic),
            "motivational" => Some(Self::Motivational),
            "analytical" => Some(Self::Analytical),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

impl std::fmt::Display for PersonaTone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppTheme {
    #[default]
    NeonCity,
    CrimsonProtocol,
    Noir,
    Oceanic,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub base: String,
    pub card: String,
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub text: String,
    pub mute: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            base: "#000000".to_string(),
            card: "rgba(30,30,30,0.8)".to_string(),
            primary: "#ffffff".to_string(),
            secondary: "#808080".to_string(),
            accent: "#ff00ff".to_string(),
            text: "#ffffff".to_string(),
            mute: "#999999".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteCategory {
    Affirmation,
    Stoic,
    Productivity,
    Confidence,
    Literature,
    Custom,
}

impl QuoteCategory {
    /// Description handed to the model; `Custom` uses the user's own text
    pub fn description(&self) -> Option<&'static str> {
        match self {
            Self::Affirmation => Some("Positive daily affirmations"),
            Self::Stoic => Some("Stoic philosophy (Marcus Aurelius, Seneca)"),
            Self::Productivity => Some("Quotes about hard work, focus, and discipline"),
            Self::Confidence => Some("Quotes boosting self-worth and bravery"),
            Self::Literature => Some("Beautiful prose from classic literature"),
            Self::Custom => None,
        }
    }
}

/// User preferences. Missing fields in a stored snapshot take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub name: String,
    #[serde(rename = "sophusTone")]
    pub tone: PersonaTone,
    #[serde(rename = "customTonePrompt", skip_serializing_if = "Option::is_none")]
    pub custom_tone_prompt: Option<String>,
    pub calendar_synced: bool,
    pub theme: AppTheme,
    pub custom_theme_colors: ThemeColors,
    pub share_journal_content: bool,
    pub app_lock_enabled: bool,
    pub app_lock_pin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_title: Option<String>,
    pub liked_quotes: Vec<String>,
    pub quote_categories: Vec<QuoteCategory>,
    pub custom_quote_preference: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            name: "Traveler".to_string(),
            tone: PersonaTone::Empathetic,
            custom_tone_prompt: None,
            calendar_synced: false,
            theme: AppTheme::NeonCity,
            custom_theme_colors: ThemeColors::default(),
            share_journal_content: false,
            app_lock_enabled: false,
            app_lock_pin: String::new(),
            user_title: None,
            liked_quotes: Vec::new(),
            quote_categories: vec![QuoteCategory::Affirmation],
            custom_quote_preference: String::new(),
        }
    }
}

impl UserSettings {
    /// Check a PIN candidate: exactly six ASCII digits
    pub fn is_valid_pin(pin: &str) -> bool {
        pin.len() == PIN_LENGTH && pin.bytes().all(|b| b.is_ascii_digit())
    }

    pub fn pin_matches(&self, pin: &str) -> bool {
        !self.app_lock_pin.is_empty() && self.app_lock_pin == pin
    }

    /// Remember a liked quote, keeping the most recent ones
    pub fn like_quote(&mut self, quote: impl Into<String>) {
        self.liked_quotes.push(quote.into());
        if self.liked_quotes.len() > LIKED_QUOTES_LIMIT {
            let excess = self.liked_quotes.len() - LIKED_QUOTES_LIMIT;
            self.liked_quotes.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_snapshot_merges_defaults() {
        let json = r#"{"name":"Ada","sophusTone":"Stoic & Direct","theme":"noir"}"#;
        let settings: UserSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.name, "Ada");
        assert_eq!(settings.tone, PersonaTone::Stoic);
        assert_eq!(settings.theme, AppTheme::Noir);
        assert_eq!(settings.quote_categories, vec![QuoteCategory::Affirmation]);
        assert!(!settings.app_lock_enabled);
    }

    #[test]
    fn test_pin_validation() {
        assert!(UserSettings::is_valid_pin("123456"));
        assert!(!UserSettings::is_valid_pin("12345"));
        assert!(!UserSettings::is_valid_pin("12345a"));

        let settings = UserSettings::default();
        assert!(!settings.pin_matches(""));
    }

    #[test]
    fn test_liked_quotes_are_capped() {
        let mut settings = UserSettings::default();
        for i in 0..25 {
            settings.like_quote(format!("quote {i}"));
        }
        assert_eq!(settings.liked_quotes.len(), LIKED_QUOTES_LIMIT);
        assert_eq!(settings.liked_quotes[0], "quote 5");
    }
}
