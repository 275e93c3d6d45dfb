//! Best-effort parsing of model replies

use serde_json::Value;

use super::fallback;
use super::Recommendation;

/// Lowest XP a task estimate may return
pub const MIN_XP: u32 = 10;
/// Highest XP a task estimate may return
pub const MAX_XP: u32 = 100;

/// Read an XP estimate from a reply like `"45"` or `"45 XP"`.
/// Unparseable replies give the fallback; numbers are clamped to range.
pub fn parse_xp(reply: &str) -> u32 {
    let trimmed = reply.trim();
    let digits: String = trimmed
        .chars()
        .skip_while(|c| *c == '+')
        .take_while(|c| c.is_ascii_digit())
        .collect();

    match digits.parse::<u64>() {
        Ok(xp) => xp.clamp(MIN_XP as u64, MAX_XP as u64) as u32,
        Err(_) if trimmed.starts_with('-') => MIN_XP,
        Err(_) => fallback::ESTIMATED_XP,
    }
}

/// Strip a ```json fence some models wrap JSON replies in
fn unfence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse a JSON array of task suggestions.
///
/// A valid JSON value that is not an array yields no suggestions; invalid
/// JSON is an error so the caller can fall back.
pub fn parse_recommendations(reply: &str) -> Result<Vec<Recommendation>, serde_json::Error> {
    let value: Value = serde_json::from_str(unfence(reply))?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<Recommendation>(item).ok())
        .filter(|rec| !rec.text.trim().is_empty())
        .collect())
}

/// Parse a JSON array of question strings. Empty or invalid replies give
/// the default questions.
pub fn parse_check_in_questions(reply: &str) -> Vec<String> {
    let questions: Vec<String> = serde_json::from_str::<Vec<Value>>(unfence(reply))
        .map(|items| {
            items
                .into_iter()
                .filter_map(|v| v.as_str().map(|s| s.trim().to_string()))
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if questions.is_empty() {
        fallback::CHECK_IN_QUESTIONS.iter().map(|q| q.to_string()).collect()
    } else {
        questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;

    #[test]
    fn test_parse_xp() {
        assert_eq!(parse_xp("45"), 45);
        assert_eq!(parse_xp(" 60 XP\n"), 60);
        assert_eq!(parse_xp("500"), MAX_XP);
        assert_eq!(parse_xp("3"), MIN_XP);
        assert_eq!(parse_xp("-40"), MIN_XP);
        assert_eq!(parse_xp("about fifty"), 20);
        assert_eq!(parse_xp(""), 20);
    }

    #[test]
    fn test_parse_recommendations() {
        let reply = r#"[{"text":"Walk 20 minutes","priority":"low","xp":25},{"text":"Plan week"}]"#;
        let recs = parse_recommendations(reply).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].priority, Priority::Low);
        assert_eq!(recs[1].priority, Priority::Medium);
        assert_eq!(recs[1].xp, 20);

        assert!(parse_recommendations(r#"{"text":"not a list"}"#).unwrap().is_empty());
        assert!(parse_recommendations("nope").is_err());
    }

    #[test]
    fn test_parse_fenced_json() {
        let reply = "```json\n[\"One?\", \"Two?\", \"Three?\"]\n```";
        assert_eq!(parse_check_in_questions(reply), vec!["One?", "Two?", "Three?"]);
    }

    #[test]
    fn test_check_in_questions_fall_back() {
        assert_eq!(parse_check_in_questions("[]").len(), 3);
        assert_eq!(parse_check_in_questions("garbage")[0], "How are you?");
    }
}
