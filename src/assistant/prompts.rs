//! Prompt text sent to the model

use super::Persona;
use crate::domain::{
    Habit, JournalEntry, JournalKind, MoodLog, PersonaTone, Priority, QuoteCategory, UserSettings,
};
use crate::insights::InsightSummary;

/// Journal entries considered for the prompt context
const RECENT_ENTRIES: usize = 3;
/// Characters of journal text shared with the model
const RECENT_CONTEXT_CHARS: usize = 500;
/// Mood logs included in a trend analysis
const MOOD_TREND_WINDOW: usize = 10;
/// Liked quotes used as style examples
const LIKED_QUOTE_EXAMPLES: usize = 3;

fn tone_instruction(persona: &Persona) -> String {
    if persona.tone == PersonaTone::Custom {
        if let Some(custom) = persona.custom_prompt.as_deref().filter(|p| !p.trim().is_empty()) {
            return format!("USER DEFINED PERSONA: {custom}");
        }
    }

    match persona.tone {
        PersonaTone::Stoic => {
            "You are stoic, logical, and direct. Focus on what is within control.".to_string()
        }
        PersonaTone::Motivational => {
            "You are a high-energy coach. Focus on action and momentum!".to_string()
        }
        PersonaTone::Analytical => {
            "You are analytical. Break problems down. Be objective.".to_string()
        }
        PersonaTone::Empathetic | PersonaTone::Custom => {
            "You are a warm, kind, and empathetic friend. Validate feelings first.".to_string()
        }
    }
}

/// System instruction for the chat companion
pub fn system_instruction(persona: &Persona) -> String {
    let name = if persona.user_name.trim().is_empty() {
        "the Player"
    } else {
        persona.user_name.as_str()
    };

    format!(
        r#"You are Sophus, a 'System' guide (like in a lit-rpg) and companion for {name}.

Tone: {tone}

CAPABILITIES:
1. **Goal Breakdown**: When the user mentions a goal:
   - FIRST, ask clarifying questions to understand constraints and current status.
   - THEN, provide a structured plan using 'propose_plan'.
2. **Task Suggestions**: When helping the user plan their day or schedule, use 'propose_plan' to present a list of tasks.
   - IMPORTANT: The user must SEE and APPROVE the plan. Do not assume tasks are added instantly.
   - If the user asks for changes, call 'propose_plan' again with the updated list.
3. **Goal Tracking**: Use 'add_goal' to register new major objectives.
4. **Gamification**: Treat self-improvement like leveling up.

CORE RULES:
- NEVER say "I have added the tasks". Say "Here is a proposed plan. Shall I add these to your schedule?"
- Use the 'propose_plan' tool to show the tasks visually.
- Keep responses concise.
- No green colors in descriptions (Cyberpunk aesthetic: Blue, Pink, Purple, Black).
"#,
        tone = tone_instruction(persona)
    )
}

/// Prompt for a single journaling question. Entry text is only included when
/// the user shares journal content.
pub fn journal_prompt(recent: &[JournalEntry], share_content: bool) -> String {
    let context = if share_content {
        let joined = recent
            .iter()
            .take(RECENT_ENTRIES)
            .map(|e| e.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let snippet: String = joined.chars().take(RECENT_CONTEXT_CHARS).collect();
        format!("Based on these recent journal entry summaries: \"{snippet}\".")
    } else {
        "Based on general self-improvement themes.".to_string()
    };

    format!("{context} Generate ONE thought-provoking journal prompt. Keep it under 20 words.")
}

pub fn mood_trend(logs: &[MoodLog], user_name: &str) -> String {
    let start = logs.len().saturating_sub(MOOD_TREND_WINDOW);
    let lines = logs[start..]
        .iter()
        .map(|log| {
            format!(
                "{}: {} ({})",
                log.date.to_rfc3339(),
                log.mood,
                log.note.as_deref().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("Analyze trends for {user_name}: {lines}. Provide gentle insight under 40 words.")
}

pub fn insight(summary: &InsightSummary, persona: &Persona) -> String {
    format!(
        "Analyze data for {}: {}. Provide one sophisticated insight connecting habits and productivity. Max 50 words. Tone: {}.",
        persona.user_name,
        summary.describe(),
        persona.tone
    )
}

pub fn estimate_xp(description: &str, priority: Priority, duration: u32) -> String {
    format!(
        "Task: \"{description}\", Priority: {priority}, Duration: {duration}min.\n\
         Rate the difficulty and assign XP (Experience Points) for a gamified productivity app.\n\
         Return ONLY the number (integer between 10 and 100)."
    )
}

pub fn recommend_tasks(open_tasks: usize, habits: &[Habit], context: &str) -> String {
    let habit_titles = habits
        .iter()
        .map(|h| h.title.as_str())
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "User Context: {context}. Current Tasks: {open_tasks}. Habits: {habit_titles}.\n\
         Suggest 3 specific, actionable tasks to add to their Inbox for today.\n\
         Return JSON format: [{{\"text\": \"Task Name\", \"priority\": \"medium\", \"xp\": 30}}]"
    )
}

pub fn affirmation(settings: &UserSettings) -> String {
    let mut context = String::new();

    let preferred = settings
        .quote_categories
        .iter()
        .filter_map(|cat| match cat {
            QuoteCategory::Custom => Some(settings.custom_quote_preference.trim())
                .filter(|pref| !pref.is_empty())
                .map(str::to_string),
            other => other.description().map(str::to_string),
        })
        .collect::<Vec<_>>()
        .join(", ");
    if !preferred.is_empty() {
        context.push_str(&format!("User prefers these types of quotes: {preferred}. "));
    }

    if !settings.liked_quotes.is_empty() {
        let start = settings.liked_quotes.len().saturating_sub(LIKED_QUOTE_EXAMPLES);
        let examples = settings.liked_quotes[start..].join(" | ");
        context.push_str(&format!("User previously LIKED these specific quotes: \"{examples}\". "));
    }

    format!(
        "Generate a short quote/affirmation. {context}\n\
         Constraint: Max 20 words. Unique and impactful.\n\
         Sophus Tone: {}.\n\
         If categories are mixed, choose one that fits the 'Guide' persona best right now.",
        settings.tone
    )
}

pub fn check_in_questions(kind: JournalKind, tone: PersonaTone) -> String {
    format!(
        "Generate 3 short introspection questions for {}. Tone: {tone}. JSON Array.",
        kind.as_str()
    )
}

/// Chat message sent on the user's behalf when breaking down a goal
pub fn goal_breakdown_message(goal: &str) -> String {
    format!(
        "I have a big goal: \"{goal}\". Please help me break this down into smaller steps by asking clarifying questions first."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn persona(tone: PersonaTone, custom: Option<&str>) -> Persona {
        Persona {
            user_name: "Ada".to_string(),
            tone,
            custom_prompt: custom.map(str::to_string),
        }
    }

    #[test]
    fn test_system_instruction_tones() {
        let stoic = system_instruction(&persona(PersonaTone::Stoic, None));
        assert!(stoic.contains("companion for Ada"));
        assert!(stoic.contains("Focus on what is within control."));

        let custom = system_instruction(&persona(PersonaTone::Custom, Some("Speak like a pirate")));
        assert!(custom.contains("USER DEFINED PERSONA: Speak like a pirate"));

        let blank_custom = system_instruction(&persona(PersonaTone::Custom, Some("  ")));
        assert!(blank_custom.contains("Validate feelings first."));
    }

    #[test]
    fn test_journal_prompt_respects_sharing() {
        let entries = vec![JournalEntry::free("Secret thoughts", None, Utc::now())];
        assert!(!journal_prompt(&entries, false).contains("Secret"));
        assert!(journal_prompt(&entries, true).contains("Secret thoughts"));
    }

    #[test]
    fn test_affirmation_context() {
        let mut settings = UserSettings::default();
        settings.quote_categories = vec![QuoteCategory::Stoic, QuoteCategory::Custom];
        settings.custom_quote_preference = "Sci-fi".to_string();
        settings.liked_quotes = vec!["a".into(), "b".into(), "c".into(), "d".into()];

        let prompt = affirmation(&settings);
        assert!(prompt.contains("Stoic philosophy (Marcus Aurelius, Seneca), Sci-fi"));
        assert!(prompt.contains("\"b | c | d\""));
    }

    #[test]
    fn test_goal_breakdown_message() {
        assert_eq!(
            goal_breakdown_message("Learn Rust"),
            "I have a big goal: \"Learn Rust\". Please help me break this down into smaller steps by asking clarifying questions first."
        );
    }
}
