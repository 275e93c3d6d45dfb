//! Mood commands

use anyhow::{Context, Result};

use lumen::app::Action;
use lumen::Mood;

use super::{blocking, Session};
use crate::commands::MoodCommands;

pub async fn mood_command(session: &mut Session, command: MoodCommands) -> Result<()> {
    match command {
        MoodCommands::Log { mood, note } => {
            let mood = Mood::from_str(&mood).with_context(|| {
                let known: Vec<&str> = Mood::all().iter().map(Mood::as_str).collect();
                format!("Unknown mood: {mood}. Try one of: {}", known.join(", "))
            })?;
            session.dispatch(Action::LogMood { mood, note })?;
            println!("Logged {mood}.");
        }
        MoodCommands::List { limit } => {
            let moods = &session.controller.state().moods;
            if moods.is_empty() {
                println!("No moods logged yet.");
                return Ok(());
            }

            let skip = limit.map_or(0, |n| moods.len().saturating_sub(n));
            for log in moods.iter().skip(skip) {
                let note = log.note.as_deref().unwrap_or("");
                println!(
                    "  {} {:<12} {}/5 {}",
                    log.date.format("%Y-%m-%d %H:%M"),
                    log.mood.as_str(),
                    log.mood.value(),
                    note
                );
            }
        }
        MoodCommands::Trend => {
            let delegate = session.delegate.clone();
            let state = session.controller.state();
            let logs = state.moods.clone();
            let name = state.settings.name.clone();
            let trend = blocking(move || delegate.mood_trend(&logs, &name)).await?;
            println!("{trend}");
        }
    }

    Ok(())
}
