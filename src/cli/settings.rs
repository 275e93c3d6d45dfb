//! Settings and quote commands

use anyhow::{bail, Context, Result};

use lumen::app::Action;
use lumen::{PersonaTone, UserSettings, PIN_LENGTH};

use super::{blocking, Session};
use crate::commands::SettingsCommands;

pub async fn quote_command(session: &mut Session, like: bool) -> Result<()> {
    let delegate = session.delegate.clone();
    let settings = session.controller.state().settings.clone();
    let quote = blocking(move || delegate.affirmation(&settings)).await?;
    println!("\"{quote}\"");

    if like {
        session.dispatch(Action::LikeQuote { quote })?;
        println!("Saved to your liked quotes.");
    }
    Ok(())
}

pub async fn settings_command(
    session: &mut Session,
    command: Option<SettingsCommands>,
) -> Result<()> {
    let mut settings = session.controller.state().settings.clone();

    match command.unwrap_or(SettingsCommands::Show) {
        SettingsCommands::Show => {
            print_settings(&settings);
            return Ok(());
        }
        SettingsCommands::Name { name } => settings.name = name,
        SettingsCommands::Tone { tone, prompt } => {
            let tone = PersonaTone::from_str(&tone).with_context(|| {
                format!("Unknown tone '{tone}', expected empathetic, stoic, motivational, analytical or custom")
            })?;
            if tone == PersonaTone::Custom && prompt.is_none() && settings.custom_tone_prompt.is_none()
            {
                bail!("The custom tone needs a description, pass it with --prompt");
            }
            settings.tone = tone;
            if prompt.is_some() {
                settings.custom_tone_prompt = prompt;
            }
        }
        SettingsCommands::ShareJournal { enabled } => settings.share_journal_content = enabled,
        SettingsCommands::Lock { pin } => {
            if !UserSettings::is_valid_pin(&pin) {
                bail!("PIN must be exactly {PIN_LENGTH} digits");
            }
            settings.app_lock_enabled = true;
            settings.app_lock_pin = pin;
        }
        SettingsCommands::Unlock => {
            settings.app_lock_enabled = false;
            settings.app_lock_pin.clear();
        }
    }

    session.dispatch(Action::UpdateSettings(Box::new(settings)))?;
    println!("Settings saved.");
    Ok(())
}

fn print_settings(settings: &UserSettings) {
    println!("Name:          {}", settings.name);
    println!("Tone:          {}", settings.tone);
    if let Some(prompt) = &settings.custom_tone_prompt {
        println!("  Persona:     {prompt}");
    }
    println!("Share journal: {}", settings.share_journal_content);
    println!(
        "App lock:      {}",
        if settings.app_lock_enabled { "on" } else { "off" }
    );
    println!("Liked quotes:  {}", settings.liked_quotes.len());
}
