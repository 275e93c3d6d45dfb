//! Journal commands

use anyhow::{bail, Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use lumen::app::{Action, NewEntry};
use lumen::{CheckInAnswer, JournalEntry, JournalKind, MAX_CHECK_IN_RATING};

use super::{blocking, resolve_id, short_id, Session};
use crate::commands::JournalCommands;

pub async fn journal_command(session: &mut Session, command: JournalCommands) -> Result<()> {
    match command {
        JournalCommands::Write { text, prompted } => {
            let prompt = if prompted {
                let prompt = fetch_prompt(session).await?;
                println!("Prompt: {prompt}");
                Some(prompt)
            } else {
                None
            };
            session.dispatch(Action::AddJournalEntry(NewEntry::Free {
                content: text,
                prompt,
            }))?;
            println!("Entry saved.");
        }
        JournalCommands::Prompt => {
            println!("{}", fetch_prompt(session).await?);
        }
        JournalCommands::Checkin { kind } => {
            let kind = JournalKind::from_str(&kind)
                .filter(JournalKind::is_check_in)
                .with_context(|| format!("Unknown check-in: {kind}"))?;

            let delegate = session.delegate.clone();
            let tone = session.controller.state().settings.tone;
            let questions = blocking(move || delegate.check_in_questions(kind, tone)).await?;

            let answers = ask(&questions).await?;
            session.dispatch(Action::AddJournalEntry(NewEntry::CheckIn { kind, answers }))?;
            println!("Check-in saved.");
        }
        JournalCommands::List { limit, json } => {
            let entries = &session.controller.state().entries;
            let shown: Vec<&JournalEntry> =
                entries.iter().take(limit.unwrap_or(entries.len())).collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
                return Ok(());
            }
            if shown.is_empty() {
                println!("No journal entries yet.");
                return Ok(());
            }

            for entry in shown {
                println!(
                    "{} {} [{}]",
                    short_id(&entry.id),
                    entry.date.format("%Y-%m-%d %H:%M"),
                    entry.kind.as_str()
                );
                if let Some(prompt) = &entry.prompt {
                    println!("  > {prompt}");
                }
                println!("  {}", entry.content);
                for answer in &entry.check_in_data {
                    println!(
                        "    {} {}/{MAX_CHECK_IN_RATING} {}",
                        answer.question, answer.rating, answer.comment
                    );
                }
                println!();
            }
        }
        JournalCommands::Delete { id } => {
            let entries = &session.controller.state().entries;
            let id = resolve_id("entry", entries.iter().map(|e| e.id.as_str()), &id)?;
            session.dispatch(Action::DeleteJournalEntry { id })?;
            println!("Entry deleted.");
        }
    }

    Ok(())
}

async fn fetch_prompt(session: &Session) -> Result<String> {
    let delegate = session.delegate.clone();
    let state = session.controller.state();
    let recent = state.entries.clone();
    let share = state.settings.share_journal_content;
    blocking(move || delegate.journal_prompt(&recent, share)).await
}

/// Ask each question on the terminal: a 0-10 rating, then a comment
async fn ask(questions: &[String]) -> Result<Vec<CheckInAnswer>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut answers = Vec::with_capacity(questions.len());

    for question in questions {
        let rating = loop {
            print!("{question} (0-{MAX_CHECK_IN_RATING}): ");
            std::io::stdout().flush()?;
            let Some(line) = lines.next_line().await? else {
                bail!("Check-in cancelled");
            };
            match line.trim().parse::<u8>() {
                Ok(r) if r <= MAX_CHECK_IN_RATING => break r,
                _ => println!("Please enter a number from 0 to {MAX_CHECK_IN_RATING}."),
            }
        };

        print!("  Notes: ");
        std::io::stdout().flush()?;
        let comment = lines.next_line().await?.unwrap_or_default();

        answers.push(CheckInAnswer {
            question: question.clone(),
            rating,
            comment: comment.trim().to_string(),
        });
    }

    Ok(answers)
}
