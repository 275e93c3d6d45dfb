//! Habit commands

use anyhow::{Context, Result};

use lumen::app::{Action, NewHabit};
use lumen::HabitKind;

use super::{resolve_id, short_id, Session};
use crate::commands::HabitCommands;

pub async fn habit_command(session: &mut Session, command: HabitCommands) -> Result<()> {
    match command {
        HabitCommands::Add {
            title,
            kind,
            xp,
            penalty,
            time,
            duration,
        } => {
            let kind =
                HabitKind::from_str(&kind).with_context(|| format!("Unknown habit kind: {kind}"))?;
            session.dispatch(Action::AddHabit(NewHabit {
                title,
                kind,
                xp_value: xp,
                penalty_value: penalty,
                time,
                duration,
            }))?;
            if let Some(habit) = session.controller.state().habits.last() {
                println!("Added habit {}", short_id(&habit.id));
            }
        }
        HabitCommands::List { json } => {
            let habits = &session.controller.state().habits;
            if json {
                println!("{}", serde_json::to_string_pretty(habits)?);
                return Ok(());
            }
            if habits.is_empty() {
                println!("No habits yet.");
                return Ok(());
            }

            let today = session.controller.today();
            println!("Habits ({}):\n", habits.len());
            for habit in habits {
                let mark = if habit.is_done_on(today) { "x" } else { " " };
                let slot = habit.time.map(|t| format!(" @{t}")).unwrap_or_default();
                println!(
                    "  [{}] {} {} ({}){}  streak {}  +{} XP",
                    mark,
                    short_id(&habit.id),
                    habit.title,
                    habit.kind.as_str(),
                    slot,
                    habit.streak,
                    habit.xp_value
                );
                if habit.kind == HabitKind::Break {
                    println!("        relapse costs {} XP", habit.penalty_value);
                }
            }
        }
        HabitCommands::Toggle { id } => {
            let id = resolve_habit(session, &id)?;
            session.dispatch(Action::ToggleHabit { id: id.clone() })?;
            let today = session.controller.today();
            if let Some(habit) = session.controller.state().habits.iter().find(|h| h.id == id) {
                let verb = if habit.is_done_on(today) { "Done" } else { "Undone" };
                println!("{verb}: {} (streak {})", habit.title, habit.streak);
            }
        }
        HabitCommands::Relapse { id } => {
            let id = resolve_habit(session, &id)?;
            session.dispatch(Action::RelapseHabit { id })?;
            println!("Relapse recorded. Tomorrow is a new day.");
        }
        HabitCommands::Delete { id } => {
            let id = resolve_habit(session, &id)?;
            session.dispatch(Action::DeleteHabit { id })?;
            println!("Habit deleted.");
        }
    }

    Ok(())
}

fn resolve_habit(session: &Session, id: &str) -> Result<String> {
    let habits = &session.controller.state().habits;
    resolve_id("habit", habits.iter().map(|h| h.id.as_str()), id)
}
