//! Goal commands

use anyhow::Result;

use lumen::app::Action;
use lumen::GoalStatus;

use super::chat::stream_reply;
use super::{resolve_id, short_id, Session};
use crate::commands::GoalCommands;

pub async fn goal_command(session: &mut Session, command: GoalCommands) -> Result<()> {
    match command {
        GoalCommands::Add { title } => {
            session.dispatch(Action::AddGoal { title })?;
            if let Some(goal) = session.controller.state().goals.first() {
                println!("Added goal {}", short_id(&goal.id));
            }
        }
        GoalCommands::List { json } => {
            let goals = &session.controller.state().goals;
            if json {
                println!("{}", serde_json::to_string_pretty(goals)?);
                return Ok(());
            }
            if goals.is_empty() {
                println!("No goals yet. Add one with: lumen goal add <title>");
                return Ok(());
            }

            for goal in goals {
                let mark = match goal.status {
                    GoalStatus::Completed => "x",
                    GoalStatus::Active => " ",
                };
                println!(
                    "  [{}] {} {}  (since {})",
                    mark,
                    short_id(&goal.id),
                    goal.title,
                    goal.date_added.format("%Y-%m-%d")
                );
            }
        }
        GoalCommands::Done { id } => set_status(session, &id, GoalStatus::Completed)?,
        GoalCommands::Reopen { id } => set_status(session, &id, GoalStatus::Active)?,
        GoalCommands::Delete { id } => {
            let id = resolve_goal(session, &id)?;
            session.dispatch(Action::DeleteGoal { id })?;
            println!("Goal deleted.");
        }
        GoalCommands::Breakdown { title } => {
            session.dispatch(Action::BreakdownGoal { title })?;
            let turn = session.controller.begin_pending_reply()?;
            stream_reply(session, turn).await?;
        }
    }

    Ok(())
}

fn set_status(session: &mut Session, id: &str, status: GoalStatus) -> Result<()> {
    let id = resolve_goal(session, id)?;
    session.dispatch(Action::SetGoalStatus { id, status })?;
    println!("Goal marked {status}.");
    Ok(())
}

fn resolve_goal(session: &Session, id: &str) -> Result<String> {
    let goals = &session.controller.state().goals;
    resolve_id("goal", goals.iter().map(|g| g.id.as_str()), id)
}
