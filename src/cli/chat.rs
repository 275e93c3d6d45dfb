//! Chat commands

use anyhow::{Context, Result};
use std::io::Write;
use tokio::sync::mpsc;

use lumen::app::{Action, ChatTurn};
use lumen::assistant::ChatChunk;
use lumen::{ChatRole, PlanProposal};

use super::{resolve_id, short_id, Session};
use crate::commands::ChatCommands;

pub async fn chat_command(session: &mut Session, command: ChatCommands) -> Result<()> {
    match command {
        ChatCommands::Send { message } => {
            let turn = session.controller.begin_chat(&message)?;
            stream_reply(session, turn).await?;
        }
        ChatCommands::History { limit } => {
            let chat = &session.controller.state().chat;
            if chat.is_empty() {
                println!("No conversation yet.");
                return Ok(());
            }

            let skip = limit.map_or(0, |n| chat.len().saturating_sub(n));
            for message in chat.iter().skip(skip) {
                let who = match message.role {
                    ChatRole::User => "You",
                    ChatRole::Model => "Sophus",
                };
                println!("[{}] {}: {}", short_id(&message.id), who, message.text);
                if let Some(plan) = &message.plan_proposal {
                    print_plan(plan, message.is_plan_accepted);
                }
            }
        }
        ChatCommands::Accept { message_id } => {
            let chat = &session.controller.state().chat;
            let with_plans = chat
                .iter()
                .filter(|m| m.plan_proposal.is_some())
                .map(|m| m.id.as_str());
            let message_id = resolve_id("plan", with_plans, &message_id)?;

            let before = session.controller.state().tasks.len();
            session.dispatch(Action::AcceptPlan { message_id })?;
            let added = session.controller.state().tasks.len() - before;
            println!("Plan accepted, {added} task(s) added.");
        }
        ChatCommands::Clear => {
            session.dispatch(Action::ClearChat)?;
            println!("Conversation cleared.");
        }
    }

    Ok(())
}

/// Stream the companion's reply for an open turn, printing text as it
/// arrives. The delegate runs on a blocking thread and hands chunks over a
/// channel; the controller is only touched here.
pub async fn stream_reply(session: &mut Session, turn: ChatTurn) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<ChatChunk>(32);
    let delegate = session.delegate.clone();
    let history = turn.history.clone();
    let message = turn.message.clone();
    let persona = turn.persona.clone();

    let producer = tokio::task::spawn_blocking(move || {
        for chunk in delegate.stream_chat(&history, &message, &persona) {
            if tx.blocking_send(chunk).is_err() {
                break;
            }
        }
    });

    print!("Sophus: ");
    std::io::stdout().flush()?;

    let mut applied = Ok(());
    while let Some(chunk) = rx.recv().await {
        let is_tool = matches!(chunk, ChatChunk::ToolCall(_));
        if let ChatChunk::Text(text) = &chunk {
            print!("{text}");
            std::io::stdout().flush()?;
        }
        if let Err(e) = session.controller.apply_chunk(&turn, chunk) {
            applied = Err(e);
            break;
        }
        if is_tool {
            if let Some(notice) = session.controller.state().chat.last() {
                if notice.id != turn.reply_id {
                    println!("\n{}", notice.text);
                }
            }
        }
    }
    drop(rx);
    println!();

    let reply_id = turn.reply_id.clone();
    let finished = session.controller.finish_chat(turn);
    producer.await.context("Chat stream task failed")?;
    applied?;
    finished?;

    let chat = &session.controller.state().chat;
    if let Some(reply) = chat.iter().find(|m| m.id == reply_id) {
        if let Some(plan) = &reply.plan_proposal {
            print_plan(plan, false);
            println!("Accept with: lumen chat accept {}", short_id(&reply.id));
        }
    }

    Ok(())
}

fn print_plan(plan: &PlanProposal, accepted: bool) {
    let status = if accepted { " (accepted)" } else { "" };
    println!("  Plan: {}{}", plan.title, status);
    for task in &plan.tasks {
        let time = task.time.as_deref().unwrap_or("--:--");
        println!(
            "    {} {} [{}]{}",
            time,
            task.text,
            task.priority,
            task.duration
                .map(|d| format!(" {d} min"))
                .unwrap_or_default()
        );
    }
}
