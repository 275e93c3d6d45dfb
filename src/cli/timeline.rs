//! Timeline commands

use anyhow::{bail, Context, Result};

use lumen::app::Action;
use lumen::schedule::{DayView, ItemKind, ItemRef, TimelineItem};
use lumen::TimeOfDay;

use super::{short_id, Session};
use crate::commands::TimelineCommands;

pub async fn timeline_command(
    session: &mut Session,
    command: Option<TimelineCommands>,
) -> Result<()> {
    match command.unwrap_or(TimelineCommands::Show { json: false }) {
        TimelineCommands::Show { json } => {
            let view = session.controller.day_view();
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_day(session, &view);
            }
        }
        TimelineCommands::Place { id, time } => {
            let item = resolve_item(session, &id)?;
            let start = TimeOfDay::parse(&time)
                .with_context(|| format!("Invalid time '{time}', expected HH:MM"))?;
            session.dispatch(Action::ScheduleItem {
                item: item.clone(),
                start_minutes: start.minutes() as i32,
            })?;
            if let Some(placed) = session.controller.day_view().find(&item) {
                println!("{} placed at {}", placed.text, slot(placed));
            }
        }
        TimelineCommands::Resize { id, minutes } => {
            let item = resolve_item(session, &id)?;
            session.dispatch(Action::ResizeItem {
                item: item.clone(),
                duration_minutes: minutes,
            })?;
            if let Some(resized) = session.controller.day_view().find(&item) {
                println!("{} now runs {}", resized.text, slot(resized));
            }
        }
        TimelineCommands::Unplace { id } => {
            let item = resolve_item(session, &id)?;
            session.dispatch(Action::UnscheduleItem { item })?;
            println!("Moved to the inbox.");
        }
    }

    Ok(())
}

/// Match an id prefix against tasks and habits alike
fn resolve_item(session: &Session, wanted: &str) -> Result<ItemRef> {
    let wanted = wanted.trim();
    let state = session.controller.state();
    let tasks = state
        .tasks
        .iter()
        .map(|t| ItemRef::Task(t.id.clone()));
    let habits = state
        .habits
        .iter()
        .map(|h| ItemRef::Habit(h.id.clone()));

    let mut matches: Vec<ItemRef> = Vec::new();
    for item in tasks.chain(habits) {
        if item.id() == wanted {
            return Ok(item);
        }
        if item.id().starts_with(wanted) {
            matches.push(item);
        }
    }

    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => bail!("No task or habit matches '{wanted}'"),
        n => bail!("'{wanted}' matches {n} items, use more characters"),
    }
}

fn slot(item: &TimelineItem) -> String {
    match (item.time, item.end_minutes()) {
        (Some(start), Some(end)) => format!(
            "{start}-{:02}:{:02} ({} min)",
            (end / 60) % 24,
            end % 60,
            item.duration
        ),
        _ => format!("unscheduled ({} min)", item.duration),
    }
}

fn print_item(item: &TimelineItem) {
    let mark = if item.completed { "x" } else { " " };
    let tag = match item.kind {
        ItemKind::Todo => "task",
        ItemKind::HabitBuild => "habit",
        ItemKind::HabitBreak => "quit",
    };
    println!(
        "  [{}] {} {:<5} {}  {}",
        mark,
        short_id(item.item.id()),
        tag,
        item.text,
        slot(item)
    );
}

fn print_day(session: &Session, view: &DayView) {
    let state = session.controller.state();
    println!(
        "{} - Level {} ({} XP), streak {}",
        session.controller.today().format("%A %d %B"),
        state.stats.level,
        state.stats.xp,
        state.stats.current_streak
    );

    println!("\nTimeline:");
    if view.timeline.is_empty() {
        println!("  (nothing scheduled)");
    }
    for item in &view.timeline {
        print_item(item);
    }

    println!("\nInbox:");
    if view.inbox.is_empty() {
        println!("  (empty)");
    }
    for item in &view.inbox {
        print_item(item);
    }

    if !view.upcoming.is_empty() {
        println!("\nUpcoming:");
        for item in &view.upcoming {
            print_item(item);
        }
    }
}
