//! Task commands

use anyhow::{Context, Result};

use lumen::app::{Action, NewTask};
use lumen::{Priority, Recurrence, Task, TaskKind};

use super::{blocking, parse_date, resolve_id, short_id, Session};
use crate::commands::TaskCommands;

pub async fn task_command(session: &mut Session, command: TaskCommands) -> Result<()> {
    match command {
        TaskCommands::Add {
            text,
            date,
            time,
            duration,
            priority,
            repeat,
            xp,
            estimate,
            affirmation,
        } => {
            let priority = Priority::from_str(&priority)
                .with_context(|| format!("Unknown priority: {priority}"))?;
            let recurrence = Recurrence::from_str(&repeat)
                .with_context(|| format!("Unknown recurrence: {repeat}"))?;
            let date = date.as_deref().map(parse_date).transpose()?;

            let xp_value = if estimate {
                let delegate = session.delegate.clone();
                let description = text.clone();
                let minutes = duration.unwrap_or(lumen::DEFAULT_TASK_DURATION);
                let estimated =
                    blocking(move || delegate.estimate_xp(&description, priority, minutes)).await?;
                println!("Estimated reward: {estimated} XP");
                Some(estimated)
            } else {
                xp
            };

            session.dispatch(Action::AddTask(NewTask {
                text,
                kind: if affirmation {
                    TaskKind::Affirmation
                } else {
                    TaskKind::Todo
                },
                date,
                due_time: time,
                duration,
                priority,
                recurrence,
                xp_value,
            }))?;

            if let Some(task) = session.controller.state().tasks.last() {
                println!("Added task {}", short_id(&task.id));
            }
        }
        TaskCommands::List { all, json } => {
            let tasks: Vec<&Task> = session
                .controller
                .state()
                .tasks
                .iter()
                .filter(|t| all || !t.completed)
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
                return Ok(());
            }
            if tasks.is_empty() {
                println!("No tasks found.");
                return Ok(());
            }

            println!("Tasks ({}):\n", tasks.len());
            for task in tasks {
                print_task(task);
            }
        }
        TaskCommands::Done { id } => {
            let id = resolve_task(session, &id)?;
            session.dispatch(Action::CompleteTask { id: id.clone() })?;
            let state = session.controller.state();
            if let Some(task) = state.tasks.iter().find(|t| t.id == id) {
                let verb = if task.completed { "Completed" } else { "Reopened" };
                println!("{verb}: {}", task.text);
            }
        }
        TaskCommands::Delete { id } => {
            let id = resolve_task(session, &id)?;
            session.dispatch(Action::DeleteTask { id })?;
            println!("Task deleted.");
        }
        TaskCommands::Suggest { context, add } => {
            let delegate = session.delegate.clone();
            let state = session.controller.state();
            let open = state.tasks.iter().filter(|t| !t.completed).count();
            let habits = state.habits.clone();
            let suggestions =
                blocking(move || delegate.recommend_tasks(open, &habits, &context)).await?;

            for s in &suggestions {
                println!("  [{}] {} (+{} XP)", s.priority, s.text, s.xp);
            }
            if add {
                for s in suggestions {
                    session.dispatch(Action::AddTask(NewTask {
                        priority: s.priority,
                        xp_value: Some(s.xp),
                        ..NewTask::new(s.text)
                    }))?;
                }
                println!("Suggestions added to the inbox.");
            }
        }
    }

    Ok(())
}

fn resolve_task(session: &Session, id: &str) -> Result<String> {
    let tasks = &session.controller.state().tasks;
    resolve_id("task", tasks.iter().map(|t| t.id.as_str()), id)
}

fn print_task(task: &Task) {
    let mark = if task.completed { "x" } else { " " };
    let time = task
        .due_time
        .map(|t| format!(" {t}"))
        .unwrap_or_default();
    println!(
        "  [{}] {} {}{} {} ({} min, {}, +{} XP)",
        mark,
        short_id(&task.id),
        task.date,
        time,
        task.text,
        task.duration,
        task.priority,
        task.reward()
    );
    if task.recurrence != Recurrence::None {
        println!("        repeats {}", task.recurrence);
    }
}
