//! Insights command

use anyhow::{Context, Result};
use serde_json::json;

use lumen::assistant::Persona;
use lumen::insights::InsightRange;

use super::{blocking, Session};

const BAR_WIDTH: usize = 10;

pub async fn insights_command(
    session: &mut Session,
    range: &str,
    no_ai: bool,
    json: bool,
) -> Result<()> {
    let range = InsightRange::from_str(range)
        .with_context(|| format!("Unknown range '{range}', expected week, month, 90days or all"))?;

    let points = session.controller.insight_series(range);
    let summary = session.controller.insight_summary();

    let insight = if no_ai || !summary.has_data() {
        None
    } else {
        let delegate = session.delegate.clone();
        let persona = Persona::from_settings(&session.controller.state().settings);
        let digest = summary.clone();
        Some(blocking(move || delegate.insight(&digest, &persona)).await?)
    };

    if json {
        let output = json!({
            "range": range,
            "points": points,
            "summary": summary,
            "insight": insight,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Insights: {}\n", range.label());
    println!("  {:<10}  {:<5}  {}", "Day", "Mood", "Done");
    for point in &points {
        let mood = if point.mood == 0 {
            "-".to_string()
        } else {
            point.mood.to_string()
        };
        let bar = "#".repeat((point.productivity as usize).min(BAR_WIDTH));
        println!(
            "  {:<10}  {:<5}  {} {}",
            point.date.format("%Y-%m-%d"),
            mood,
            bar,
            point.productivity
        );
    }

    println!();
    println!(
        "Tasks: {}/{} completed",
        summary.tasks_completed, summary.task_count
    );
    println!("Journal entries: {}", summary.journal_count);
    match summary.average_mood {
        Some(avg) => println!("Average mood: {avg:.1}/5 over {} logs", summary.mood_count),
        None => println!("Average mood: no logs yet"),
    }
    if !summary.active_habits.is_empty() {
        println!("Habits on a streak: {}", summary.active_habits.join(", "));
    }

    if let Some(insight) = insight {
        println!("\nSophus says:\n{insight}");
    } else if !summary.has_data() {
        println!("\nLog a mood or finish a task to get a written insight.");
    }

    Ok(())
}
