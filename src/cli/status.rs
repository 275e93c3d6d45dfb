//! Status, export and reset commands

use anyhow::{bail, Result};

use lumen::config::Config;
use lumen::gamification::{progress_in_level, xp_to_next_level, XpKind};

use super::Session;

/// Show level, XP, streak and badges
pub async fn status_command(session: &Session, json: bool) -> Result<()> {
    let state = session.controller.state();
    let stats = &state.stats;

    if json {
        let value = serde_json::json!({
            "stats": stats,
            "badges": state.badges,
            "companion": companion_label(session.delegate.name(), &session.config),
            "data_dir": session.opts.data_dir.clone().unwrap_or_else(|| session.config.data_dir()),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let filled = ((progress_in_level(stats.xp) * 20.0) as usize).min(20);
    println!("{} [{}]", state.settings.name, stats.rank);
    println!(
        "  Level {}  [{}{}]  {} XP ({} to next)",
        stats.level,
        "#".repeat(filled),
        "-".repeat(20 - filled),
        stats.xp,
        xp_to_next_level(stats.xp)
    );
    println!(
        "  Streak: {} day(s), best {}",
        stats.current_streak, stats.longest_streak
    );
    println!(
        "  Tasks completed: {}  Journal entries: {}  Moods logged: {}",
        stats.tasks_completed, stats.journals_written, stats.moods_logged
    );
    println!(
        "  Companion: {}",
        companion_label(session.delegate.name(), &session.config)
    );

    let unlocked = state.badges.iter().filter(|b| b.unlocked).count();
    println!("\nBadges ({}/{}):", unlocked, state.badges.len());
    for badge in &state.badges {
        let mark = if badge.unlocked { "x" } else { " " };
        println!("  [{}] {} - {}", mark, badge.name, badge.description);
    }

    if !stats.xp_history.is_empty() {
        println!("\nRecent XP:");
        for log in stats.xp_history.iter().rev().take(5) {
            let sign = match log.kind {
                XpKind::Gain => "+",
                XpKind::Loss => "-",
            };
            println!("  {}{:<4} {}", sign, log.amount, log.source);
        }
    }

    Ok(())
}

/// Delegate name, plus the model when answers come from the network
fn companion_label(delegate: &str, config: &Config) -> String {
    if delegate == "offline" {
        format!("{delegate} (set {} to chat)", config.assistant.api_key_env)
    } else {
        format!("{delegate} ({})", config.assistant.model)
    }
}

/// Dump every collection as one JSON document
pub fn export_command(session: &Session) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(session.controller.state())?
    );
    Ok(())
}

pub fn reset_command(session: &mut Session, yes: bool) -> Result<()> {
    if !yes {
        bail!("This deletes all journal entries, tasks, habits, goals and progress. Re-run with --yes to confirm.");
    }
    session.controller.reset()?;
    println!("All data deleted.");
    Ok(())
}
