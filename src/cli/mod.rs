//! CLI command implementations

pub mod chat;
pub mod config;
pub mod goal;
pub mod habit;
pub mod insights;
pub mod journal;
pub mod mood;
pub mod settings;
pub mod status;
pub mod task;
pub mod timeline;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;

use lumen::app::{Action, Controller};
use lumen::assistant::{delegate_for, Delegate};
use lumen::clock::SystemClock;
use lumen::config::Config;
use lumen::gamification::GamificationEvent;
use lumen::store::Store;

use crate::commands::Commands;

/// Flags shared by every command
#[derive(Debug, Clone)]
pub struct GlobalOpts {
    pub data_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub pin: Option<String>,
}

/// Everything a command needs: config, an unlocked controller and the
/// companion
pub struct Session {
    pub opts: GlobalOpts,
    pub config: Config,
    pub controller: Controller,
    pub delegate: Arc<dyn Delegate>,
}

impl Session {
    pub fn open(opts: GlobalOpts) -> Result<Self> {
        let config = Config::load(opts.config.as_deref())?;
        let data_dir = opts.data_dir.clone().unwrap_or_else(|| config.data_dir());
        let store = Store::open_in_dir(&data_dir)?;

        let mut controller =
            Controller::open(store, Arc::new(SystemClock))?.with_config(&config.app);
        if controller.is_locked() {
            let pin = opts
                .pin
                .as_deref()
                .context("Lumen is locked. Pass your PIN with --pin")?;
            controller.unlock(pin).context("Wrong PIN")?;
        }

        for event in controller.start_session()? {
            tracing::info!("{event}");
        }

        let delegate: Arc<dyn Delegate> = Arc::from(delegate_for(&config.assistant));
        tracing::debug!(delegate = delegate.name(), data_dir = %data_dir.display(), "Session ready");

        Ok(Self {
            opts,
            config,
            controller,
            delegate,
        })
    }

    /// Dispatch and print whatever the action earned or cost
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        let events = self.controller.dispatch(action)?;
        report(&events);
        Ok(())
    }
}

/// Run a command against an open session
pub async fn run(mut session: Session, command: Commands) -> Result<()> {
    let s = &mut session;
    match command {
        Commands::Status { json } => status::status_command(s, json).await,
        Commands::Task { command } => task::task_command(s, command).await,
        Commands::Habit { command } => habit::habit_command(s, command).await,
        Commands::Timeline { command } => timeline::timeline_command(s, command).await,
        Commands::Journal { command } => journal::journal_command(s, command).await,
        Commands::Mood { command } => mood::mood_command(s, command).await,
        Commands::Goal { command } => goal::goal_command(s, command).await,
        Commands::Chat { command } => chat::chat_command(s, command).await,
        Commands::Insights { range, no_ai, json } => {
            insights::insights_command(s, &range, no_ai, json).await
        }
        Commands::Quote { like } => settings::quote_command(s, like).await,
        Commands::Settings { command } => settings::settings_command(s, command).await,
        Commands::Config { command } => config::config_command(&s.opts, command).await,
        Commands::Export => status::export_command(s),
        Commands::Reset { yes } => status::reset_command(s, yes),
    }
}

/// Run a blocking companion call off the async runtime
pub async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .context("Companion task failed")
}

pub fn report(events: &[GamificationEvent]) {
    for event in events {
        println!("  {event}");
    }
}

/// First characters of an id, enough to type back
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Find the one id equal to or starting with `wanted`
pub fn resolve_id<'a>(
    kind: &str,
    ids: impl IntoIterator<Item = &'a str>,
    wanted: &str,
) -> Result<String> {
    let wanted = wanted.trim();
    let mut matches = Vec::new();
    for id in ids {
        if id == wanted {
            return Ok(id.to_string());
        }
        if id.starts_with(wanted) {
            matches.push(id);
        }
    }

    match matches.as_slice() {
        [one] => Ok(one.to_string()),
        [] => bail!("No {kind} matches '{wanted}'"),
        _ => bail!("'{wanted}' matches {} {kind}s, use more characters", matches.len()),
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{value}', expected YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_id_by_prefix() {
        let ids = ["a1b2c3", "a1ffff", "zz0000"];
        assert_eq!(resolve_id("task", ids, "zz").unwrap(), "zz0000");
        assert_eq!(resolve_id("task", ids, "a1b2c3").unwrap(), "a1b2c3");
        assert!(resolve_id("task", ids, "a1").is_err());
        assert!(resolve_id("task", ids, "q").is_err());
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }
}
