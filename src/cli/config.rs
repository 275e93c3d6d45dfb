//! Config commands

use std::path::PathBuf;

use anyhow::{bail, Result};

use lumen::config::{self, Config};

use super::GlobalOpts;
use crate::commands::ConfigCommands;

/// Default configuration content for `lumen config init`
pub const DEFAULT_CONFIG: &str = r#"# Lumen Configuration
# ===================
#
# Every section and key is optional. Remove a line to fall back to its default.

[storage]
# Directory holding lumen.db (default: ~/.lumen)
# data_dir = "/home/me/.lumen"

# Sophus, the companion. Without an API key Lumen runs offline with
# canned prompts and no chat.
[assistant]
# Environment variable holding your Gemini API key
api_key_env = "GEMINI_API_KEY"
model = "gemini-2.5-flash"
base_url = "https://generativelanguage.googleapis.com/v1beta"
# Seconds before a request is given up
timeout_secs = 60

[app]
# XP awarded for a task when none is given
default_task_xp = 20
"#;

fn target_path(opts: &GlobalOpts) -> PathBuf {
    opts.config
        .clone()
        .unwrap_or_else(Config::global_config_path)
}

pub async fn config_command(opts: &GlobalOpts, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Init { force } => {
            let config_path = target_path(opts);

            if config_path.exists() && !force {
                bail!(
                    "Configuration already exists: {}\nUse --force to overwrite.",
                    config_path.display()
                );
            }

            config::write_locked(&config_path, DEFAULT_CONFIG)?;
            println!("Created: {}", config_path.display());
        }
        ConfigCommands::Show => {
            let config = Config::load(opts.config.as_deref())?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigCommands::Set { key, value } => {
            let config_path = target_path(opts);

            let mut config = Config::load(Some(&config_path))?;
            config.set(&key, &value)?;
            config.save(&config_path)?;
            tracing::info!(%key, path = %config_path.display(), "Config updated");
            println!("{key} = {value}");
        }
    }

    Ok(())
}
