use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod cli;
mod commands;

use commands::Commands;

#[derive(Parser)]
#[command(name = "lumen")]
#[command(about = "Lumen - level up your life one entry at a time")]
#[command(version)]
struct Cli {
    /// Directory holding lumen.db (defaults to ~/.lumen)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Path to the config file (defaults to ~/.lumen/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// PIN for a locked app
    #[arg(long, global = true)]
    pin: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = cli::GlobalOpts {
        data_dir: cli.data_dir,
        config: cli.config,
        pin: cli.pin,
    };

    match cli.command {
        // Config commands work without opening the database
        Some(Commands::Config { command }) => cli::config::config_command(&opts, command).await?,
        Some(command) => cli::run(cli::Session::open(opts)?, command).await?,
        None => {
            // Default: today at a glance
            let mut session = cli::Session::open(opts)?;
            cli::timeline::timeline_command(&mut session, None).await?;
        }
    }

    Ok(())
}
