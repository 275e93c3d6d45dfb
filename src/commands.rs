//! CLI command definitions for lumen.

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Show level, XP, streak and badges
    Status {
        /// Print JSON instead of human output
        #[arg(long)]
        json: bool,
    },

    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Manage habits
    Habit {
        #[command(subcommand)]
        command: HabitCommands,
    },

    /// Today's timeline and inbox
    Timeline {
        #[command(subcommand)]
        command: Option<TimelineCommands>,
    },

    /// Write and read journal entries
    Journal {
        #[command(subcommand)]
        command: JournalCommands,
    },

    /// Log and review moods
    Mood {
        #[command(subcommand)]
        command: MoodCommands,
    },

    /// Manage goals
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },

    /// Talk to Sophus
    Chat {
        #[command(subcommand)]
        command: ChatCommands,
    },

    /// Mood and productivity over time
    Insights {
        /// week, month, 90days or all
        #[arg(long, short = 'r', default_value = "week")]
        range: String,
        /// Skip the written insight from the companion
        #[arg(long)]
        no_ai: bool,
        /// Print JSON instead of human output
        #[arg(long)]
        json: bool,
    },

    /// Quote of the day
    Quote {
        /// Add the quote to your liked quotes
        #[arg(long)]
        like: bool,
    },

    /// Show or change user settings
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommands>,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Print all stored data as JSON
    Export,

    /// Delete all data and start over
    Reset {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task
    Add {
        text: String,
        /// Day the task belongs to (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
        /// Time slot (HH:MM); puts the task on the timeline
        #[arg(long, short = 't')]
        time: Option<String>,
        /// Duration in minutes
        #[arg(long, short = 'd')]
        duration: Option<u32>,
        /// low, medium or high
        #[arg(long, short = 'p', default_value = "medium")]
        priority: String,
        /// none, daily, weekly or monthly
        #[arg(long, default_value = "none")]
        repeat: String,
        /// XP reward
        #[arg(long, conflicts_with = "estimate")]
        xp: Option<u32>,
        /// Ask the companion to estimate the XP reward
        #[arg(long)]
        estimate: bool,
        /// Add as an affirmation instead of a to-do
        #[arg(long)]
        affirmation: bool,
    },
    /// List tasks
    List {
        /// Include completed tasks
        #[arg(long, short = 'a')]
        all: bool,
        /// Print JSON instead of human output
        #[arg(long)]
        json: bool,
    },
    /// Complete a task, or reopen it if already done
    Done { id: String },
    /// Delete a task
    Delete { id: String },
    /// Ask the companion for task suggestions
    Suggest {
        /// Extra context for the suggestions
        #[arg(default_value = "General productivity")]
        context: String,
        /// Add every suggestion to today's inbox
        #[arg(long)]
        add: bool,
    },
}

#[derive(Subcommand)]
pub enum HabitCommands {
    /// Add a habit
    Add {
        title: String,
        /// build or break
        #[arg(long, short = 'k', default_value = "build")]
        kind: String,
        /// XP for each day done
        #[arg(long)]
        xp: Option<u32>,
        /// XP lost on relapse (break habits)
        #[arg(long)]
        penalty: Option<u32>,
        /// Time slot (HH:MM)
        #[arg(long, short = 't')]
        time: Option<String>,
        /// Duration in minutes
        #[arg(long, short = 'd')]
        duration: Option<u32>,
    },
    /// List habits
    List {
        /// Print JSON instead of human output
        #[arg(long)]
        json: bool,
    },
    /// Mark today done, or undo it
    Toggle { id: String },
    /// Record a relapse (break habits only)
    Relapse { id: String },
    /// Delete a habit
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum TimelineCommands {
    /// Show today's timeline and inbox
    Show {
        /// Print JSON instead of human output
        #[arg(long)]
        json: bool,
    },
    /// Place a task or habit at a time (snapped to 15 minutes)
    Place { id: String, time: String },
    /// Change how long an item runs (minutes, snapped to 15)
    Resize { id: String, minutes: i32 },
    /// Move an item back to the inbox
    Unplace { id: String },
}

#[derive(Subcommand)]
pub enum JournalCommands {
    /// Write a free entry
    Write {
        text: String,
        /// Ask the companion for a prompt and attach it
        #[arg(long)]
        prompted: bool,
    },
    /// Print a journaling prompt
    Prompt,
    /// Answer a guided check-in (morning, afternoon, evening or night)
    Checkin { kind: String },
    /// List entries, newest first
    List {
        /// Limit number of results
        #[arg(long, short = 'n')]
        limit: Option<usize>,
        /// Print JSON instead of human output
        #[arg(long)]
        json: bool,
    },
    /// Delete an entry
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum MoodCommands {
    /// Log how you feel
    Log {
        mood: String,
        #[arg(long)]
        note: Option<String>,
    },
    /// List mood logs
    List {
        /// Limit number of results
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },
    /// Ask the companion to read your recent moods
    Trend,
}

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Add a goal
    Add { title: String },
    /// List goals
    List {
        /// Print JSON instead of human output
        #[arg(long)]
        json: bool,
    },
    /// Mark a goal completed
    Done { id: String },
    /// Mark a goal active again
    Reopen { id: String },
    /// Delete a goal
    Delete { id: String },
    /// Add a goal and ask the companion to break it down
    Breakdown { title: String },
}

#[derive(Subcommand)]
pub enum ChatCommands {
    /// Send a message and stream the reply
    Send { message: String },
    /// Show the conversation
    History {
        /// Limit number of results
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },
    /// Accept a proposed plan, adding its tasks
    Accept { message_id: String },
    /// Clear the conversation
    Clear,
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show current settings
    Show,
    /// Set your display name
    Name { name: String },
    /// Companion tone: empathetic, stoic, motivational, analytical or custom
    Tone {
        tone: String,
        /// Persona description for the custom tone
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Allow or forbid sharing journal text with the companion
    ShareJournal {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Require a 6-digit PIN to open the app
    Lock { pin: String },
    /// Remove the PIN lock
    Unlock,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a default config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
    /// Change one setting, e.g. `lumen config set app.default_task_xp 30`
    Set {
        /// Dotted key such as assistant.model
        key: String,
        value: String,
    },
}
