use clap::{Args, Parser, Subcommand};

use habitflow::config::{Language, Theme};
use habitflow::core::{DayKey, Frequency, HabitDraft};

#[derive(Debug, Parser)]
#[command(name = "habitflow")]
#[command(about = "Track daily habits, streaks and trends", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log debug messages to the journal
    #[arg(long, global = true)]
    pub debug: bool,

    /// Defaults to `list`
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, PartialEq, Subcommand)]
pub enum Command {
    /// Show habits and today's status
    #[command(alias = "ls")]
    List,
    /// Add a habit
    Add(AddArgs),
    /// Mark or unmark a habit as done
    #[command(alias = "done")]
    Toggle {
        /// Name, name prefix or id prefix
        #[arg(required = true)]
        habit: Vec<String>,
        /// Day to toggle instead of today (YYYY-MM-DD)
        #[arg(long, value_parser = parse_day)]
        date: Option<DayKey>,
    },
    /// Delete a habit
    #[command(alias = "rm")]
    Remove {
        /// Name, name prefix or id prefix
        #[arg(required = true)]
        habit: Vec<String>,
    },
    /// Streaks, totals and the last 7 days
    Stats,
    /// Ask the coach for habits that serve a goal
    Suggest {
        #[arg(required = true)]
        goal: Vec<String>,
        /// Suggestions to add, numbered from 1 (e.g. 1,3)
        #[arg(long, value_delimiter = ',', value_parser = parse_index)]
        accept: Vec<usize>,
    },
    /// Ask the coach for a weekly insight
    Insight,
    /// Show or change preferences
    Prefs {
        /// blue or pink
        #[arg(long, value_parser = parse_theme)]
        theme: Option<Theme>,
        /// on or off
        #[arg(long, value_parser = parse_switch)]
        dark: Option<bool>,
        /// en or nl
        #[arg(long, value_parser = parse_language)]
        language: Option<Language>,
    },
    /// Store the Anthropic API key in the keyring
    SetKey { key: String },
    /// Check the configured API key
    TestKey,
    /// Delete all habits
    Reset {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, PartialEq, Args)]
pub struct AddArgs {
    /// Habit name; "Untitled" when left out
    pub name: Vec<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Health, Productivity, Fitness, Mindset, General, or your own
    #[arg(long)]
    pub category: Option<String>,
    /// Shorthand for --frequency weekly
    #[arg(long, conflicts_with = "frequency")]
    pub weekly: bool,
    /// daily or weekly
    #[arg(long, value_parser = parse_frequency)]
    pub frequency: Option<Frequency>,
    /// Hex color; the theme color when left out
    #[arg(long)]
    pub color: Option<String>,
}

impl AddArgs {
    pub fn into_draft(self) -> HabitDraft {
        let name = joined(&self.name);
        HabitDraft {
            name: (!name.is_empty()).then_some(name),
            description: self.description,
            category: self.category,
            frequency: self.frequency.or(self.weekly.then_some(Frequency::Weekly)),
            color: self.color,
        }
    }
}

/// Positional words as one string: `toggle drink water`.
pub fn joined(words: &[String]) -> String {
    words.join(" ").trim().to_string()
}

fn parse_day(s: &str) -> Result<DayKey, String> {
    s.parse().map_err(|_| format!("expected YYYY-MM-DD, got {}", s))
}

fn parse_index(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("invalid suggestion number: {}", s)),
    }
}

fn parse_theme(s: &str) -> Result<Theme, String> {
    Theme::parse(s).ok_or_else(|| format!("unknown theme: {}", s))
}

fn parse_language(s: &str) -> Result<Language, String> {
    Language::parse(s).ok_or_else(|| format!("unknown language: {}", s))
}

fn parse_frequency(s: &str) -> Result<Frequency, String> {
    Frequency::parse(s).ok_or_else(|| format!("unknown frequency: {}", s))
}

fn parse_switch(s: &str) -> Result<bool, String> {
    match s {
        "on" | "true" => Ok(true),
        "off" | "false" => Ok(false),
        _ => Err(format!("expected on or off, got {}", s)),
    }
}
