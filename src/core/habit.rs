use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use super::day::DayKey;
use super::streak;

pub const DEFAULT_NAME: &str = "Untitled";
pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_COLOR: &str = "#6366f1";

/// Categories offered to users and the coach. Any other string is accepted too.
pub const SUGGESTED_CATEGORIES: [&str; 5] =
    ["Health", "Productivity", "Fitness", "Mindset", "General"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            _ => None,
        }
    }
}

/// Partial habit as typed into the add form or returned by the AI coach.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub frequency: Option<Frequency>,
    #[serde(default)]
    pub color: Option<String>,
}

impl HabitDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub frequency: Frequency,
    pub created_at: i64,
    #[serde(default)]
    pub completed_dates: BTreeSet<DayKey>,
    #[serde(default)]
    pub streak: u32,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

/// Trimmed value, or `None` when missing or blank.
fn filled(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Habit {
    /// Build a fresh habit from a draft, filling in defaults for blank fields.
    pub fn from_draft(draft: HabitDraft, id: Uuid, created_at: i64) -> Self {
        Self {
            id,
            name: filled(draft.name).unwrap_or_else(|| DEFAULT_NAME.to_string()),
            description: filled(draft.description).unwrap_or_default(),
            category: filled(draft.category).unwrap_or_else(default_category),
            frequency: draft.frequency.unwrap_or_default(),
            created_at,
            completed_dates: BTreeSet::new(),
            streak: 0,
            color: filled(draft.color).unwrap_or_else(default_color),
        }
    }

    pub fn is_completed_on(&self, day: DayKey) -> bool {
        self.completed_dates.contains(&day)
    }

    /// A habit is due if it hasn't been completed today.
    pub fn is_due(&self, today: DayKey) -> bool {
        !self.is_completed_on(today)
    }

    /// Flip completion for `day` and re-derive the streak. Returns whether the
    /// day is now completed.
    pub fn toggle_day(&mut self, day: DayKey, today: DayKey) -> bool {
        let completed = if self.completed_dates.remove(&day) {
            false
        } else {
            self.completed_dates.insert(day);
            true
        };
        self.recalculate_streak(today);
        completed
    }

    /// Recalculate streak from completion history.
    pub fn recalculate_streak(&mut self, today: DayKey) {
        self.streak = streak::current_streak(&self.completed_dates, today);
    }

    pub fn best_streak(&self) -> u32 {
        streak::best_streak(&self.completed_dates).max(self.streak)
    }

    pub fn completion_count(&self) -> usize {
        self.completed_dates.len()
    }

    /// Local calendar day the habit was created on.
    pub fn created_day(&self) -> Option<DayKey> {
        DayKey::from_millis(self.created_at)
    }

    pub fn summary(&self) -> HabitSummary {
        HabitSummary {
            name: self.name.clone(),
            completions_count: self.completion_count(),
            streak: self.streak,
        }
    }
}

/// Per-habit figures handed to the coach for a weekly insight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitSummary {
    pub name: String,
    pub completions_count: usize,
    pub streak: u32,
}
