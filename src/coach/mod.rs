//! AI coaching: habit suggestions for a goal and a short weekly insight.
//!
//! The model behind the coach is reached through [`CoachBackend`]. Failures
//! are returned to the caller and never touch the habit store.

pub mod anthropic;
pub mod gate;
pub mod keyring;

use thiserror::Error;

use crate::config::Language;
use crate::core::habit::{Habit, HabitDraft, HabitSummary, SUGGESTED_CATEGORIES};
pub use gate::{InFlight, RequestGate, RequestKind};

/// Number of habits asked for per goal.
pub const SUGGESTION_COUNT: usize = 3;

#[derive(Debug, Error)]
pub enum CoachError {
    #[error("a {0} request is already in progress")]
    Busy(RequestKind),

    #[error("describe a goal first")]
    EmptyGoal,

    #[error("no Anthropic API key configured")]
    MissingApiKey,

    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse coach response: {0}")]
    Parse(String),

    #[error("the coach returned nothing")]
    Empty,

    #[error("keyring: {0}")]
    Keyring(String),
}

/// One prompt for the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub max_tokens: u32,
}

/// A text-completion service.
#[allow(async_fn_in_trait)]
pub trait CoachBackend {
    async fn complete(&self, request: &CoachRequest) -> Result<String, CoachError>;
}

/// Greeting used instead of an insight while there are no habits yet.
pub fn first_habit_message(language: Language) -> &'static str {
    match language {
        Language::En => "Add your first habit to get started!",
        Language::Nl => "Voeg je eerste gewoonte toe om aan de slag te gaan!",
    }
}

pub fn suggestion_request(goal: &str, language: Language) -> CoachRequest {
    CoachRequest {
        system: Some(format!(
            "You are a habit coach. Return ONLY a JSON array, no explanation.\n\n\
             Each object must have:\n\
             - \"name\": short habit name\n\
             - \"description\": one sentence on how to do it\n\
             - \"category\": one of {}\n\
             - \"color\": a hex color such as \"#22c55e\"\n",
            SUGGESTED_CATEGORIES.join(", "),
        )),
        prompt: format!(
            "Suggest {} specific, small, and actionable habits for someone with this goal: \"{}\".\n\
             Provide all text (name, description, category) in {}.",
            SUGGESTION_COUNT,
            goal,
            language.prompt_name(),
        ),
        max_tokens: 600,
    }
}

pub fn insight_request(summaries: &[HabitSummary], language: Language) -> CoachRequest {
    let summary_json = serde_json::to_string(summaries).unwrap_or_else(|_| "[]".to_string());
    CoachRequest {
        system: None,
        prompt: format!(
            "Based on these user habits and their recent performance: {}.\n\
             Provide a short, motivational coaching insight (2 sentences max) in {}.",
            summary_json,
            language.prompt_name(),
        ),
        max_tokens: 200,
    }
}

/// Strip markdown code fences if present.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

pub fn parse_suggestions(text: &str) -> Result<Vec<HabitDraft>, CoachError> {
    let drafts: Vec<HabitDraft> = serde_json::from_str(strip_code_fences(text))
        .map_err(|e| CoachError::Parse(format!("{} (raw: {})", e, text)))?;
    if drafts.is_empty() {
        return Err(CoachError::Empty);
    }
    Ok(drafts)
}

/// Coach front end: builds prompts, parses replies, and keeps each request
/// kind from running twice at once.
pub struct Coach<B> {
    backend: B,
    language: Language,
    suggestions: RequestGate,
    insight: RequestGate,
}

impl<B: CoachBackend> Coach<B> {
    pub fn new(backend: B, language: Language) -> Self {
        Self {
            backend,
            language,
            suggestions: RequestGate::new(RequestKind::Suggestions),
            insight: RequestGate::new(RequestKind::Insight),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_busy(&self, kind: RequestKind) -> bool {
        match kind {
            RequestKind::Suggestions => self.suggestions.is_busy(),
            RequestKind::Insight => self.insight.is_busy(),
        }
    }

    /// Ask for habit drafts that serve `goal`.
    pub async fn suggest_habits(&self, goal: &str) -> Result<Vec<HabitDraft>, CoachError> {
        let goal = goal.trim();
        if goal.is_empty() {
            return Err(CoachError::EmptyGoal);
        }
        let _in_flight = self.suggestions.try_begin()?;

        log::info!("Requesting habit suggestions");
        let text = self
            .backend
            .complete(&suggestion_request(goal, self.language))
            .await?;
        let drafts = parse_suggestions(&text)?;
        log::debug!("Coach suggested {} habit(s)", drafts.len());
        Ok(drafts)
    }

    /// A short motivational note about recent progress.
    pub async fn weekly_insight(&self, habits: &[Habit]) -> Result<String, CoachError> {
        if habits.is_empty() {
            return Ok(first_habit_message(self.language).to_string());
        }
        let _in_flight = self.insight.try_begin()?;

        let summaries: Vec<HabitSummary> = habits.iter().map(Habit::summary).collect();
        log::info!("Requesting weekly insight for {} habit(s)", summaries.len());
        let text = self
            .backend
            .complete(&insight_request(&summaries, self.language))
            .await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(CoachError::Empty);
        }
        Ok(text.to_string())
    }
}
