//! AI Mentor — turns a skill gap into a learning plan via the LLM client.
//!
//! Failures never leave this module as errors. Each outcome is an `Advisory`
//! variant, and only the HTTP layer flattens it to text through `Display`.

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use crate::llm_client::{LlmError, TextGenerator};

pub mod prompts;

use prompts::build_mentor_prompt;

/// Outcome of one mentor request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// Nothing is missing; the API is not called.
    AllSkillsCovered,
    Generated(String),
    /// No API key configured; the API is not called.
    ConfigMissing,
    HttpError(u16),
    Timeout,
    Transport(String),
    /// The first content part carried no text.
    EmptyText,
    /// Truncated dump of a body without candidates or parts.
    UnexpectedShape(String),
}

impl From<LlmError> for Advisory {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Api { status, .. } => Advisory::HttpError(status),
            LlmError::Timeout => Advisory::Timeout,
            LlmError::Http(e) => Advisory::Transport(e.to_string()),
            LlmError::Parse(e) => Advisory::Transport(e.to_string()),
            LlmError::EmptyContent => Advisory::EmptyText,
            LlmError::UnexpectedShape(raw) => Advisory::UnexpectedShape(raw),
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::AllSkillsCovered => f.write_str(prompts::ALL_SKILLS_COVERED),
            Advisory::Generated(text) => f.write_str(text),
            Advisory::ConfigMissing => f.write_str(prompts::CONFIG_MISSING),
            Advisory::HttpError(status) => {
                write!(f, "AI mentor unavailable - API error: {status}")
            }
            Advisory::Timeout => f.write_str(prompts::TIMEOUT),
            Advisory::Transport(message) => {
                write!(f, "AI mentor is currently unavailable. Error: {message}")
            }
            Advisory::EmptyText => f.write_str(prompts::EMPTY_RESPONSE),
            Advisory::UnexpectedShape(raw) => write!(f, "AI response format unexpected: {raw}"),
        }
    }
}

/// Builds mentor prompts and sends them to the configured generator, if any.
#[derive(Clone)]
pub struct Mentor {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl Mentor {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    /// Single best-effort attempt. Never fails; see `Advisory` for the outcomes.
    pub async fn advise(
        &self,
        career: &str,
        domain: &str,
        skills: &[String],
        missing: &[String],
    ) -> Advisory {
        if missing.is_empty() {
            return Advisory::AllSkillsCovered;
        }

        let Some(generator) = &self.generator else {
            warn!("GEMINI_KEY is not configured; skipping AI mentor");
            return Advisory::ConfigMissing;
        };

        let prompt = build_mentor_prompt(career, domain, skills, missing);

        match generator.generate(&prompt).await {
            Ok(text) => {
                info!("AI mentor plan generated ({} chars)", text.len());
                Advisory::Generated(text)
            }
            Err(e) => {
                warn!("AI mentor generation failed: {e}");
                Advisory::from(e)
            }
        }
    }
}
