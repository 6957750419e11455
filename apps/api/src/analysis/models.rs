use serde::{Deserialize, Serialize};

pub const DEFAULT_DOMAIN: &str = "Technology";

/// Body of `POST /analyze`.
///
/// `career` is required. `domain` and `skills` fall back to their defaults when
/// absent or `null`; any other shape is rejected.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub career: String,
    pub domain: Option<String>,
    pub skills: Option<Vec<String>>,
}

impl AnalyzeRequest {
    pub fn domain(&self) -> &str {
        self.domain.as_deref().unwrap_or(DEFAULT_DOMAIN)
    }

    pub fn skills(&self) -> &[String] {
        self.skills.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub career: String,
    pub domain: String,
    pub readiness: usize,
    pub xp: usize,
    pub level: usize,
    pub missing: Vec<String>,
    pub ai_text: String,
}
