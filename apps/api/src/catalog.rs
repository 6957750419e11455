use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Career name → required skills, in the order the data file lists them.
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct CareerCatalog {
    careers: HashMap<String, Vec<String>>,
}

impl CareerCatalog {
    pub fn new(careers: HashMap<String, Vec<String>>) -> Self {
        Self { careers }
    }

    /// Reads the catalog from a JSON object of the form `{"Career": ["Skill", ...]}`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading career catalog from {}", path.display());

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read career catalog: {}", path.display()))?;
        let careers: HashMap<String, Vec<String>> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid career catalog JSON: {}", path.display()))?;

        Ok(Self::new(careers))
    }

    /// Required skills for `career`. Unknown careers require nothing.
    pub fn required_skills(&self, career: &str) -> &[String] {
        self.careers.get(career).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn career_count(&self) -> usize {
        self.careers.len()
    }
}
