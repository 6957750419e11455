use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_API_BASE;

/// Application configuration loaded from environment variables.
/// Everything except `GEMINI_KEY` has a default; a missing key only disables the AI mentor.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_key: Option<String>,
    pub gemini_api_base: String,
    pub careers_path: String,
    pub index_path: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_key: optional_env("GEMINI_KEY"),
            gemini_api_base: env_or("GEMINI_API_BASE", DEFAULT_API_BASE),
            careers_path: env_or("CAREERS_PATH", "data/careers.json"),
            index_path: env_or("INDEX_PATH", "templates/index.html"),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

/// Unset and blank values are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}
