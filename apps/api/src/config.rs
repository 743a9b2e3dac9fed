use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_BASE_URL;

/// Application configuration loaded from environment variables.
///
/// There is no provider API key here: users supply their own key per draft.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub openai_base_url: String,
    pub llm_request_timeout_secs: u64,
    pub seed_sample_letters: bool,
    /// Open drafts untouched this long are closed and their keys dropped.
    /// `0` disables the sweep.
    pub draft_idle_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            openai_base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            llm_request_timeout_secs: lookup("LLM_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|| "120".to_string())
                .parse::<u64>()
                .context("LLM_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            seed_sample_letters: parse_flag(lookup("SEED_SAMPLE_LETTERS").as_deref())
                .context("SEED_SAMPLE_LETTERS must be true or false")?,
            draft_idle_ttl_secs: lookup("DRAFT_IDLE_TTL_SECS")
                .unwrap_or_else(|| "1800".to_string())
                .parse::<u64>()
                .context("DRAFT_IDLE_TTL_SECS must be a whole number of seconds")?,
        })
    }
}

fn parse_flag(value: Option<&str>) -> Result<bool> {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("1") | Some("true") | Some("yes") => Ok(true),
        Some("0") | Some("false") | Some("no") => Ok(false),
        Some(other) => anyhow::bail!("unrecognised flag value '{other}'"),
    }
}
