use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::LlmConfig;

const DEFAULT_LLM_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_LLM_MODEL: &str = "o4-mini-2025-04-16";
/// Fraction of the declared total that summed part prices may drift before an advisory is raised.
pub const DEFAULT_PRICE_TOLERANCE: f64 = 0.02;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub price_tolerance: f64,
    /// Directory holding the browser front-end. Not served when unset.
    pub static_dir: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let llm = LlmConfig {
            api_url: optional_env("LLM_API_URL").unwrap_or_else(|| DEFAULT_LLM_API_URL.to_string()),
            api_key: require_env("OPENAI_API_KEY")?,
            model: optional_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            temperature: parse_env("LLM_TEMPERATURE", 1.0_f32)?,
            json_mode: parse_env("LLM_JSON_MODE", true)?,
            timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 120_u64)?),
        };

        let price_tolerance = parse_env("PRICE_TOLERANCE", DEFAULT_PRICE_TOLERANCE)?;
        if !(0.0..1.0).contains(&price_tolerance) {
            anyhow::bail!("PRICE_TOLERANCE must be a ratio in [0, 1), got {price_tolerance}");
        }

        Ok(Config {
            llm,
            price_tolerance,
            static_dir: optional_env("STATIC_DIR").map(PathBuf::from),
            port: parse_env("PORT", 3000_u16)?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
