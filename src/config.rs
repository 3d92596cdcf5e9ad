use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Upper bound for a single Gemini call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub host: String,
    pub port: u16,
    pub static_dir: Option<String>,
    pub request_timeout: Duration,
}

impl Config {
    /// Reads the process environment. Call `dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT value: {}", raw))?,
            Err(_) => 8000,
        };

        Ok(Self {
            api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            api_base: env::var("GEMINI_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            static_dir: env::var("STATIC_DIR").ok().filter(|dir| !dir.is_empty()),
            request_timeout: REQUEST_TIMEOUT,
        })
    }

    #[cfg(test)]
    pub fn for_upstream(api_base: &str, api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_base: api_base.to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            static_dir: None,
            request_timeout: Duration::from_secs(5),
        }
    }
}
