use anyhow::{Context, Result};

const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_RELAY_BASE_URL: &str = "http://localhost:5000";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    /// Upstream Messages API host. The relay rewrites `/api/claude` onto `/v1/messages` here.
    pub anthropic_base_url: String,
    /// Where the extraction client finds the relay. The only environment-targeting input.
    pub relay_base_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            anthropic_base_url: trim_base_url(
                &std::env::var("ANTHROPIC_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_ANTHROPIC_BASE_URL.to_string()),
            ),
            relay_base_url: trim_base_url(
                &std::env::var("RELAY_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_RELAY_BASE_URL.to_string()),
            ),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) => anyhow::bail!("Required environment variable '{key}' is empty"),
        Err(e) => {
            Err(e).with_context(|| format!("Required environment variable '{key}' is not set"))
        }
    }
}

/// Strips trailing slashes so paths can be appended with a single `/`.
pub fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
