//! Minimal framework config: token, API URL, log paths.
//! Loaded from the environment: BOT_TOKEN, TELEGRAM_API_URL,
//! ACTIVITY_LOG_FILE, TRACE_LOG_FILE.

use anyhow::Result;
use std::env;

/// Minimal configuration for the Telegram front end.
pub struct TelegramConfig {
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
    /// Path for the batched activity log.
    pub activity_log_file: Option<String>,
    /// Path for tracing diagnostics.
    pub trace_log_file: Option<String>,
}

impl TelegramConfig {
    /// Loads from environment variables. BOT_TOKEN is required; everything
    /// else optional. A missing token is fatal at startup.
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?;
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let activity_log_file = env::var("ACTIVITY_LOG_FILE").ok();
        let trace_log_file = env::var("TRACE_LOG_FILE").ok();
        Ok(Self {
            bot_token,
            telegram_api_url,
            activity_log_file,
            trace_log_file,
        })
    }

    /// Builds a config with the given token and everything else unset.
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            telegram_api_url: None,
            activity_log_file: None,
            trace_log_file: None,
        }
    }
}

/// Creates a teloxide Bot from the config, pointing it at a self-hosted API
/// server when one is configured.
pub fn build_bot(config: &TelegramConfig) -> Result<teloxide::Bot> {
    let mut bot = teloxide::Bot::new(config.bot_token.clone());
    if let Some(api_url) = &config.telegram_api_url {
        let parsed = url::Url::parse(api_url)
            .map_err(|e| anyhow::anyhow!("Invalid TELEGRAM_API_URL {}: {}", api_url, e))?;
        bot = bot.set_api_url(parsed);
    }
    Ok(bot)
}
