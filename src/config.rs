//! Settings resolved once at startup from the command line and the environment.

use std::time::Duration;

use thiserror::Error;

use crate::{
    bot::PollOptions,
    cli::commands::Cli,
    client::{GeminiClient, GenerationConfig},
};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing {name}: pass --{flag} or set {env}")]
    Missing {
        name: &'static str,
        flag: &'static str,
        env: &'static str,
    },
    #[error("Invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Gemini access; the API key is never printed
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub generation: GenerationConfig,
}

impl GeminiConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let api_key = required(cli.gemini_key.as_deref(), "Gemini API key", "gemini-key", "GEMINI_API_KEY")?;

        if let Some(temperature) = cli.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ConfigError::Invalid {
                    name: "temperature",
                    reason: format!("{} is outside 0.0..=2.0", temperature),
                });
            }
        }

        if cli.model.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: "model",
                reason: "empty model name".to_string(),
            });
        }

        Ok(Self {
            api_key,
            model: cli.model.trim().to_string(),
            generation: GenerationConfig {
                temperature: cli.temperature,
                max_output_tokens: cli.max_output_tokens,
            },
        })
    }

    pub fn client(&self) -> GeminiClient {
        GeminiClient::new(self.api_key.clone(), self.model.clone()).with_generation_config(self.generation)
    }
}

/// Everything `run` needs
pub struct BotConfig {
    pub telegram_token: String,
    pub gemini: GeminiConfig,
    pub poll: PollOptions,
}

impl BotConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let telegram_token = required(
            cli.telegram_token.as_deref(),
            "Telegram bot token",
            "telegram-token",
            "TELEGRAM_BOT_TOKEN",
        )?;

        if cli.poll_timeout == 0 {
            return Err(ConfigError::Invalid {
                name: "poll timeout",
                reason: "must be at least one second".to_string(),
            });
        }

        Ok(Self {
            telegram_token,
            gemini: GeminiConfig::from_cli(cli)?,
            poll: PollOptions {
                timeout: Duration::from_secs(cli.poll_timeout),
                ..PollOptions::default()
            },
        })
    }
}

/// Empty values count as missing
fn required(
    value: Option<&str>,
    name: &'static str,
    flag: &'static str,
    env: &'static str,
) -> Result<String, ConfigError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(ConfigError::Missing { name, flag, env })
}
