use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::domains::exchanges::utils::MAX_SHUFFLE_ATTEMPTS;

/// Default number of tries to find an unused invite code
pub const DEFAULT_INVITE_CODE_MAX_ATTEMPTS: usize = 10;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot token; when unset the bot is disabled and notifications are dropped
    pub telegram_bot_token: Option<String>,
    pub telegram_bot_username: Option<String>,
    pub matching: MatchingSettings,
}

/// Tunables for the matching engine and exchange creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingSettings {
    pub max_shuffle_attempts: usize,
    pub invite_code_max_attempts: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_shuffle_attempts: MAX_SHUFFLE_ATTEMPTS,
            invite_code_max_attempts: DEFAULT_INVITE_CODE_MAX_ATTEMPTS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            telegram_bot_token: non_empty_var("TELEGRAM_BOT_TOKEN"),
            telegram_bot_username: non_empty_var("TELEGRAM_BOT_USERNAME"),
            matching: MatchingSettings {
                max_shuffle_attempts: parse_var("MATCH_MAX_SHUFFLE_ATTEMPTS", MAX_SHUFFLE_ATTEMPTS)
                    .context("MATCH_MAX_SHUFFLE_ATTEMPTS must be a valid number")?,
                invite_code_max_attempts: parse_var(
                    "INVITE_CODE_MAX_ATTEMPTS",
                    DEFAULT_INVITE_CODE_MAX_ATTEMPTS,
                )
                .context("INVITE_CODE_MAX_ATTEMPTS must be a valid number")?,
            },
        })
    }

    pub fn bot_enabled(&self) -> bool {
        self.telegram_bot_token.is_some()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var(key: &str, default: usize) -> Result<usize> {
    match non_empty_var(key) {
        Some(raw) => Ok(raw.trim().parse()?),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_use_engine_bound() {
        let settings = MatchingSettings::default();
        assert_eq!(settings.max_shuffle_attempts, 100);
        assert_eq!(settings.invite_code_max_attempts, 10);
    }

    #[test]
    fn test_parse_var_falls_back_when_unset() {
        assert_eq!(
            parse_var("SANTA_TEST_SURELY_UNSET_VARIABLE", 7).unwrap(),
            7
        );
    }
}
