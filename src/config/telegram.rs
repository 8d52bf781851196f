//! Telegram notification configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Bot API settings for operator and user notifications.
///
/// Both the token and the operator chat are optional; without them the
/// corresponding notifications fail and are logged.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,

    /// Operator channel receiving paid-consultation summaries
    pub info_chat: Option<String>,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl TelegramConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Operator chat id, ignoring blank values.
    pub fn operator_chat(&self) -> Option<&str> {
        self.info_chat.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// Validate Telegram configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.api_base_url.starts_with("https://") && !self.api_base_url.starts_with("http://")
        {
            return Err(ValidationError::InvalidUrl("telegram api_base_url"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout("telegram"));
        }
        Ok(())
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            info_chat: None,
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_timeout() -> u64 {
    10
}
