//! Material delivery service configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Path on the backend that sends purchased materials to a user.
const SEND_AFTER_PAYMENT_PATH: &str = "/materials/send-after-payment";

/// Backend service that delivers purchased materials.
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialsConfig {
    /// Base URL of the backend; deliveries fail without it
    pub backend_url: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl MaterialsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full delivery endpoint, if a backend is configured.
    pub fn delivery_url(&self) -> Option<String> {
        self.backend_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| format!("{}{}", url.trim_end_matches('/'), SEND_AFTER_PAYMENT_PATH))
    }

    /// Validate material delivery configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = self.delivery_url() {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(ValidationError::InvalidUrl("materials backend_url"));
            }
        }
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout("materials"));
        }
        Ok(())
    }
}

impl Default for MaterialsConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}
