//! Robokassa merchant configuration

use serde::Deserialize;

use super::error::ValidationError;

const SUPPORTED_ALGORITHMS: [&str; 3] = ["md5", "sha256", "sha512"];

/// Merchant account settings used to verify result callbacks.
///
/// Passwords are optional at startup; a callback that needs a missing
/// password fails at request time instead.
#[derive(Debug, Clone, Deserialize)]
pub struct RobokassaConfig {
    /// Provider payment page
    #[serde(default = "default_merchant_url")]
    pub merchant_url: String,

    /// Password #2, signs production result callbacks
    pub password2: Option<String>,

    /// Test-mode password #2, signs callbacks with `IsTest=1`
    pub test_password2: Option<String>,

    /// Digest configured in the merchant account
    #[serde(default = "default_signature_algorithm")]
    pub signature_algorithm: String,
}

impl RobokassaConfig {
    /// Password for the given mode, ignoring blank values.
    pub fn password2_for(&self, is_test: bool) -> Option<&str> {
        let password = if is_test {
            self.test_password2.as_deref()
        } else {
            self.password2.as_deref()
        };
        password.filter(|p| !p.trim().is_empty())
    }

    /// Validate merchant configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.merchant_url.starts_with("https://") && !self.merchant_url.starts_with("http://")
        {
            return Err(ValidationError::InvalidUrl("robokassa merchant_url"));
        }
        let algorithm = self.signature_algorithm.to_ascii_lowercase();
        if !SUPPORTED_ALGORITHMS.contains(&algorithm.as_str()) {
            return Err(ValidationError::UnsupportedSignatureAlgorithm(
                self.signature_algorithm.clone(),
            ));
        }
        Ok(())
    }
}

impl Default for RobokassaConfig {
    fn default() -> Self {
        Self {
            merchant_url: default_merchant_url(),
            password2: None,
            test_password2: None,
            signature_algorithm: default_signature_algorithm(),
        }
    }
}

fn default_merchant_url() -> String {
    "https://auth.robokassa.ru/Merchant/Index.aspx".to_string()
}

fn default_signature_algorithm() -> String {
    "md5".to_string()
}
