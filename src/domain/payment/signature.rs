//! Robokassa result-callback signature verification.
//!
//! The provider signs `OutSum:InvId:Password2[:Shp_a=x:Shp_b=y...]` with a
//! one-way digest and sends the hex result as `SignatureValue`. Custom
//! `Shp_*` parameters are sorted by key before joining.

use std::collections::BTreeMap;
use std::str::FromStr;

use md5::Md5;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use subtle::ConstantTimeEq;

use crate::domain::foundation::PaymentId;

use super::CallbackError;

/// Digest the merchant account is configured to sign with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureAlgorithm {
    #[default]
    Md5,
    Sha256,
    Sha512,
}

impl SignatureAlgorithm {
    /// Lowercase hex digest of `input`.
    pub fn hex_digest(&self, input: &str) -> String {
        match self {
            SignatureAlgorithm::Md5 => hex::encode(Md5::digest(input.as_bytes())),
            SignatureAlgorithm::Sha256 => hex::encode(Sha256::digest(input.as_bytes())),
            SignatureAlgorithm::Sha512 => hex::encode(Sha512::digest(input.as_bytes())),
        }
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = CallbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(SignatureAlgorithm::Md5),
            "sha256" => Ok(SignatureAlgorithm::Sha256),
            "sha512" => Ok(SignatureAlgorithm::Sha512),
            other => Err(CallbackError::Configuration(format!(
                "unsupported signature algorithm: {other}"
            ))),
        }
    }
}

/// Verifies callbacks signed with one merchant password.
pub struct SignatureVerifier {
    secret: Option<Secret<String>>,
    algorithm: SignatureAlgorithm,
}

impl SignatureVerifier {
    /// Creates a verifier. A `None` secret makes every verification fail
    /// with a configuration error.
    pub fn new(secret: Option<Secret<String>>, algorithm: SignatureAlgorithm) -> Self {
        Self { secret, algorithm }
    }

    /// Computes the signature the provider is expected to send.
    ///
    /// # Errors
    ///
    /// `Configuration` if no secret is configured.
    pub fn sign(
        &self,
        out_sum: &Decimal,
        invoice_id: PaymentId,
        custom_params: &BTreeMap<String, String>,
    ) -> Result<String, CallbackError> {
        let secret = self.secret.as_ref().ok_or_else(|| {
            CallbackError::Configuration("merchant password2 not configured".to_string())
        })?;

        let canonical =
            canonical_string(out_sum, invoice_id, secret.expose_secret(), custom_params);
        Ok(self.algorithm.hex_digest(&canonical))
    }

    /// Checks `signature_value` against the recomputed digest.
    ///
    /// Comparison is case-insensitive and constant-time.
    ///
    /// # Errors
    ///
    /// `Configuration` if no secret is configured. Never returns `Ok(true)`
    /// without a secret.
    pub fn verify(
        &self,
        out_sum: &Decimal,
        invoice_id: PaymentId,
        signature_value: &str,
        custom_params: &BTreeMap<String, String>,
    ) -> Result<bool, CallbackError> {
        let expected = self.sign(out_sum, invoice_id, custom_params)?;
        let supplied = signature_value.trim().to_ascii_lowercase();
        Ok(constant_time_compare(expected.as_bytes(), supplied.as_bytes()))
    }
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("configured", &self.secret.is_some())
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// The production and test-mode verifiers of one merchant account.
#[derive(Debug)]
pub struct MerchantSignatures {
    production: SignatureVerifier,
    test: SignatureVerifier,
}

impl MerchantSignatures {
    pub fn new(production: SignatureVerifier, test: SignatureVerifier) -> Self {
        Self { production, test }
    }

    /// Picks the verifier for a callback's `IsTest` flag.
    pub fn for_mode(&self, is_test: bool) -> &SignatureVerifier {
        if is_test {
            &self.test
        } else {
            &self.production
        }
    }
}

/// Builds the string the provider digests.
///
/// An empty custom block is omitted entirely.
pub fn canonical_string(
    out_sum: &Decimal,
    invoice_id: PaymentId,
    secret: &str,
    custom_params: &BTreeMap<String, String>,
) -> String {
    let mut canonical = format!("{}:{}:{}", out_sum, invoice_id, secret);
    for (key, value) in custom_params {
        canonical.push(':');
        canonical.push_str(key);
        canonical.push('=');
        canonical.push_str(value);
    }
    canonical
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
