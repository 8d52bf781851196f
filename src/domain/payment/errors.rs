//! Callback error types.
//!
//! Every condition that aborts a result callback before it is acknowledged,
//! with HTTP status mapping and provider retry semantics.

use http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::{DomainError, PaymentId};
use crate::domain::subscription::UnknownTier;

/// Errors that abort result-callback processing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackError {
    /// SignatureValue does not match the recomputed digest.
    #[error("Invalid signature")]
    InvalidSignature,

    /// A required parameter is missing or not parseable.
    #[error("Malformed callback: {0}")]
    MalformedCallback(String),

    /// InvId does not name a known payment.
    #[error("Payment {0} not found")]
    PaymentNotFound(PaymentId),

    /// OutSum disagrees with the stored price.
    #[error("Amount mismatch: expected {expected}, got {claimed}")]
    AmountMismatch { expected: i64, claimed: String },

    /// The subscription tier tag cannot be purchased.
    #[error("Unknown subscription tier: {0}")]
    UnknownSubscriptionTier(String),

    /// A merchant secret needed for verification is not configured.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Persistence failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl CallbackError {
    /// Returns true if the provider should retry delivering this callback.
    ///
    /// Only storage failures are transient; the settlement write is
    /// idempotent so a retried callback cannot double-credit.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CallbackError::Database(_))
    }

    /// Maps the error to the HTTP status returned to the provider.
    ///
    /// Anything other than a 200 `OK<id>` body makes the provider retry.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CallbackError::InvalidSignature
            | CallbackError::MalformedCallback(_)
            | CallbackError::AmountMismatch { .. }
            | CallbackError::UnknownSubscriptionTier(_) => StatusCode::BAD_REQUEST,

            CallbackError::PaymentNotFound(_) => StatusCode::NOT_FOUND,

            // Operator faults
            CallbackError::Configuration(_) | CallbackError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable code for response bodies and logs.
    pub fn code(&self) -> &'static str {
        match self {
            CallbackError::InvalidSignature => "INVALID_SIGNATURE",
            CallbackError::MalformedCallback(_) => "MALFORMED_CALLBACK",
            CallbackError::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            CallbackError::AmountMismatch { .. } => "AMOUNT_MISMATCH",
            CallbackError::UnknownSubscriptionTier(_) => "UNKNOWN_SUBSCRIPTION_TIER",
            CallbackError::Configuration(_) => "CONFIGURATION_ERROR",
            CallbackError::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<DomainError> for CallbackError {
    fn from(err: DomainError) -> Self {
        CallbackError::Database(err.to_string())
    }
}

impl From<UnknownTier> for CallbackError {
    fn from(err: UnknownTier) -> Self {
        CallbackError::UnknownSubscriptionTier(err.0)
    }
}
