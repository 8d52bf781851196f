//! Outcome types for outbound collaborators.
//!
//! Notification and material-delivery calls run after settlement has been
//! committed, so their failures are values to log, never errors to raise.

use thiserror::Error;

/// Why an outbound call did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryFailure {
    /// Credentials or target URL are not configured.
    #[error("Not configured: {0}")]
    NotConfigured(&'static str),

    /// The call exceeded its timeout.
    #[error("Timed out")]
    Timeout,

    /// Connection-level failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The collaborator answered with a non-success status.
    #[error("Unexpected status {0}")]
    UnexpectedStatus(u16),

    /// The collaborator answered 200 with an unusable body.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result of one outbound call.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed(DeliveryFailure),
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }

    pub fn failure(&self) -> Option<&DeliveryFailure> {
        match self {
            DeliveryOutcome::Delivered => None,
            DeliveryOutcome::Failed(failure) => Some(failure),
        }
    }
}

impl From<Result<(), DeliveryFailure>> for DeliveryOutcome {
    fn from(result: Result<(), DeliveryFailure>) -> Self {
        match result {
            Ok(()) => DeliveryOutcome::Delivered,
            Err(failure) => DeliveryOutcome::Failed(failure),
        }
    }
}
