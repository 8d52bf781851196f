//! Data Transfer Objects for the callback endpoint.
//!
//! The provider only reads the body of a successful reply; error bodies are
//! for operators reading logs and retries.

use serde::{Deserialize, Serialize};

use crate::domain::payment::CallbackError;

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Whether the provider's retry can succeed.
    pub retryable: bool,
}

impl ErrorResponse {
    /// Builds the body for a rejected callback.
    ///
    /// Server-side failures get a generic message; the detail only goes to logs.
    pub fn from_callback_error(err: &CallbackError) -> Self {
        let message = if err.status_code().is_server_error() {
            "Callback could not be processed".to_string()
        } else {
            err.to_string()
        };

        Self {
            code: err.code().to_string(),
            message,
            retryable: err.is_retryable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::PaymentId;

    #[test]
    fn client_errors_carry_their_message() {
        let body = ErrorResponse::from_callback_error(&CallbackError::PaymentNotFound(
            PaymentId::new(9),
        ));

        assert_eq!(body.code, "PAYMENT_NOT_FOUND");
        assert_eq!(body.message, "Payment 9 not found");
        assert!(!body.retryable);
    }

    #[test]
    fn server_errors_hide_detail() {
        let body = ErrorResponse::from_callback_error(&CallbackError::Database(
            "connection refused to 10.0.0.3".to_string(),
        ));

        assert_eq!(body.code, "DATABASE_ERROR");
        assert!(!body.message.contains("10.0.0.3"));
        assert!(body.retryable);
    }

    #[test]
    fn error_response_serializes() {
        let body = ErrorResponse::from_callback_error(&CallbackError::InvalidSignature);
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"code\":\"INVALID_SIGNATURE\""));
    }
}
