//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - axum endpoint for the result callback
//! - `postgres` - payment ledger and repositories
//! - `telegram` - Bot API notifier
//! - `materials` - material delivery backend client
//! - `memory` - in-process adapters for tests

pub mod http;
pub mod materials;
pub mod memory;
pub mod postgres;
pub mod telegram;

pub use materials::HttpMaterialDelivery;
pub use postgres::{
    PostgresConsultationRepository, PostgresPaymentLedger, PostgresSubscriptionRepository,
};
pub use telegram::TelegramNotifier;

use crate::ports::DeliveryFailure;

/// Classifies a reqwest send error for outbound adapters.
///
/// The URL is stripped from the message: Bot API URLs carry the token.
pub(crate) fn transport_failure(err: reqwest::Error) -> DeliveryFailure {
    if err.is_timeout() {
        DeliveryFailure::Timeout
    } else {
        DeliveryFailure::Transport(err.without_url().to_string())
    }
}
