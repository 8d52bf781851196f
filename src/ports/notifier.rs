//! Notifier port - send a text message to a chat.

use async_trait::async_trait;

use crate::domain::foundation::UserId;

use super::DeliveryOutcome;

/// Opaque chat identifier: an operator channel or a user's chat.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination(String);

impl Destination {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Private chat of a user; the user id is their Telegram id.
    pub fn user(user_id: UserId) -> Self {
        Self(user_id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message-send capability. Failures are returned, never raised.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends an HTML-formatted message.
    async fn send(&self, destination: &Destination, text: &str) -> DeliveryOutcome;
}
