//! Recording outbound adapters for testing.
//!
//! Capture every message and delivery request instead of sending it, and
//! answer with a configurable outcome.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::ports::{
    DeliveryFailure, DeliveryOutcome, Destination, MaterialDelivery, MaterialDeliveryRequest,
    Notifier,
};

/// A message captured by `RecordingNotifier`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub destination: Destination,
    pub text: String,
}

/// Notifier that records messages.
///
/// # Panics
///
/// Methods panic if the internal lock is poisoned.
pub struct RecordingNotifier {
    sent: RwLock<Vec<SentMessage>>,
    failure: RwLock<Option<DeliveryFailure>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: RwLock::new(Vec::new()),
            failure: RwLock::new(None),
        }
    }

    /// Creates a notifier whose sends all fail with `failure`.
    pub fn failing(failure: DeliveryFailure) -> Self {
        let notifier = Self::new();
        *notifier
            .failure
            .write()
            .expect("RecordingNotifier: lock poisoned") = Some(failure);
        notifier
    }

    // === Test Helpers ===

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent
            .read()
            .expect("RecordingNotifier: lock poisoned")
            .clone()
    }

    pub fn sent_to(&self, destination: &Destination) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|m| &m.destination == destination)
            .map(|m| m.text)
            .collect()
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, destination: &Destination, text: &str) -> DeliveryOutcome {
        self.sent
            .write()
            .expect("RecordingNotifier: lock poisoned")
            .push(SentMessage {
                destination: destination.clone(),
                text: text.to_string(),
            });

        match self
            .failure
            .read()
            .expect("RecordingNotifier: lock poisoned")
            .clone()
        {
            Some(failure) => DeliveryOutcome::Failed(failure),
            None => DeliveryOutcome::Delivered,
        }
    }
}

/// Material delivery that records requests.
///
/// # Panics
///
/// Methods panic if the internal lock is poisoned.
pub struct RecordingMaterialDelivery {
    requests: RwLock<Vec<MaterialDeliveryRequest>>,
    failure: Option<DeliveryFailure>,
}

impl RecordingMaterialDelivery {
    pub fn new() -> Self {
        Self {
            requests: RwLock::new(Vec::new()),
            failure: None,
        }
    }

    /// Creates a delivery service that always fails with `failure`.
    pub fn failing(failure: DeliveryFailure) -> Self {
        Self {
            requests: RwLock::new(Vec::new()),
            failure: Some(failure),
        }
    }

    // === Test Helpers ===

    pub fn requests(&self) -> Vec<MaterialDeliveryRequest> {
        self.requests
            .read()
            .expect("RecordingMaterialDelivery: lock poisoned")
            .clone()
    }
}

impl Default for RecordingMaterialDelivery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MaterialDelivery for RecordingMaterialDelivery {
    async fn deliver(&self, request: &MaterialDeliveryRequest) -> DeliveryOutcome {
        self.requests
            .write()
            .expect("RecordingMaterialDelivery: lock poisoned")
            .push(request.clone());

        match &self.failure {
            Some(failure) => DeliveryOutcome::Failed(failure.clone()),
            None => DeliveryOutcome::Delivered,
        }
    }
}
