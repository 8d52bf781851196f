//! Material delivery port - the external service that sends purchased
//! materials to a user.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::{MaterialId, UserId};

use super::DeliveryOutcome;

/// Body of a delivery request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterialDeliveryRequest {
    pub tg_id: UserId,
    pub material_ids: Vec<MaterialId>,
    pub message: String,
}

/// Delivery capability. Failures are returned, never raised.
#[async_trait]
pub trait MaterialDelivery: Send + Sync {
    async fn deliver(&self, request: &MaterialDeliveryRequest) -> DeliveryOutcome;
}
