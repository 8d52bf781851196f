//! DeliverMaterialsHandler - asks the delivery service to send purchased
//! materials to the payer.
//!
//! Delivery runs after settlement has been committed; a failure is logged
//! and reported, never raised.

use std::sync::Arc;

use crate::domain::fulfillment::FulfillmentReport;
use crate::domain::payment::Payment;
use crate::ports::{DeliveryOutcome, MaterialDelivery, MaterialDeliveryRequest};

/// Message the delivery service forwards with the materials.
pub const MATERIALS_READY_MESSAGE: &str = "Ваши материалы готовы! Спасибо за покупку.";

/// Handler for material payments.
pub struct DeliverMaterialsHandler {
    delivery: Arc<dyn MaterialDelivery>,
}

impl DeliverMaterialsHandler {
    pub fn new(delivery: Arc<dyn MaterialDelivery>) -> Self {
        Self { delivery }
    }

    pub async fn handle(&self, payment: &Payment) -> FulfillmentReport {
        if payment.material_ids.is_empty() {
            tracing::info!(payment_id = %payment.id, "Material payment has no materials");
            return FulfillmentReport::NoMaterials;
        }

        let request = MaterialDeliveryRequest {
            tg_id: payment.user_id,
            material_ids: payment.material_ids.clone(),
            message: MATERIALS_READY_MESSAGE.to_string(),
        };

        let delivered = match self.delivery.deliver(&request).await {
            DeliveryOutcome::Delivered => {
                tracing::info!(
                    payment_id = %payment.id,
                    count = request.material_ids.len(),
                    "Materials delivered"
                );
                true
            }
            DeliveryOutcome::Failed(failure) => {
                tracing::warn!(
                    payment_id = %payment.id,
                    user_id = %payment.user_id,
                    error = %failure,
                    "Material delivery failed"
                );
                false
            }
        };

        FulfillmentReport::MaterialsRequested {
            count: request.material_ids.len(),
            delivered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::RecordingMaterialDelivery;
    use crate::domain::foundation::MaterialId;
    use crate::domain::payment::test_support::unpaid_payment;
    use crate::domain::payment::PaymentType;
    use crate::ports::DeliveryFailure;

    fn material_payment(ids: &[i64]) -> Payment {
        let mut payment = unpaid_payment(20, 300, PaymentType::Material);
        payment.material_ids = ids.iter().copied().map(MaterialId::new).collect();
        payment
    }

    #[tokio::test]
    async fn requests_delivery_of_every_material() {
        let delivery = Arc::new(RecordingMaterialDelivery::new());
        let handler = DeliverMaterialsHandler::new(delivery.clone());

        let report = handler.handle(&material_payment(&[4, 9])).await;

        assert_eq!(
            report,
            FulfillmentReport::MaterialsRequested {
                count: 2,
                delivered: true
            }
        );
        let requests = delivery.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].tg_id.value(), 777);
        assert_eq!(
            requests[0].material_ids,
            vec![MaterialId::new(4), MaterialId::new(9)]
        );
        assert_eq!(requests[0].message, MATERIALS_READY_MESSAGE);
    }

    #[tokio::test]
    async fn empty_material_list_skips_delivery() {
        let delivery = Arc::new(RecordingMaterialDelivery::new());
        let handler = DeliverMaterialsHandler::new(delivery.clone());

        let report = handler.handle(&material_payment(&[])).await;

        assert_eq!(report, FulfillmentReport::NoMaterials);
        assert!(delivery.requests().is_empty());
    }

    #[tokio::test]
    async fn failed_delivery_is_reported_not_raised() {
        let delivery = Arc::new(RecordingMaterialDelivery::failing(
            DeliveryFailure::UnexpectedStatus(503),
        ));
        let handler = DeliverMaterialsHandler::new(delivery);

        let report = handler.handle(&material_payment(&[1])).await;

        assert_eq!(
            report,
            FulfillmentReport::MaterialsRequested {
                count: 1,
                delivered: false
            }
        );
    }
}
