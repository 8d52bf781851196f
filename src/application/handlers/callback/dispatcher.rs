//! FulfillmentDispatcher - routes a settled payment to its one handler.

use crate::domain::fulfillment::{FulfillmentPlan, FulfillmentReport};
use crate::domain::payment::{CallbackError, Payment};

use super::{ActivateSubscriptionHandler, ConfirmConsultationHandler, DeliverMaterialsHandler};

/// Owns one handler per fulfillment path.
pub struct FulfillmentDispatcher {
    subscriptions: ActivateSubscriptionHandler,
    materials: DeliverMaterialsHandler,
    consultations: ConfirmConsultationHandler,
}

impl FulfillmentDispatcher {
    pub fn new(
        subscriptions: ActivateSubscriptionHandler,
        materials: DeliverMaterialsHandler,
        consultations: ConfirmConsultationHandler,
    ) -> Self {
        Self {
            subscriptions,
            materials,
            consultations,
        }
    }

    /// Runs the handler selected by `plan`.
    ///
    /// # Errors
    ///
    /// Whatever the selected handler fails with. The caller decides what a
    /// failure after settlement means.
    pub async fn dispatch(
        &self,
        payment: &Payment,
        plan: FulfillmentPlan,
    ) -> Result<FulfillmentReport, CallbackError> {
        tracing::debug!(payment_id = %payment.id, kind = %plan.kind(), "Dispatching fulfillment");

        match plan {
            FulfillmentPlan::Subscription(tier) => self.subscriptions.handle(payment, tier).await,
            FulfillmentPlan::Material => Ok(self.materials.handle(payment).await),
            FulfillmentPlan::Consultation => self.consultations.handle(payment).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryConsultationRepository, InMemorySubscriptionRepository, RecordingMaterialDelivery,
        RecordingNotifier,
    };
    use crate::domain::foundation::MaterialId;
    use crate::domain::payment::test_support::unpaid_payment;
    use crate::domain::payment::PaymentType;
    use crate::domain::subscription::SubscriptionTier;
    use std::sync::Arc;

    struct Fixture {
        subscriptions: Arc<InMemorySubscriptionRepository>,
        delivery: Arc<RecordingMaterialDelivery>,
        notifier: Arc<RecordingNotifier>,
        dispatcher: FulfillmentDispatcher,
    }

    fn fixture() -> Fixture {
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
        let delivery = Arc::new(RecordingMaterialDelivery::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let consultations = Arc::new(InMemoryConsultationRepository::new());

        let dispatcher = FulfillmentDispatcher::new(
            ActivateSubscriptionHandler::new(subscriptions.clone()),
            DeliverMaterialsHandler::new(delivery.clone()),
            ConfirmConsultationHandler::new(consultations, notifier.clone(), None),
        );

        Fixture {
            subscriptions,
            delivery,
            notifier,
            dispatcher,
        }
    }

    #[tokio::test]
    async fn subscription_plan_touches_only_subscriptions() {
        let f = fixture();
        let payment = unpaid_payment(1, 500, PaymentType::Subscription);

        let report = f
            .dispatcher
            .dispatch(&payment, FulfillmentPlan::Subscription(SubscriptionTier::Premium))
            .await
            .unwrap();

        assert!(matches!(report, FulfillmentReport::SubscriptionActivated { .. }));
        assert_eq!(f.subscriptions.count(), 1);
        assert!(f.delivery.requests().is_empty());
        assert!(f.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn material_plan_touches_only_delivery() {
        let f = fixture();
        let mut payment = unpaid_payment(2, 300, PaymentType::Material);
        payment.material_ids = vec![MaterialId::new(5)];

        f.dispatcher
            .dispatch(&payment, FulfillmentPlan::Material)
            .await
            .unwrap();

        assert_eq!(f.delivery.requests().len(), 1);
        assert_eq!(f.subscriptions.count(), 0);
    }

    #[tokio::test]
    async fn consultation_plan_runs_consultation_handler() {
        let f = fixture();
        let payment = unpaid_payment(3, 300, PaymentType::Consultation);

        let report = f
            .dispatcher
            .dispatch(&payment, FulfillmentPlan::Consultation)
            .await
            .unwrap();

        assert_eq!(report, FulfillmentReport::NoConsultations);
        assert_eq!(f.subscriptions.count(), 0);
        assert!(f.delivery.requests().is_empty());
    }
}
