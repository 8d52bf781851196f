//! ActivateSubscriptionHandler - grants the purchased window to the payer.

use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::domain::fulfillment::FulfillmentReport;
use crate::domain::payment::{CallbackError, Payment};
use crate::domain::subscription::SubscriptionTier;
use crate::ports::SubscriptionRepository;

/// Handler for subscription payments.
pub struct ActivateSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl ActivateSubscriptionHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    /// Extends or restarts the payer's subscription.
    ///
    /// # Errors
    ///
    /// - `UnknownSubscriptionTier` if `tier` cannot be purchased; nothing is written
    /// - `Database` on persistence failure
    pub async fn handle(
        &self,
        payment: &Payment,
        tier: SubscriptionTier,
    ) -> Result<FulfillmentReport, CallbackError> {
        let now = Timestamp::now();

        let mut subscription = self
            .subscriptions
            .get_or_create_for_user(&payment.user_id, now)
            .await?;

        let expires_at = subscription.activate(payment.id, tier, now)?;
        self.subscriptions.update(&subscription).await?;

        tracing::info!(
            payment_id = %payment.id,
            user_id = %payment.user_id,
            tier = %tier,
            expires_at = %expires_at,
            "Subscription activated"
        );

        Ok(FulfillmentReport::SubscriptionActivated { tier, expires_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySubscriptionRepository;
    use crate::domain::foundation::{PaymentId, SubscriptionId};
    use crate::domain::payment::test_support::unpaid_payment;
    use crate::domain::payment::PaymentType;
    use crate::domain::subscription::Subscription;

    fn setup() -> (Arc<InMemorySubscriptionRepository>, ActivateSubscriptionHandler) {
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        let handler = ActivateSubscriptionHandler::new(repo.clone());
        (repo, handler)
    }

    #[tokio::test]
    async fn first_purchase_creates_subscription() {
        let (repo, handler) = setup();
        let payment = unpaid_payment(10, 500, PaymentType::Subscription);
        let before = Timestamp::now();

        let report = handler
            .handle(&payment, SubscriptionTier::Unlimited)
            .await
            .unwrap();

        let sub = repo.get(payment.user_id).unwrap();
        assert_eq!(sub.tier, SubscriptionTier::Unlimited);
        assert_eq!(sub.payment_id, Some(PaymentId::new(10)));
        assert!(sub.is_active);

        let expiry = sub.expires_at.unwrap();
        assert!(!expiry.is_before(&before.add_days(30)));
        assert!(!expiry.is_after(&Timestamp::now().add_days(30)));
        assert_eq!(
            report,
            FulfillmentReport::SubscriptionActivated {
                tier: SubscriptionTier::Unlimited,
                expires_at: expiry
            }
        );
    }

    #[tokio::test]
    async fn special_purchase_stacks_on_existing_window() {
        let (repo, handler) = setup();
        let payment = unpaid_payment(11, 900, PaymentType::Subscription);
        let prior_expiry = Timestamp::now().add_days(10);
        repo.insert(Subscription {
            tier: SubscriptionTier::Premium,
            expires_at: Some(prior_expiry),
            ..Subscription::new_free(SubscriptionId::new(1), payment.user_id, Timestamp::now())
        });

        handler
            .handle(&payment, SubscriptionTier::Special)
            .await
            .unwrap();

        let sub = repo.get(payment.user_id).unwrap();
        assert_eq!(sub.expires_at, Some(prior_expiry.add_days(90)));
        assert_eq!(sub.tier, SubscriptionTier::Special);
    }

    #[tokio::test]
    async fn non_purchasable_tier_leaves_subscription_unmodified() {
        let (repo, handler) = setup();
        let payment = unpaid_payment(12, 500, PaymentType::Subscription);
        let existing = Subscription {
            tier: SubscriptionTier::Premium,
            expires_at: Some(Timestamp::now().add_days(3)),
            ..Subscription::new_free(SubscriptionId::new(1), payment.user_id, Timestamp::now())
        };
        repo.insert(existing.clone());

        let err = handler
            .handle(&payment, SubscriptionTier::Gift)
            .await
            .unwrap_err();

        assert_eq!(err, CallbackError::UnknownSubscriptionTier("gift".to_string()));
        assert_eq!(repo.get(payment.user_id), Some(existing));
    }
}
