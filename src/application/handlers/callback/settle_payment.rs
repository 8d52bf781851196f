//! SettlePaymentHandler - Command handler for idempotent payment settlement.
//!
//! Settlement is split in two so the caller can validate the fulfillment plan
//! between the checks and the write:
//!
//! 1. `load_verified` - payment exists and the claimed amount matches
//! 2. `commit` - compare-and-set `is_paid`; exactly one caller wins

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::foundation::{PaymentId, Timestamp};
use crate::domain::payment::{CallbackError, Payment, Settlement};
use crate::ports::{PaymentLedger, SettleResult};

/// Command to settle a payment.
#[derive(Debug, Clone)]
pub struct SettlePaymentCommand {
    pub payment_id: PaymentId,
    /// `OutSum` as claimed by the provider.
    pub claimed_amount: Decimal,
}

/// Handler for settling payments.
pub struct SettlePaymentHandler {
    ledger: Arc<dyn PaymentLedger>,
}

impl SettlePaymentHandler {
    pub fn new(ledger: Arc<dyn PaymentLedger>) -> Self {
        Self { ledger }
    }

    /// Loads the payment and checks the claimed amount. Writes nothing.
    ///
    /// # Errors
    ///
    /// - `PaymentNotFound` if no payment has this id
    /// - `AmountMismatch` if the truncated amount differs from the price
    /// - `Database` on persistence failure
    pub async fn load_verified(
        &self,
        cmd: &SettlePaymentCommand,
    ) -> Result<Payment, CallbackError> {
        let payment = self
            .ledger
            .find_by_id(&cmd.payment_id)
            .await?
            .ok_or(CallbackError::PaymentNotFound(cmd.payment_id))?;

        if !payment.matches_amount(&cmd.claimed_amount) {
            tracing::warn!(
                payment_id = %payment.id,
                expected = payment.price,
                claimed = %cmd.claimed_amount,
                "Callback amount does not match payment price"
            );
            return Err(CallbackError::AmountMismatch {
                expected: payment.price,
                claimed: cmd.claimed_amount.to_string(),
            });
        }

        Ok(payment)
    }

    /// Marks a verified payment settled.
    ///
    /// # Errors
    ///
    /// - `PaymentNotFound` if the row vanished since it was loaded
    /// - `Database` on persistence failure
    pub async fn commit(&self, mut payment: Payment) -> Result<Settlement, CallbackError> {
        let now = Timestamp::now();

        match self.ledger.mark_settled(&payment.id, now).await? {
            SettleResult::Settled => {
                payment.mark_settled(now);
                tracing::info!(
                    payment_id = %payment.id,
                    user_id = %payment.user_id,
                    "Payment settled"
                );
                Ok(Settlement::NewlySettled(payment))
            }
            SettleResult::AlreadySettled => {
                let current = self
                    .ledger
                    .find_by_id(&payment.id)
                    .await?
                    .unwrap_or(payment);
                tracing::info!(
                    payment_id = %current.id,
                    "Payment already settled, skipping fulfillment"
                );
                Ok(Settlement::AlreadySettled(current))
            }
            SettleResult::NotFound => Err(CallbackError::PaymentNotFound(payment.id)),
        }
    }

    /// Loads, checks and settles in one step.
    pub async fn handle(&self, cmd: SettlePaymentCommand) -> Result<Settlement, CallbackError> {
        let payment = self.load_verified(&cmd).await?;
        self.commit(payment).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryPaymentLedger;
    use crate::domain::payment::test_support::unpaid_payment;
    use crate::domain::payment::PaymentType;
    use std::str::FromStr;

    fn setup(price: i64) -> (Arc<InMemoryPaymentLedger>, SettlePaymentHandler) {
        let ledger = Arc::new(InMemoryPaymentLedger::with_payments([unpaid_payment(
            4821,
            price,
            PaymentType::Subscription,
        )]));
        let handler = SettlePaymentHandler::new(ledger.clone());
        (ledger, handler)
    }

    fn cmd(id: i64, amount: &str) -> SettlePaymentCommand {
        SettlePaymentCommand {
            payment_id: PaymentId::new(id),
            claimed_amount: Decimal::from_str(amount).unwrap(),
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Success Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn settles_unpaid_payment() {
        let (ledger, handler) = setup(500);

        let settlement = handler.handle(cmd(4821, "500.00")).await.unwrap();

        assert!(settlement.is_new());
        assert!(settlement.payment().is_paid);
        assert!(settlement.payment().paid_at.is_some());
        assert!(ledger.get(PaymentId::new(4821)).unwrap().is_paid);
    }

    #[tokio::test]
    async fn second_settlement_is_idempotent() {
        let (ledger, handler) = setup(500);

        let first = handler.handle(cmd(4821, "500")).await.unwrap();
        let second = handler.handle(cmd(4821, "500")).await.unwrap();

        assert!(first.is_new());
        assert!(!second.is_new());
        assert_eq!(second.payment().paid_at, first.payment().paid_at);
        assert_eq!(ledger.settle_calls(), 2);
    }

    #[tokio::test]
    async fn concurrent_settlements_have_one_winner() {
        let (_ledger, handler) = setup(500);
        let handler = Arc::new(handler);

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let handler = handler.clone();
                tokio::spawn(async move { handler.handle(cmd(4821, "500")).await.unwrap() })
            })
            .collect();

        let mut newly = 0;
        for task in tasks {
            if task.await.unwrap().is_new() {
                newly += 1;
            }
        }
        assert_eq!(newly, 1);
    }

    // ══════════════════════════════════════════════════════════════
    // Failure Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn missing_payment_is_not_found() {
        let (_ledger, handler) = setup(500);

        let err = handler.handle(cmd(1, "500")).await.unwrap_err();

        assert_eq!(err, CallbackError::PaymentNotFound(PaymentId::new(1)));
    }

    #[tokio::test]
    async fn amount_mismatch_leaves_payment_unsettled() {
        let (ledger, handler) = setup(500);

        let err = handler.handle(cmd(4821, "499")).await.unwrap_err();

        assert_eq!(
            err,
            CallbackError::AmountMismatch {
                expected: 500,
                claimed: "499".to_string()
            }
        );
        assert!(!ledger.get(PaymentId::new(4821)).unwrap().is_paid);
        assert_eq!(ledger.settle_calls(), 0);
    }

    #[tokio::test]
    async fn database_failure_maps_to_database_error() {
        let (ledger, handler) = setup(500);
        ledger.set_unavailable(true);

        let err = handler.handle(cmd(4821, "500")).await.unwrap_err();

        assert!(matches!(err, CallbackError::Database(_)));
        assert!(err.is_retryable());
    }
}
