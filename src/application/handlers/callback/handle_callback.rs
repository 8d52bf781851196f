//! HandleCallbackHandler - end-to-end processing of a result callback.
//!
//! Order of operations:
//!
//! 1. Verify the signature with the merchant password for the callback's mode
//! 2. Load the payment and check the amount
//! 3. Resolve the fulfillment plan (rejects unknown tiers while nothing is written)
//! 4. Settle with compare-and-set
//! 5. Dispatch fulfillment, only if this call settled the payment
//!
//! Failures in step 5 are logged and reported; the callback is still
//! acknowledged because settlement is already committed.

use std::sync::Arc;

use crate::domain::foundation::PaymentId;
use crate::domain::fulfillment::{FulfillmentKind, FulfillmentPlan, FulfillmentReport};
use crate::domain::payment::{CallbackError, CallbackParams, MerchantSignatures};

use super::{FulfillmentDispatcher, SettlePaymentCommand, SettlePaymentHandler};

/// Command to process one callback.
#[derive(Debug, Clone)]
pub struct HandleCallbackCommand {
    pub params: CallbackParams,
}

/// What happened after settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FulfillmentStatus {
    Completed(FulfillmentReport),

    /// Payment was settled by an earlier callback; nothing ran.
    Duplicate,

    /// No fulfillment path for this payment type.
    Unhandled,

    /// The handler failed after settlement; needs operator attention.
    Failed(CallbackError),
}

/// Result of a processed callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleCallbackResult {
    pub payment_id: PaymentId,
    pub newly_settled: bool,
    pub fulfillment: FulfillmentStatus,
}

impl HandleCallbackResult {
    /// Body the provider expects: `OK` followed by the invoice id.
    pub fn acknowledgement(&self) -> String {
        format!("OK{}", self.payment_id)
    }
}

/// Handler for Robokassa result callbacks.
pub struct HandleCallbackHandler {
    signatures: Arc<MerchantSignatures>,
    settlement: SettlePaymentHandler,
    dispatcher: FulfillmentDispatcher,
}

impl HandleCallbackHandler {
    pub fn new(
        signatures: Arc<MerchantSignatures>,
        settlement: SettlePaymentHandler,
        dispatcher: FulfillmentDispatcher,
    ) -> Self {
        Self {
            signatures,
            settlement,
            dispatcher,
        }
    }

    /// # Errors
    ///
    /// - `InvalidSignature` / `Configuration` from verification
    /// - `PaymentNotFound` / `AmountMismatch` / `Database` from settlement
    /// - `UnknownSubscriptionTier` from plan resolution
    ///
    /// Every error is returned before anything is written.
    pub async fn handle(
        &self,
        cmd: HandleCallbackCommand,
    ) -> Result<HandleCallbackResult, CallbackError> {
        let params = cmd.params;

        // 1. Verify
        let valid = self.signatures.for_mode(params.is_test).verify(
            &params.out_sum,
            params.invoice_id,
            &params.signature_value,
            &params.custom_params,
        )?;
        if !valid {
            tracing::warn!(
                payment_id = %params.invoice_id,
                is_test = params.is_test,
                "Callback signature rejected"
            );
            return Err(CallbackError::InvalidSignature);
        }

        // 2. Load and check amount
        let payment = self
            .settlement
            .load_verified(&SettlePaymentCommand {
                payment_id: params.invoice_id,
                claimed_amount: params.out_sum,
            })
            .await
            .map_err(|err| {
                if let CallbackError::PaymentNotFound(id) = &err {
                    tracing::warn!(payment_id = %id, "Callback for unknown payment");
                }
                err
            })?;

        if payment.user_id != params.user_id {
            tracing::warn!(
                payment_id = %payment.id,
                stored_user = %payment.user_id,
                declared_user = %params.user_id,
                "Callback Shp_id differs from payment owner"
            );
        }

        // 3. Plan
        if FulfillmentKind::from_tag(&params.declared_type).is_none() {
            tracing::warn!(
                payment_id = %payment.id,
                declared_type = %params.declared_type,
                stored_type = %payment.payment_type,
                "Unrecognized Shp_type, falling back to stored payment type"
            );
        }
        let plan = FulfillmentPlan::resolve(
            &params.declared_type,
            params.declared_tier.as_deref(),
            &payment,
        )
        .map_err(|err| {
            tracing::warn!(payment_id = %payment.id, tier = %err.0, "Unknown subscription tier");
            CallbackError::from(err)
        })?;

        // 4. Settle
        let settlement = self.settlement.commit(payment).await?;
        let payment_id = settlement.payment().id;

        if !settlement.is_new() {
            return Ok(HandleCallbackResult {
                payment_id,
                newly_settled: false,
                fulfillment: FulfillmentStatus::Duplicate,
            });
        }

        // 5. Fulfill
        let payment = settlement.payment();
        let fulfillment = match plan {
            None => {
                tracing::warn!(
                    payment_id = %payment.id,
                    payment_type = %payment.payment_type,
                    "No fulfillment for payment type"
                );
                FulfillmentStatus::Unhandled
            }
            Some(plan) => match self.dispatcher.dispatch(payment, plan).await {
                Ok(report) => FulfillmentStatus::Completed(report),
                Err(err) => {
                    tracing::error!(
                        payment_id = %payment.id,
                        user_id = %payment.user_id,
                        kind = %plan.kind(),
                        error = %err,
                        "Fulfillment failed after settlement"
                    );
                    FulfillmentStatus::Failed(err)
                }
            },
        };

        Ok(HandleCallbackResult {
            payment_id,
            newly_settled: true,
            fulfillment,
        })
    }
}
