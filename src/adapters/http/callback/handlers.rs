//! HTTP handlers for the result callback.
//!
//! Robokassa may deliver the callback as a GET query or a POST form,
//! depending on the merchant settings. Both carry the same fields.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Form, Json, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

use crate::application::handlers::callback::{
    ActivateSubscriptionHandler, ConfirmConsultationHandler, DeliverMaterialsHandler,
    FulfillmentDispatcher, FulfillmentStatus, HandleCallbackCommand, HandleCallbackHandler,
    SettlePaymentHandler,
};
use crate::domain::payment::{CallbackError, CallbackParams, MerchantSignatures};
use crate::ports::{
    ConsultationRepository, Destination, MaterialDelivery, Notifier, PaymentLedger,
    SubscriptionRepository,
};

use super::dto::ErrorResponse;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
#[derive(Clone)]
pub struct CallbackAppState {
    pub payment_ledger: Arc<dyn PaymentLedger>,
    pub subscription_repository: Arc<dyn SubscriptionRepository>,
    pub consultation_repository: Arc<dyn ConsultationRepository>,
    pub notifier: Arc<dyn Notifier>,
    pub material_delivery: Arc<dyn MaterialDelivery>,
    pub signatures: Arc<MerchantSignatures>,
    pub operator_chat: Option<Destination>,
}

impl CallbackAppState {
    pub fn handle_callback_handler(&self) -> HandleCallbackHandler {
        let dispatcher = FulfillmentDispatcher::new(
            ActivateSubscriptionHandler::new(self.subscription_repository.clone()),
            DeliverMaterialsHandler::new(self.material_delivery.clone()),
            ConfirmConsultationHandler::new(
                self.consultation_repository.clone(),
                self.notifier.clone(),
                self.operator_chat.clone(),
            ),
        );

        HandleCallbackHandler::new(
            self.signatures.clone(),
            SettlePaymentHandler::new(self.payment_ledger.clone()),
            dispatcher,
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/payments/robokassa/callback
pub async fn robokassa_callback_query(
    State(state): State<CallbackAppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, CallbackApiError> {
    process_callback(&state, &raw).await
}

/// POST /api/payments/robokassa/callback
pub async fn robokassa_callback_form(
    State(state): State<CallbackAppState>,
    Form(raw): Form<HashMap<String, String>>,
) -> Result<impl IntoResponse, CallbackApiError> {
    process_callback(&state, &raw).await
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

async fn process_callback(
    state: &CallbackAppState,
    raw: &HashMap<String, String>,
) -> Result<impl IntoResponse, CallbackApiError> {
    let params = CallbackParams::from_map(raw)?;
    let invoice_id = params.invoice_id;

    let result = state
        .handle_callback_handler()
        .handle(HandleCallbackCommand { params })
        .await
        .map_err(|err| {
            if err.status_code().is_server_error() {
                tracing::error!(payment_id = %invoice_id, error = %err, "Callback failed");
            }
            err
        })?;

    match &result.fulfillment {
        FulfillmentStatus::Completed(report) if !report.is_complete() => {
            tracing::warn!(payment_id = %result.payment_id, ?report, "Fulfillment incomplete");
        }
        FulfillmentStatus::Duplicate => {
            tracing::info!(payment_id = %result.payment_id, "Duplicate callback acknowledged");
        }
        _ => {}
    }

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        result.acknowledgement(),
    ))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts to HTTP responses.
#[derive(Debug)]
pub struct CallbackApiError(pub CallbackError);

impl From<CallbackError> for CallbackApiError {
    fn from(err: CallbackError) -> Self {
        CallbackApiError(err)
    }
}

impl IntoResponse for CallbackApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();
        (status, Json(ErrorResponse::from_callback_error(&self.0))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn api_error_uses_callback_status() {
        let response = CallbackApiError(CallbackError::AmountMismatch {
            expected: 500,
            claimed: "499.00".to_string(),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "AMOUNT_MISMATCH");
    }

    #[tokio::test]
    async fn configuration_error_is_500() {
        let response =
            CallbackApiError(CallbackError::Configuration("no password".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
