//! Route configuration for the callback endpoint.

use axum::routing::get;
use axum::Router;

use super::handlers::{health, robokassa_callback_form, robokassa_callback_query, CallbackAppState};

/// Creates the callback router.
///
/// Routes:
/// - `GET /api/payments/robokassa/callback` - Result callback as query string
/// - `POST /api/payments/robokassa/callback` - Result callback as form body
/// - `GET /health` - Liveness probe
pub fn callback_router() -> Router<CallbackAppState> {
    Router::new()
        .route(
            "/api/payments/robokassa/callback",
            get(robokassa_callback_query).post(robokassa_callback_form),
        )
        .route("/health", get(health))
}
