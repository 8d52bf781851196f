//! HTTP adapter for the payment provider's result callback.
//!
//! - `GET /api/payments/robokassa/callback` - callback as query string
//! - `POST /api/payments/robokassa/callback` - callback as form body
//! - `GET /health` - liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::ErrorResponse;
pub use handlers::{CallbackApiError, CallbackAppState};
pub use routes::callback_router;
