//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod callback;

pub use callback::{
    ActivateSubscriptionHandler, ConfirmConsultationHandler, DeliverMaterialsHandler,
    FulfillmentDispatcher, FulfillmentStatus, HandleCallbackCommand, HandleCallbackHandler,
    HandleCallbackResult, SettlePaymentCommand, SettlePaymentHandler,
};
