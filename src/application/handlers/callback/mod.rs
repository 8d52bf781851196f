//! Result-callback handlers.
//!
//! ## Commands
//! - Processing a Robokassa result callback end to end
//! - Settling a payment idempotently
//!
//! ## Fulfillment
//! - Activating a subscription window
//! - Requesting material delivery
//! - Confirming a consultation batch
//! - Dispatching a settled payment to one of the above

mod activate_subscription;
mod confirm_consultation;
mod deliver_materials;
mod dispatcher;
mod handle_callback;
mod settle_payment;

pub use activate_subscription::ActivateSubscriptionHandler;
pub use confirm_consultation::ConfirmConsultationHandler;
pub use deliver_materials::{DeliverMaterialsHandler, MATERIALS_READY_MESSAGE};
pub use dispatcher::FulfillmentDispatcher;
pub use handle_callback::{
    FulfillmentStatus, HandleCallbackCommand, HandleCallbackHandler, HandleCallbackResult,
};
pub use settle_payment::{SettlePaymentCommand, SettlePaymentHandler};
