//! Payment domain module.
//!
//! - `aggregate` - Payment entity and settlement result
//! - `payment_type` - PaymentType tags
//! - `errors` - CallbackError taxonomy
//! - `signature` - Robokassa signature verification
//! - `callback_params` - typed callback parameters

mod aggregate;
mod callback_params;
mod errors;
mod payment_type;
mod signature;

pub use aggregate::{Payment, Settlement};
pub use callback_params::{CallbackParams, CUSTOM_PARAM_PREFIX, DEFAULT_DECLARED_TYPE};
pub use errors::CallbackError;
pub use payment_type::{PaymentType, UnknownPaymentType};
pub use signature::{
    canonical_string, MerchantSignatures, SignatureAlgorithm, SignatureVerifier,
};

#[cfg(test)]
pub(crate) use aggregate::test_support;
