//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, the timestamp value object, and the error type
//! returned by persistence ports.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode};
pub use ids::{
    ConsultationId, MaterialId, PaymentId, ServiceId, SpecialistId, SubscriptionId, UserId,
};
pub use timestamp::Timestamp;
