//! Domain layer containing business rules and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamp, errors)
//! - `payment` - Payment entity, callback parameters, signature verification
//! - `subscription` - Subscription tiers and window arithmetic
//! - `consultation` - Consultation bookings and their notification bodies
//! - `fulfillment` - Routing a settled payment to its fulfillment path

pub mod consultation;
pub mod foundation;
pub mod fulfillment;
pub mod payment;
pub mod subscription;
