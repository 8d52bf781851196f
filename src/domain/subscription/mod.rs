//! Subscription domain module.
//!
//! - `tier` - SubscriptionTier plan levels and purchase windows
//! - `aggregate` - Subscription entity and window arithmetic

mod aggregate;
mod tier;

pub use aggregate::Subscription;
pub use tier::{SubscriptionTier, UnknownTier};
