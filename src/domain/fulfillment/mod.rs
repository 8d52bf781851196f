//! Fulfillment domain module.
//!
//! - `kind` - routing from type tags to fulfillment paths
//! - `report` - per-run outcome

mod kind;
mod report;

pub use kind::{FulfillmentKind, FulfillmentPlan, DEFAULT_TIER};
pub use report::FulfillmentReport;
