//! Consultation domain module.
//!
//! - `entity` - Consultation and the notification summary
//! - `messages` - operator and user notification bodies

mod entity;
mod messages;

pub use entity::{Consultation, ConsultationSummary};
pub use messages::{escape_html, operator_message, user_message};

#[cfg(test)]
pub(crate) use entity::test_support;
