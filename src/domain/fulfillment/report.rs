//! What a fulfillment handler did with a settled payment.

use serde::Serialize;

use crate::domain::foundation::Timestamp;
use crate::domain::subscription::SubscriptionTier;

/// Outcome of one fulfillment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FulfillmentReport {
    SubscriptionActivated {
        tier: SubscriptionTier,
        expires_at: Timestamp,
    },

    /// Delivery was requested; `delivered` is false when the service failed.
    MaterialsRequested { count: usize, delivered: bool },

    /// Material payment carried no material ids.
    NoMaterials,

    ConsultationsConfirmed {
        count: usize,
        operator_notified: bool,
        user_notified: bool,
    },

    /// Consultation payment had no linked bookings.
    NoConsultations,
}

impl FulfillmentReport {
    /// True if every side effect of the run succeeded.
    pub fn is_complete(&self) -> bool {
        match self {
            FulfillmentReport::MaterialsRequested { delivered, .. } => *delivered,
            FulfillmentReport::ConsultationsConfirmed {
                operator_notified,
                user_notified,
                ..
            } => *operator_notified && *user_notified,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_delivery_is_incomplete() {
        let report = FulfillmentReport::MaterialsRequested {
            count: 2,
            delivered: false,
        };
        assert!(!report.is_complete());
    }

    #[test]
    fn partial_notification_is_incomplete() {
        let report = FulfillmentReport::ConsultationsConfirmed {
            count: 1,
            operator_notified: true,
            user_notified: false,
        };
        assert!(!report.is_complete());
    }

    #[test]
    fn no_op_runs_are_complete() {
        assert!(FulfillmentReport::NoMaterials.is_complete());
        assert!(FulfillmentReport::NoConsultations.is_complete());
    }
}
