//! Payment entity.
//!
//! A Payment is created upstream when an order is placed. This service only
//! ever moves it from unsettled to settled.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MaterialId, PaymentId, Timestamp, UserId};
use crate::domain::subscription::SubscriptionTier;

use super::PaymentType;

/// One monetary transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub user_id: UserId,

    /// Price in whole currency units.
    pub price: i64,

    /// Tier recorded at order time, if the order was for a subscription.
    pub subscription_type: Option<SubscriptionTier>,

    pub payment_type: PaymentType,
    pub is_paid: bool,
    pub paid_at: Option<Timestamp>,
    pub created_at: Timestamp,

    /// Earlier payment this one renews.
    pub parent_payment_id: Option<PaymentId>,

    /// Materials purchased, for material payments.
    pub material_ids: Vec<MaterialId>,
}

impl Payment {
    /// Checks a provider-claimed amount against the stored price.
    ///
    /// The claim is truncated toward zero to whole units first.
    pub fn matches_amount(&self, claimed: &Decimal) -> bool {
        claimed
            .trunc()
            .to_i64()
            .is_some_and(|whole| whole == self.price)
    }

    /// Marks the payment settled at `at`.
    ///
    /// Returns false, leaving `paid_at` untouched, if it was already settled.
    pub fn mark_settled(&mut self, at: Timestamp) -> bool {
        if self.is_paid {
            return false;
        }
        self.is_paid = true;
        self.paid_at = Some(at);
        true
    }
}

/// Result of a settlement attempt on an existing payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// This call performed the unsettled → settled transition.
    NewlySettled(Payment),

    /// Another call settled the payment earlier.
    AlreadySettled(Payment),
}

impl Settlement {
    /// Returns the payment regardless of who settled it.
    pub fn payment(&self) -> &Payment {
        match self {
            Settlement::NewlySettled(p) | Settlement::AlreadySettled(p) => p,
        }
    }

    /// Returns true if this call won the settlement.
    pub fn is_new(&self) -> bool {
        matches!(self, Settlement::NewlySettled(_))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::unpaid_payment;
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn exact_amount_matches() {
        let payment = unpaid_payment(1, 500, PaymentType::Subscription);
        assert!(payment.matches_amount(&dec("500")));
        assert!(payment.matches_amount(&dec("500.000000")));
    }

    #[test]
    fn fractional_claim_is_truncated() {
        let payment = unpaid_payment(1, 500, PaymentType::Subscription);
        assert!(payment.matches_amount(&dec("500.75")));
        assert!(!payment.matches_amount(&dec("499.99")));
    }

    #[test]
    fn lower_amount_does_not_match() {
        let payment = unpaid_payment(1, 500, PaymentType::Subscription);
        assert!(!payment.matches_amount(&dec("499")));
    }

    #[test]
    fn mark_settled_is_monotonic() {
        let mut payment = unpaid_payment(1, 500, PaymentType::Material);
        let first = Timestamp::now();

        assert!(payment.mark_settled(first));
        assert!(payment.is_paid);
        assert_eq!(payment.paid_at, Some(first));

        assert!(!payment.mark_settled(first.add_days(1)));
        assert_eq!(payment.paid_at, Some(first));
    }

    #[test]
    fn settlement_exposes_payment() {
        let payment = unpaid_payment(9, 100, PaymentType::Consultation);
        let settled = Settlement::AlreadySettled(payment.clone());

        assert_eq!(settled.payment(), &payment);
        assert!(!settled.is_new());
        assert!(Settlement::NewlySettled(payment).is_new());
    }
}
