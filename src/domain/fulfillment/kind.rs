//! Fulfillment routing.
//!
//! A settled payment is routed to exactly one fulfillment path. The
//! callback's declared `Shp_type` wins when it names a path; otherwise the
//! payment's stored type decides.

use serde::Serialize;

use crate::domain::payment::{Payment, PaymentType};
use crate::domain::subscription::{SubscriptionTier, UnknownTier};

/// Tier granted when the callback names none.
pub const DEFAULT_TIER: SubscriptionTier = SubscriptionTier::Unlimited;

/// The fulfillment paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentKind {
    Subscription,
    Material,
    Consultation,
}

impl FulfillmentKind {
    /// Maps a declared type tag to a path, if it names one.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "subscription" => Some(FulfillmentKind::Subscription),
            "material" => Some(FulfillmentKind::Material),
            "consultation" => Some(FulfillmentKind::Consultation),
            _ => None,
        }
    }

    /// Maps a stored payment type to a path, if it has one.
    pub fn from_payment_type(payment_type: PaymentType) -> Option<Self> {
        match payment_type {
            PaymentType::Subscription => Some(FulfillmentKind::Subscription),
            PaymentType::Material => Some(FulfillmentKind::Material),
            PaymentType::Consultation => Some(FulfillmentKind::Consultation),
            PaymentType::Gift | PaymentType::Service | PaymentType::Other => None,
        }
    }

    /// Declared tag first, stored type second.
    pub fn resolve(declared: &str, stored: PaymentType) -> Option<Self> {
        Self::from_tag(declared).or_else(|| Self::from_payment_type(stored))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FulfillmentKind::Subscription => "subscription",
            FulfillmentKind::Material => "material",
            FulfillmentKind::Consultation => "consultation",
        }
    }
}

impl std::fmt::Display for FulfillmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fully resolved fulfillment decision, made before settlement so that
/// invalid input is rejected while nothing has been committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FulfillmentPlan {
    Subscription(SubscriptionTier),
    Material,
    Consultation,
}

impl FulfillmentPlan {
    /// Resolves the plan for `payment`.
    ///
    /// Returns `Ok(None)` when no path applies (gift, service, other).
    ///
    /// # Errors
    ///
    /// `UnknownTier` when the subscription path is chosen and the declared
    /// tier is not a purchasable plan.
    pub fn resolve(
        declared_type: &str,
        declared_tier: Option<&str>,
        payment: &Payment,
    ) -> Result<Option<Self>, UnknownTier> {
        let plan = match FulfillmentKind::resolve(declared_type, payment.payment_type) {
            Some(FulfillmentKind::Subscription) => {
                let tier = match declared_tier {
                    Some(tag) => SubscriptionTier::purchasable(tag)?,
                    None => DEFAULT_TIER,
                };
                Some(FulfillmentPlan::Subscription(tier))
            }
            Some(FulfillmentKind::Material) => Some(FulfillmentPlan::Material),
            Some(FulfillmentKind::Consultation) => Some(FulfillmentPlan::Consultation),
            None => None,
        };
        Ok(plan)
    }

    pub fn kind(&self) -> FulfillmentKind {
        match self {
            FulfillmentPlan::Subscription(_) => FulfillmentKind::Subscription,
            FulfillmentPlan::Material => FulfillmentKind::Material,
            FulfillmentPlan::Consultation => FulfillmentKind::Consultation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::test_support::unpaid_payment;

    // ══════════════════════════════════════════════════════════════
    // Kind Routing Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn declared_tag_wins_over_stored_type() {
        assert_eq!(
            FulfillmentKind::resolve("material", PaymentType::Subscription),
            Some(FulfillmentKind::Material)
        );
        assert_eq!(
            FulfillmentKind::resolve("consultation", PaymentType::Material),
            Some(FulfillmentKind::Consultation)
        );
    }

    #[test]
    fn unknown_tag_falls_back_to_stored_type() {
        assert_eq!(
            FulfillmentKind::resolve("bogus", PaymentType::Consultation),
            Some(FulfillmentKind::Consultation)
        );
    }

    #[test]
    fn non_path_tag_falls_back_to_stored_type() {
        assert_eq!(
            FulfillmentKind::resolve("gift", PaymentType::Material),
            Some(FulfillmentKind::Material)
        );
    }

    #[test]
    fn unroutable_stored_types_yield_none() {
        for stored in [PaymentType::Gift, PaymentType::Service, PaymentType::Other] {
            assert_eq!(FulfillmentKind::resolve("bogus", stored), None);
        }
    }

    #[test]
    fn tags_are_case_sensitive() {
        assert_eq!(FulfillmentKind::from_tag("Material"), None);
    }

    // ══════════════════════════════════════════════════════════════
    // Plan Resolution Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn declared_tier_is_used() {
        let payment = unpaid_payment(1, 500, PaymentType::Subscription);

        let plan = FulfillmentPlan::resolve("subscription", Some("special"), &payment).unwrap();

        assert_eq!(plan, Some(FulfillmentPlan::Subscription(SubscriptionTier::Special)));
    }

    #[test]
    fn missing_tier_ignores_stored_tier_and_defaults_to_unlimited() {
        let mut payment = unpaid_payment(1, 500, PaymentType::Subscription);
        payment.subscription_type = Some(SubscriptionTier::Special);

        let plan = FulfillmentPlan::resolve("subscription", None, &payment).unwrap();

        assert_eq!(
            plan,
            Some(FulfillmentPlan::Subscription(SubscriptionTier::Unlimited))
        );
    }

    #[test]
    fn unknown_declared_tier_is_rejected() {
        let payment = unpaid_payment(1, 500, PaymentType::Subscription);

        let result = FulfillmentPlan::resolve("subscription", Some("platinum"), &payment);

        assert_eq!(result, Err(UnknownTier("platinum".to_string())));
    }

    #[test]
    fn tier_is_ignored_for_other_paths() {
        let payment = unpaid_payment(1, 500, PaymentType::Material);

        let plan = FulfillmentPlan::resolve("material", Some("platinum"), &payment).unwrap();

        assert_eq!(plan, Some(FulfillmentPlan::Material));
    }

    #[test]
    fn gift_payment_has_no_plan() {
        let payment = unpaid_payment(1, 500, PaymentType::Gift);

        assert_eq!(FulfillmentPlan::resolve("other", None, &payment).unwrap(), None);
    }
}
