//! Payment type tags.
//!
//! The stored `payment_type` column and the `Shp_type` callback parameter
//! share the same vocabulary.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// What a payment was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Subscription,
    Consultation,
    Material,
    Gift,
    Service,
    Other,
}

/// A payment type tag outside the known vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown payment type: {0}")]
pub struct UnknownPaymentType(pub String);

impl PaymentType {
    /// Returns the stored/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Subscription => "subscription",
            PaymentType::Consultation => "consultation",
            PaymentType::Material => "material",
            PaymentType::Gift => "gift",
            PaymentType::Service => "service",
            PaymentType::Other => "other",
        }
    }
}

impl Default for PaymentType {
    fn default() -> Self {
        PaymentType::Subscription
    }
}

impl FromStr for PaymentType {
    type Err = UnknownPaymentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subscription" => Ok(PaymentType::Subscription),
            "consultation" => Ok(PaymentType::Consultation),
            "material" => Ok(PaymentType::Material),
            "gift" => Ok(PaymentType::Gift),
            "service" => Ok(PaymentType::Service),
            "other" => Ok(PaymentType::Other),
            other => Err(UnknownPaymentType(other.to_string())),
        }
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_subscription() {
        assert_eq!(PaymentType::default(), PaymentType::Subscription);
    }

    #[test]
    fn parses_all_stored_values() {
        for ty in [
            PaymentType::Subscription,
            PaymentType::Consultation,
            PaymentType::Material,
            PaymentType::Gift,
            PaymentType::Service,
            PaymentType::Other,
        ] {
            assert_eq!(ty.as_str().parse::<PaymentType>().unwrap(), ty);
        }
    }

    #[test]
    fn rejects_unknown_tag() {
        assert_eq!(
            "refund".parse::<PaymentType>(),
            Err(UnknownPaymentType("refund".to_string()))
        );
    }
}
