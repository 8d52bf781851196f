//! Strongly-typed identifier value objects.
//!
//! Every entity in the payment store is keyed by a database integer, so the
//! identifiers here wrap `i64` rather than UUIDs. The wrappers keep a payment
//! id from being passed where a user id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw database identifier.
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw database identifier.
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

integer_id!(
    /// Identifier of a payment row; doubles as the provider's invoice id (`InvId`).
    PaymentId
);

integer_id!(
    /// Telegram id of the user who owns a payment (`Shp_id`).
    UserId
);

integer_id!(
    /// Identifier of a booked consultation.
    ConsultationId
);

integer_id!(
    /// Identifier of a subscription row.
    SubscriptionId
);

integer_id!(
    /// Identifier of a purchasable digital material.
    MaterialId
);

integer_id!(
    /// Identifier of the specialist running a consultation.
    SpecialistId
);

integer_id!(
    /// Identifier of the service booked in a consultation.
    ServiceId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_id_parses_from_string() {
        let id: PaymentId = "4821".parse().unwrap();
        assert_eq!(id.value(), 4821);
    }

    #[test]
    fn payment_id_parse_trims_whitespace() {
        let id: PaymentId = " 17 ".parse().unwrap();
        assert_eq!(id, PaymentId::new(17));
    }

    #[test]
    fn payment_id_rejects_non_numeric() {
        assert!("abc".parse::<PaymentId>().is_err());
        assert!("12.5".parse::<PaymentId>().is_err());
    }

    #[test]
    fn user_id_displays_raw_value() {
        assert_eq!(UserId::new(123456789).to_string(), "123456789");
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&MaterialId::new(7)).unwrap();
        assert_eq!(json, "7");

        let id: ConsultationId = serde_json::from_str("42").unwrap();
        assert_eq!(id, ConsultationId::new(42));
    }
}
