//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresPaymentLedger` - payment lookup and conditional settlement
//! - `PostgresSubscriptionRepository` - per-user subscription rows
//! - `PostgresConsultationRepository` - bookings linked to a payment
//!
//! Serial primary keys are `int4`; user ids are Telegram ids and need `int8`.

mod consultation_repository;
mod payment_ledger;
mod subscription_repository;

pub use consultation_repository::PostgresConsultationRepository;
pub use payment_ledger::PostgresPaymentLedger;
pub use subscription_repository::PostgresSubscriptionRepository;

use crate::domain::foundation::{DomainError, ErrorCode};

fn widen_id(id: i32) -> i64 {
    i64::from(id)
}

/// Converts a lookup id to an `int4` key. `None` means no row can match.
fn int4_key(id: i64) -> Option<i32> {
    i32::try_from(id).ok()
}

/// Converts a domain id to an `int4` key.
fn narrow_id(id: i64) -> Result<i32, DomainError> {
    i32::try_from(id).map_err(|_| {
        DomainError::new(
            ErrorCode::InvalidStoredValue,
            format!("Id out of range for int4 column: {}", id),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_id_accepts_int4_range() {
        assert_eq!(narrow_id(42).unwrap(), 42);
        assert_eq!(narrow_id(i64::from(i32::MAX)).unwrap(), i32::MAX);
    }

    #[test]
    fn int4_key_is_none_outside_int4_range() {
        assert_eq!(int4_key(7), Some(7));
        assert_eq!(int4_key(i64::from(i32::MAX) + 1), None);
        assert_eq!(int4_key(i64::from(i32::MIN) - 1), None);
    }

    #[test]
    fn narrow_id_rejects_overflow() {
        let err = narrow_id(i64::from(i32::MAX) + 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStoredValue);
    }
}
