//! Payment ledger port.
//!
//! The only writer of a payment's settlement fields. Settlement must be a
//! compare-and-set so that of several concurrent callbacks for the same
//! invoice exactly one observes `Settled`.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PaymentId, Timestamp};
use crate::domain::payment::Payment;

/// Result of attempting the unsettled → settled transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleResult {
    /// This call flipped the flag.
    Settled,
    /// The payment was already settled; nothing was written.
    AlreadySettled,
    /// No payment with that id.
    NotFound,
}

/// Repository port for payment lookups and settlement.
#[async_trait]
pub trait PaymentLedger: Send + Sync {
    /// Find a payment by id.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError>;

    /// Atomically set `is_paid = true, paid_at = at` if the payment is not
    /// yet settled.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn mark_settled(&self, id: &PaymentId, at: Timestamp)
        -> Result<SettleResult, DomainError>;
}
