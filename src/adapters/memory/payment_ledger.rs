//! In-memory payment ledger for testing.
//!
//! # Security Note
//!
//! This adapter is for **testing only**. It uses `.expect()` on lock
//! operations which will panic if locks are poisoned.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, PaymentId, Timestamp};
use crate::domain::payment::Payment;
use crate::ports::{PaymentLedger, SettleResult};

/// Payment ledger backed by a map.
///
/// Settlement takes the write lock for the whole check-and-set, so
/// concurrent callers race exactly like the conditional UPDATE in the
/// PostgreSQL adapter.
pub struct InMemoryPaymentLedger {
    payments: RwLock<HashMap<PaymentId, Payment>>,
    settle_calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryPaymentLedger {
    pub fn new() -> Self {
        Self {
            payments: RwLock::new(HashMap::new()),
            settle_calls: AtomicUsize::new(0),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Creates a ledger preloaded with `payments`.
    pub fn with_payments(payments: impl IntoIterator<Item = Payment>) -> Self {
        let ledger = Self::new();
        for payment in payments {
            ledger.insert(payment);
        }
        ledger
    }

    // === Test Helpers ===

    /// Adds or replaces a payment.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn insert(&self, payment: Payment) {
        self.payments
            .write()
            .expect("InMemoryPaymentLedger: payments lock poisoned")
            .insert(payment.id, payment);
    }

    /// Returns a stored payment.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn get(&self, id: PaymentId) -> Option<Payment> {
        self.payments
            .read()
            .expect("InMemoryPaymentLedger: payments lock poisoned")
            .get(&id)
            .cloned()
    }

    /// Number of `mark_settled` calls seen.
    pub fn settle_calls(&self) -> usize {
        self.settle_calls.load(Ordering::SeqCst)
    }

    /// Makes every subsequent call fail with a database error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::database("ledger unavailable"));
        }
        Ok(())
    }
}

impl Default for InMemoryPaymentLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentLedger for InMemoryPaymentLedger {
    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        self.check_available()?;
        Ok(self.get(*id))
    }

    async fn mark_settled(
        &self,
        id: &PaymentId,
        at: Timestamp,
    ) -> Result<SettleResult, DomainError> {
        self.check_available()?;
        self.settle_calls.fetch_add(1, Ordering::SeqCst);

        let mut payments = self
            .payments
            .write()
            .expect("InMemoryPaymentLedger: payments lock poisoned");

        Ok(match payments.get_mut(id) {
            None => SettleResult::NotFound,
            Some(payment) => {
                if payment.mark_settled(at) {
                    SettleResult::Settled
                } else {
                    SettleResult::AlreadySettled
                }
            }
        })
    }
}
