//! Subscription repository port.
//!
//! Each user owns at most one subscription row; implementations enforce
//! this with a unique constraint on `user_id`.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::subscription::Subscription;

/// Repository port for Subscription persistence.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Return the user's subscription, creating a free one if absent.
    ///
    /// Concurrent calls for the same user must yield the same row.
    async fn get_or_create_for_user(
        &self,
        user_id: &UserId,
        now: Timestamp,
    ) -> Result<Subscription, DomainError>;

    /// Persist tier, expiry, active flag and funding payment.
    ///
    /// # Errors
    ///
    /// - `SubscriptionNotFound` if the row doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SubscriptionRepository) {}
    }
}
