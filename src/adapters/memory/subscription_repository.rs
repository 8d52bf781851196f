//! In-memory subscription repository for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId, Timestamp, UserId};
use crate::domain::subscription::Subscription;
use crate::ports::SubscriptionRepository;

/// Subscriptions keyed by user, mirroring the unique `user_id` column.
///
/// # Panics
///
/// Methods panic if the internal lock is poisoned.
pub struct InMemorySubscriptionRepository {
    by_user: RwLock<HashMap<UserId, Subscription>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self {
            by_user: RwLock::new(HashMap::new()),
        }
    }

    // === Test Helpers ===

    pub fn insert(&self, subscription: Subscription) {
        self.by_user
            .write()
            .expect("InMemorySubscriptionRepository: lock poisoned")
            .insert(subscription.user_id, subscription);
    }

    pub fn get(&self, user_id: UserId) -> Option<Subscription> {
        self.by_user
            .read()
            .expect("InMemorySubscriptionRepository: lock poisoned")
            .get(&user_id)
            .cloned()
    }

    pub fn count(&self) -> usize {
        self.by_user
            .read()
            .expect("InMemorySubscriptionRepository: lock poisoned")
            .len()
    }
}

impl Default for InMemorySubscriptionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn get_or_create_for_user(
        &self,
        user_id: &UserId,
        now: Timestamp,
    ) -> Result<Subscription, DomainError> {
        let mut by_user = self
            .by_user
            .write()
            .expect("InMemorySubscriptionRepository: lock poisoned");

        let next_id = SubscriptionId::new(by_user.len() as i64 + 1);
        Ok(by_user
            .entry(*user_id)
            .or_insert_with(|| Subscription::new_free(next_id, *user_id, now))
            .clone())
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let mut by_user = self
            .by_user
            .write()
            .expect("InMemorySubscriptionRepository: lock poisoned");

        match by_user.get_mut(&subscription.user_id) {
            Some(stored) if stored.id == subscription.id => {
                *stored = subscription.clone();
                Ok(())
            }
            _ => Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                format!("Subscription {} not found", subscription.id),
            )),
        }
    }
}
