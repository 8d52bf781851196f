//! Subscription aggregate entity.
//!
//! Each user has exactly one Subscription row, created lazily on the first
//! paid subscription callback. Every settled subscription payment moves the
//! expiry forward and records which payment funded it.
//!
//! # Invariants
//!
//! - One row per user (unique `user_id` at the storage level)
//! - A special-tier purchase on top of an unexpired paid window stacks onto
//!   the existing expiry instead of restarting the clock
//! - A rejected activation leaves every field untouched

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PaymentId, SubscriptionId, Timestamp, UserId};

use super::{SubscriptionTier, UnknownTier};

/// A user's subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub tier: SubscriptionTier,

    /// End of the paid window; `None` on the free tier.
    pub expires_at: Option<Timestamp>,

    pub is_active: bool,

    /// Payment that most recently funded this subscription.
    pub payment_id: Option<PaymentId>,

    pub created_at: Timestamp,
}

impl Subscription {
    /// Creates the default row a user gets before any purchase.
    pub fn new_free(id: SubscriptionId, user_id: UserId, now: Timestamp) -> Self {
        Self {
            id,
            user_id,
            tier: SubscriptionTier::Free,
            expires_at: None,
            is_active: true,
            payment_id: None,
            created_at: now,
        }
    }

    /// Returns true while a paid window is still running.
    pub fn has_unexpired_window(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|expiry| expiry.is_after(&now))
    }

    /// Computes where a new window for `purchased` begins.
    ///
    /// Special purchases on a non-free plan with an unexpired window start at
    /// the current expiry; everything else starts at `now`.
    pub fn window_start(&self, purchased: SubscriptionTier, now: Timestamp) -> Timestamp {
        let stacks = purchased == SubscriptionTier::Special
            && !self.tier.is_free()
            && self.has_unexpired_window(now);
        match self.expires_at {
            Some(expiry) if stacks => expiry,
            _ => now,
        }
    }

    /// Applies a settled purchase of `tier`, returning the new expiry.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTier` for tiers that cannot be purchased; the
    /// subscription is not modified in that case.
    pub fn activate(
        &mut self,
        payment_id: PaymentId,
        tier: SubscriptionTier,
        now: Timestamp,
    ) -> Result<Timestamp, UnknownTier> {
        let days = tier
            .window_days()
            .ok_or_else(|| UnknownTier(tier.as_str().to_string()))?;

        let expires_at = self.window_start(tier, now).add_days(days);

        self.payment_id = Some(payment_id);
        self.tier = tier;
        self.expires_at = Some(expires_at);
        self.is_active = true;

        Ok(expires_at)
    }
}
