//! Subscription tier definitions.
//!
//! Represents the plan levels a user's subscription can be on, and how long
//! a purchased plan lasts.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Days granted by a monthly plan purchase.
const MONTHLY_WINDOW_DAYS: i64 = 30;

/// Days granted by a special (quarterly) plan purchase.
const SPECIAL_WINDOW_DAYS: i64 = 90;

/// Subscription plan level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    /// Default plan every user starts on. No expiry tracked.
    Free,

    /// Paid monthly plan.
    Unlimited,

    /// Paid monthly plan with extended features.
    Premium,

    /// Plan granted by someone else's gift purchase.
    Gift,

    /// Paid 90-day plan. Stacks onto an unexpired paid window.
    Special,
}

/// A tier tag that does not name a purchasable plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown subscription tier: {0}")]
pub struct UnknownTier(pub String);

impl SubscriptionTier {
    /// Returns the stored/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Unlimited => "unlimited",
            SubscriptionTier::Premium => "premium",
            SubscriptionTier::Gift => "gift",
            SubscriptionTier::Special => "special",
        }
    }

    /// Returns true for the default free plan.
    pub fn is_free(&self) -> bool {
        matches!(self, SubscriptionTier::Free)
    }

    /// Length of the window a purchase of this tier grants.
    ///
    /// Free and gift tiers cannot be bought through a callback and return `None`.
    pub fn window_days(&self) -> Option<i64> {
        match self {
            SubscriptionTier::Unlimited | SubscriptionTier::Premium => Some(MONTHLY_WINDOW_DAYS),
            SubscriptionTier::Special => Some(SPECIAL_WINDOW_DAYS),
            SubscriptionTier::Free | SubscriptionTier::Gift => None,
        }
    }

    /// Parses a tier tag and checks that it names a purchasable plan.
    pub fn purchasable(tag: &str) -> Result<Self, UnknownTier> {
        let tier: SubscriptionTier = tag.parse()?;
        match tier.window_days() {
            Some(_) => Ok(tier),
            None => Err(UnknownTier(tag.to_string())),
        }
    }
}

impl FromStr for SubscriptionTier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(SubscriptionTier::Free),
            "unlimited" => Ok(SubscriptionTier::Unlimited),
            "premium" => Ok(SubscriptionTier::Premium),
            "gift" => Ok(SubscriptionTier::Gift),
            "special" => Ok(SubscriptionTier::Special),
            other => Err(UnknownTier(other.to_string())),
        }
    }
}

impl std::fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
