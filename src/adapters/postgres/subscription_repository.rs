//! PostgreSQL implementation of SubscriptionRepository.
//!
//! `subscriptions.user_id` carries a unique constraint, which makes the
//! get-or-create race-free: losers of a concurrent insert read the winner's row.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::PgPool;

use crate::domain::foundation::{
    DomainError, ErrorCode, PaymentId, SubscriptionId, Timestamp, UserId,
};
use crate::domain::subscription::{Subscription, SubscriptionTier};
use crate::ports::SubscriptionRepository;

use super::{narrow_id, widen_id};

/// PostgreSQL implementation of the SubscriptionRepository port.
pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, user_id: &UserId) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, subscription_type, expires_at, is_active, payment_id, created_at
            FROM subscriptions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find subscription: {}", e)))?;

        row.map(Subscription::try_from).transpose()
    }
}

/// Database row representation of a subscription.
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: i32,
    user_id: i64,
    subscription_type: String,
    expires_at: Option<NaiveDateTime>,
    is_active: bool,
    payment_id: Option<i32>,
    created_at: NaiveDateTime,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let tier: SubscriptionTier = row.subscription_type.parse().map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStoredValue,
                format!("Invalid subscription_type value: {}", row.subscription_type),
            )
        })?;

        Ok(Subscription {
            id: SubscriptionId::new(widen_id(row.id)),
            user_id: UserId::new(row.user_id),
            tier,
            expires_at: row.expires_at.map(Timestamp::from_naive_utc),
            is_active: row.is_active,
            payment_id: row.payment_id.map(|id| PaymentId::new(widen_id(id))),
            created_at: Timestamp::from_naive_utc(row.created_at),
        })
    }
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn get_or_create_for_user(
        &self,
        user_id: &UserId,
        now: Timestamp,
    ) -> Result<Subscription, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (user_id, subscription_type, is_active, created_at)
            VALUES ($1, $2, TRUE, $3)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id.value())
        .bind(SubscriptionTier::Free.as_str())
        .bind(now.as_naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to create subscription: {}", e)))?;

        self.fetch(user_id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::SubscriptionNotFound,
                "Subscription missing after insert",
            )
            .with_detail("user_id", user_id.to_string())
        })
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let payment_id = subscription
            .payment_id
            .map(|id| narrow_id(id.value()))
            .transpose()?;

        let result = sqlx::query(
            r#"
            UPDATE subscriptions SET
                subscription_type = $2,
                expires_at = $3,
                is_active = $4,
                payment_id = $5
            WHERE id = $1
            "#,
        )
        .bind(narrow_id(subscription.id.value())?)
        .bind(subscription.tier.as_str())
        .bind(subscription.expires_at.map(|t| t.as_naive_utc()))
        .bind(subscription.is_active)
        .bind(payment_id)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update subscription: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                "Subscription not found",
            ));
        }

        Ok(())
    }
}
