//! PostgreSQL implementation of PaymentLedger.
//!
//! Settlement is a single conditional UPDATE, so concurrent callbacks for
//! the same invoice race inside the database and exactly one wins.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::PgPool;

use crate::domain::foundation::{
    DomainError, ErrorCode, MaterialId, PaymentId, Timestamp, UserId,
};
use crate::domain::payment::{Payment, PaymentType};
use crate::domain::subscription::SubscriptionTier;
use crate::ports::{PaymentLedger, SettleResult};

use super::{int4_key, widen_id};

/// PostgreSQL implementation of the PaymentLedger port.
pub struct PostgresPaymentLedger {
    pool: PgPool,
}

impl PostgresPaymentLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a payment.
#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: i32,
    user_id: i64,
    price: i32,
    subscription_type: Option<String>,
    payment_type: Option<String>,
    is_paid: bool,
    paid_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    parent_payment_id: Option<i32>,
    material_ids: Option<serde_json::Value>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let subscription_type = row
            .subscription_type
            .as_deref()
            .map(parse_tier)
            .transpose()?;

        // NULL type predates the column default
        let payment_type = row
            .payment_type
            .as_deref()
            .map(parse_payment_type)
            .transpose()?
            .unwrap_or_default();

        Ok(Payment {
            id: PaymentId::new(widen_id(row.id)),
            user_id: UserId::new(row.user_id),
            price: i64::from(row.price),
            subscription_type,
            payment_type,
            is_paid: row.is_paid,
            paid_at: row.paid_at.map(Timestamp::from_naive_utc),
            created_at: Timestamp::from_naive_utc(row.created_at),
            parent_payment_id: row.parent_payment_id.map(|id| PaymentId::new(widen_id(id))),
            material_ids: parse_material_ids(row.material_ids)?,
        })
    }
}

fn parse_tier(s: &str) -> Result<SubscriptionTier, DomainError> {
    s.parse().map_err(|_| {
        DomainError::new(
            ErrorCode::InvalidStoredValue,
            format!("Invalid subscription_type value: {}", s),
        )
    })
}

fn parse_payment_type(s: &str) -> Result<PaymentType, DomainError> {
    s.parse().map_err(|_| {
        DomainError::new(
            ErrorCode::InvalidStoredValue,
            format!("Invalid payment_type value: {}", s),
        )
    })
}

/// Reads the JSON `material_ids` column.
///
/// Accepts an array of integers or numeric strings; NULL and JSON null
/// both mean no materials.
fn parse_material_ids(value: Option<serde_json::Value>) -> Result<Vec<MaterialId>, DomainError> {
    let invalid = |v: &serde_json::Value| {
        DomainError::new(
            ErrorCode::InvalidStoredValue,
            format!("Invalid material_ids value: {}", v),
        )
    };

    let items = match value {
        None | Some(serde_json::Value::Null) => return Ok(Vec::new()),
        Some(serde_json::Value::Array(items)) => items,
        Some(other) => return Err(invalid(&other)),
    };

    items
        .iter()
        .map(|item| match item {
            serde_json::Value::Number(n) => n.as_i64().map(MaterialId::new).ok_or_else(|| invalid(item)),
            serde_json::Value::String(s) => s.parse::<MaterialId>().map_err(|_| invalid(item)),
            _ => Err(invalid(item)),
        })
        .collect()
}

const SELECT_PAYMENT: &str = r#"
    SELECT id, user_id, price, subscription_type, payment_type, is_paid,
           paid_at, created_at, parent_payment_id, material_ids
    FROM payments
    WHERE id = $1
"#;

#[async_trait]
impl PaymentLedger for PostgresPaymentLedger {
    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        let Some(db_id) = int4_key(id.value()) else {
            return Ok(None);
        };

        let row: Option<PaymentRow> = sqlx::query_as(SELECT_PAYMENT)
            .bind(db_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to find payment: {}", e)))?;

        row.map(Payment::try_from).transpose()
    }

    async fn mark_settled(&self, id: &PaymentId, at: Timestamp) -> Result<SettleResult, DomainError> {
        let Some(db_id) = int4_key(id.value()) else {
            return Ok(SettleResult::NotFound);
        };

        let result = sqlx::query(
            r#"
            UPDATE payments
            SET is_paid = TRUE, paid_at = $2
            WHERE id = $1 AND is_paid = FALSE
            "#,
        )
        .bind(db_id)
        .bind(at.as_naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to settle payment: {}", e)))?;

        if result.rows_affected() == 1 {
            return Ok(SettleResult::Settled);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM payments WHERE id = $1)")
            .bind(db_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to check payment: {}", e)))?;

        Ok(if exists {
            SettleResult::AlreadySettled
        } else {
            SettleResult::NotFound
        })
    }
}
