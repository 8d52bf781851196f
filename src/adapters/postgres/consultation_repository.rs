//! PostgreSQL implementation of ConsultationRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::consultation::Consultation;
use crate::domain::foundation::{
    ConsultationId, DomainError, ErrorCode, PaymentId, ServiceId, SpecialistId, UserId,
};
use crate::ports::ConsultationRepository;

use super::{int4_key, narrow_id, widen_id};

/// PostgreSQL implementation of the ConsultationRepository port.
pub struct PostgresConsultationRepository {
    pool: PgPool,
}

impl PostgresConsultationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a consultation.
///
/// The column really is spelled `is_successfull`.
#[derive(Debug, sqlx::FromRow)]
struct ConsultationRow {
    id: i32,
    user_id: i64,
    specialist_id: i32,
    service_id: i32,
    price: i32,
    payment_id: Option<i32>,
    is_paid: bool,
    is_used: bool,
    is_successfull: bool,
    is_verified_by_admin: bool,
    is_hidden: bool,
    name: Option<String>,
    email: Option<String>,
    tg_tag: Option<String>,
}

impl From<ConsultationRow> for Consultation {
    fn from(row: ConsultationRow) -> Self {
        Consultation {
            id: ConsultationId::new(widen_id(row.id)),
            user_id: UserId::new(row.user_id),
            specialist_id: SpecialistId::new(widen_id(row.specialist_id)),
            service_id: ServiceId::new(widen_id(row.service_id)),
            price: i64::from(row.price),
            payment_id: row.payment_id.map(|id| PaymentId::new(widen_id(id))),
            is_paid: row.is_paid,
            is_used: row.is_used,
            is_successful: row.is_successfull,
            is_verified_by_admin: row.is_verified_by_admin,
            is_hidden: row.is_hidden,
            name: row.name,
            email: row.email,
            tg_tag: row.tg_tag,
        }
    }
}

#[async_trait]
impl ConsultationRepository for PostgresConsultationRepository {
    async fn find_by_payment(&self, payment_id: &PaymentId) -> Result<Vec<Consultation>, DomainError> {
        let Some(db_payment_id) = int4_key(payment_id.value()) else {
            return Ok(Vec::new());
        };

        let rows: Vec<ConsultationRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, specialist_id, service_id, price, payment_id, is_paid,
                   is_used, is_successfull, is_verified_by_admin, is_hidden,
                   name, email, tg_tag
            FROM consultation
            WHERE payment_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(db_payment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find consultations: {}", e)))?;

        Ok(rows.into_iter().map(Consultation::from).collect())
    }

    async fn mark_paid(&self, id: &ConsultationId) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE consultation SET is_paid = TRUE WHERE id = $1")
            .bind(narrow_id(id.value())?)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to mark consultation paid: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ConsultationNotFound,
                "Consultation not found",
            )
            .with_detail("consultation_id", id.to_string()));
        }

        Ok(())
    }
}
