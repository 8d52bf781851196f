//! Consultation repository port.

use async_trait::async_trait;

use crate::domain::consultation::Consultation;
use crate::domain::foundation::{ConsultationId, DomainError, PaymentId};

/// Repository port for consultation bookings.
#[async_trait]
pub trait ConsultationRepository: Send + Sync {
    /// All consultations linked to a payment, ordered by id.
    async fn find_by_payment(&self, payment_id: &PaymentId)
        -> Result<Vec<Consultation>, DomainError>;

    /// Set `is_paid = true` on one row.
    ///
    /// # Errors
    ///
    /// - `ConsultationNotFound` if the row doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn mark_paid(&self, id: &ConsultationId) -> Result<(), DomainError>;
}
