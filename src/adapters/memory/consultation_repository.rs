//! In-memory consultation repository for testing.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::consultation::Consultation;
use crate::domain::foundation::{ConsultationId, DomainError, ErrorCode, PaymentId};
use crate::ports::ConsultationRepository;

/// Consultations in insertion order.
///
/// # Panics
///
/// Methods panic if the internal lock is poisoned.
pub struct InMemoryConsultationRepository {
    consultations: RwLock<Vec<Consultation>>,
}

impl InMemoryConsultationRepository {
    pub fn new() -> Self {
        Self::with_consultations(Vec::new())
    }

    pub fn with_consultations(consultations: Vec<Consultation>) -> Self {
        Self {
            consultations: RwLock::new(consultations),
        }
    }

    // === Test Helpers ===

    pub fn all(&self) -> Vec<Consultation> {
        self.consultations
            .read()
            .expect("InMemoryConsultationRepository: lock poisoned")
            .clone()
    }
}

impl Default for InMemoryConsultationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConsultationRepository for InMemoryConsultationRepository {
    async fn find_by_payment(
        &self,
        payment_id: &PaymentId,
    ) -> Result<Vec<Consultation>, DomainError> {
        let mut linked: Vec<_> = self
            .all()
            .into_iter()
            .filter(|c| c.payment_id.as_ref() == Some(payment_id))
            .collect();
        linked.sort_by_key(|c| c.id);
        Ok(linked)
    }

    async fn mark_paid(&self, id: &ConsultationId) -> Result<(), DomainError> {
        let mut consultations = self
            .consultations
            .write()
            .expect("InMemoryConsultationRepository: lock poisoned");

        let consultation = consultations
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::ConsultationNotFound,
                    format!("Consultation {} not found", id),
                )
            })?;
        consultation.is_paid = true;
        Ok(())
    }
}
