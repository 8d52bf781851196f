//! Consultation entity.
//!
//! A booked specialist session. Several consultations may share one
//! payment when the user books a batch.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConsultationId, PaymentId, ServiceId, SpecialistId, UserId};

/// One booked session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consultation {
    pub id: ConsultationId,
    pub user_id: UserId,
    pub specialist_id: SpecialistId,
    pub service_id: ServiceId,
    pub price: i64,
    pub payment_id: Option<PaymentId>,
    pub is_paid: bool,
    pub is_used: bool,
    pub is_successful: bool,
    pub is_verified_by_admin: bool,
    pub is_hidden: bool,

    // Contact details left at booking time
    pub name: Option<String>,
    pub email: Option<String>,
    pub tg_tag: Option<String>,
}

impl Consultation {
    /// Flips the paid flag. Returns false if it was already set.
    pub fn mark_paid(&mut self) -> bool {
        if self.is_paid {
            return false;
        }
        self.is_paid = true;
        true
    }

    /// Snapshot used in notifications.
    pub fn summary(&self) -> ConsultationSummary {
        ConsultationSummary {
            id: self.id,
            price: self.price,
            name: self.name.clone(),
            email: self.email.clone(),
            tg_tag: self.tg_tag.clone(),
            specialist_id: self.specialist_id,
            service_id: self.service_id,
        }
    }
}

/// What the operator needs to arrange a paid consultation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsultationSummary {
    pub id: ConsultationId,
    pub price: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub tg_tag: Option<String>,
    pub specialist_id: SpecialistId,
    pub service_id: ServiceId,
}


#[cfg(test)]
mod tests {
    use super::test_support::booked;

    #[test]
    fn mark_paid_flips_once() {
        let mut consultation = booked(1, Some(10));

        assert!(consultation.mark_paid());
        assert!(consultation.is_paid);
        assert!(!consultation.mark_paid());
    }

    #[test]
    fn summary_copies_contact_fields() {
        let consultation = booked(4, Some(10));
        let summary = consultation.summary();

        assert_eq!(summary.id, consultation.id);
        assert_eq!(summary.price, 1500);
        assert_eq!(summary.tg_tag.as_deref(), Some("anna_k"));
        assert_eq!(summary.specialist_id, consultation.specialist_id);
    }
}
