//! ConfirmConsultationHandler - marks a booked batch paid and notifies the
//! operator channel and the user.

use std::sync::Arc;

use crate::domain::consultation::{operator_message, user_message, ConsultationSummary};
use crate::domain::fulfillment::FulfillmentReport;
use crate::domain::payment::{CallbackError, Payment};
use crate::ports::{
    ConsultationRepository, DeliveryFailure, DeliveryOutcome, Destination, Notifier,
};

/// Handler for consultation payments.
pub struct ConfirmConsultationHandler {
    consultations: Arc<dyn ConsultationRepository>,
    notifier: Arc<dyn Notifier>,
    /// Operator channel; `None` when not configured.
    operator_chat: Option<Destination>,
}

impl ConfirmConsultationHandler {
    pub fn new(
        consultations: Arc<dyn ConsultationRepository>,
        notifier: Arc<dyn Notifier>,
        operator_chat: Option<Destination>,
    ) -> Self {
        Self {
            consultations,
            notifier,
            operator_chat,
        }
    }

    /// Flips every linked consultation to paid, then sends both
    /// notifications concurrently.
    ///
    /// # Errors
    ///
    /// - `Database` if loading or flipping a row fails. Rows flipped before
    ///   the failure stay flipped.
    pub async fn handle(&self, payment: &Payment) -> Result<FulfillmentReport, CallbackError> {
        let linked = self.consultations.find_by_payment(&payment.id).await?;

        if linked.is_empty() {
            tracing::info!(payment_id = %payment.id, "No consultations linked to payment");
            return Ok(FulfillmentReport::NoConsultations);
        }

        let mut summaries: Vec<ConsultationSummary> = Vec::with_capacity(linked.len());
        for mut consultation in linked {
            if consultation.mark_paid() {
                self.consultations.mark_paid(&consultation.id).await?;
            }
            summaries.push(consultation.summary());
        }

        let operator_text = operator_message(payment.id, payment.user_id, &summaries);
        let user_text = user_message(summaries.len());
        let user_chat = Destination::user(payment.user_id);

        let operator_send = async {
            match &self.operator_chat {
                Some(chat) => self.notifier.send(chat, &operator_text).await,
                None => DeliveryOutcome::Failed(DeliveryFailure::NotConfigured("operator chat")),
            }
        };
        let user_send = self.notifier.send(&user_chat, &user_text);

        let (operator_outcome, user_outcome) = futures::join!(operator_send, user_send);

        for (audience, outcome) in [("operator", &operator_outcome), ("user", &user_outcome)] {
            if let Some(failure) = outcome.failure() {
                tracing::warn!(
                    payment_id = %payment.id,
                    audience,
                    error = %failure,
                    "Consultation notification failed"
                );
            }
        }

        tracing::info!(
            payment_id = %payment.id,
            user_id = %payment.user_id,
            count = summaries.len(),
            "Consultations confirmed"
        );

        Ok(FulfillmentReport::ConsultationsConfirmed {
            count: summaries.len(),
            operator_notified: operator_outcome.is_delivered(),
            user_notified: user_outcome.is_delivered(),
        })
    }
}
