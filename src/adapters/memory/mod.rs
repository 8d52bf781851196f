//! In-process adapters used by unit and integration tests.
//!
//! - `InMemoryPaymentLedger` - map-backed ledger with compare-and-set settlement
//! - `InMemorySubscriptionRepository` - one subscription per user
//! - `InMemoryConsultationRepository` - bookings in insertion order
//! - `RecordingNotifier` / `RecordingMaterialDelivery` - capture outbound calls

mod consultation_repository;
mod payment_ledger;
mod recording;
mod subscription_repository;

pub use consultation_repository::InMemoryConsultationRepository;
pub use payment_ledger::InMemoryPaymentLedger;
pub use recording::{RecordingMaterialDelivery, RecordingNotifier, SentMessage};
pub use subscription_repository::InMemorySubscriptionRepository;
