//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `PaymentLedger` - Payment lookup and compare-and-set settlement
//! - `SubscriptionRepository` - One subscription per user
//! - `ConsultationRepository` - Bookings linked to a payment
//!
//! ## Outbound Ports
//!
//! - `Notifier` - Chat messages to operators and users
//! - `MaterialDelivery` - External material-delivery service

mod consultation_repository;
mod delivery;
mod material_delivery;
mod notifier;
mod payment_ledger;
mod subscription_repository;

pub use consultation_repository::ConsultationRepository;
pub use delivery::{DeliveryFailure, DeliveryOutcome};
pub use material_delivery::{MaterialDelivery, MaterialDeliveryRequest};
pub use notifier::{Destination, Notifier};
pub use payment_ledger::{PaymentLedger, SettleResult};
pub use subscription_repository::SubscriptionRepository;
