//! Payment Callback - Robokassa result-callback processing
//!
//! Verifies signed payment callbacks, settles the payment exactly once, and
//! dispatches the settled payment to subscription activation, material
//! delivery, or consultation confirmation.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
