// kiln-market/src/services/mod.rs

//! Simulated third-party services used by checkout.

pub mod email_mock;
pub mod payment_mock;
