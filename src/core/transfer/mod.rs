//! Transfer lifecycle
//!
//! See [`crate::domain::transfer`] for the status state machine.

pub mod manager;

pub use manager::{grant_reason, TransferManager, VerificationResult};
