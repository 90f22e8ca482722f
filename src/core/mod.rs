//! Core business logic for CareLink
//!
//! - [`transfer`] - transfer lifecycle (initiate, verify, reject)
//! - [`verification`] - canonical payloads and checksums
//! - [`network`] - hospital links and destination ranking

pub mod network;
pub mod transfer;
pub mod verification;
