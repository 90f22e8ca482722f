//! Payload hashing for transfer verification
//!
//! The same payload is built and hashed at initiation and again at
//! verification; equal digests prove the record did not drift.

pub mod checksum;
pub mod payload;
pub mod report;

pub use checksum::calculate_checksum;
pub use payload::{build, TransferPayload};
pub use report::VerificationReport;
