//! Verification report structures
//!
//! A report records what one `verify` call compared and what it decided.

use crate::domain::ids::{HospitalId, PatientId, TransferId};
use crate::domain::transfer::{Checksum, TransferOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of re-hashing a transfer payload at the destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub transfer_id: TransferId,
    pub patient_id: PatientId,
    pub target_hospital: HospitalId,

    /// When the verification was performed
    pub verified_at: DateTime<Utc>,

    /// Digest stored at initiation
    pub checksum_original: Checksum,

    /// Digest recomputed now
    pub checksum_verified: Checksum,

    /// Number of treatment sessions hashed at verification time
    pub sessions_hashed: usize,

    pub outcome: TransferOutcome,

    /// Duration of verification in milliseconds
    pub duration_ms: u64,
}

impl VerificationReport {
    /// Check if the digests matched
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    /// Set the duration of verification
    pub fn set_duration(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }

    /// Format the report as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str(&format!(
            "📊 Verification Report for transfer {}\n",
            self.transfer_id
        ));
        summary.push_str(&format!("  Verified at: {}\n", self.verified_at));
        summary.push_str(&format!("  Duration: {} ms\n", self.duration_ms));
        summary.push_str(&format!("  Patient: {}\n", self.patient_id));
        summary.push_str(&format!("  Target hospital: {}\n", self.target_hospital));
        summary.push_str(&format!("  Sessions hashed: {}\n", self.sessions_hashed));
        summary.push_str(&format!("  Original checksum: {}\n", self.checksum_original));
        summary.push_str(&format!("  Verified checksum: {}\n", self.checksum_verified));

        if self.is_success() {
            summary.push_str(&format!("  ✅ {}\n", self.outcome.message()));
        } else {
            summary.push_str(&format!("  ❌ {}\n", self.outcome.message()));
        }

        summary
    }
}
