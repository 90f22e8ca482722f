//! Transfer model and its status state machine
//!
//! A transfer moves a patient's care record from a source hospital to a
//! target hospital. Its status only ever moves forward:
//!
//! ```text
//!            verify (digests match)
//!         +------------------------> verified
//!         |  verify (digests differ)
//! pending +------------------------> failed
//!         |  reject
//!         +------------------------> rejected
//!
//! accepted: declared for storage compatibility, no transition leads to it
//! ```

use crate::domain::ids::{AdminId, DepartmentId, HospitalId, PatientId, TransferId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transfer status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    /// Created at the source, awaiting verification
    #[default]
    Pending,
    /// Destination digest matched the source digest
    Verified,
    /// Reserved. No implemented transition reaches this state.
    Accepted,
    /// Operator rejected the transfer
    Rejected,
    /// Destination digest differed from the source digest
    Failed,
}

/// Every transition the lifecycle allows, as `(from, to)`
pub const TRANSITIONS: &[(TransferStatus, TransferStatus)] = &[
    (TransferStatus::Pending, TransferStatus::Verified),
    (TransferStatus::Pending, TransferStatus::Failed),
    (TransferStatus::Pending, TransferStatus::Rejected),
];

impl TransferStatus {
    /// All declared states, in storage order
    pub const ALL: [TransferStatus; 5] = [
        TransferStatus::Pending,
        TransferStatus::Verified,
        TransferStatus::Accepted,
        TransferStatus::Rejected,
        TransferStatus::Failed,
    ];

    /// Storage and display name
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Pending => "pending",
            TransferStatus::Verified => "verified",
            TransferStatus::Accepted => "accepted",
            TransferStatus::Rejected => "rejected",
            TransferStatus::Failed => "failed",
        }
    }

    /// True when the transition table allows `self -> next`
    pub fn can_transition_to(&self, next: TransferStatus) -> bool {
        TRANSITIONS.contains(&(*self, next))
    }

    /// True when no transition leaves this state
    pub fn is_terminal(&self) -> bool {
        !TRANSITIONS.iter().any(|(from, _)| from == self)
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransferStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransferStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown transfer status '{s}'"))
    }
}

/// Hex-encoded SHA-256 digest of a canonical payload
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checksum(String);

impl Checksum {
    /// Length of a hex-encoded SHA-256 digest
    pub const HEX_LEN: usize = 64;

    /// Wraps a hex digest, rejecting anything that is not 64 hex characters
    pub fn new(hex: impl Into<String>) -> Result<Self, String> {
        let hex = hex.into().to_ascii_lowercase();
        if hex.len() != Self::HEX_LEN || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!(
                "Checksum must be {} hex characters, got '{}'",
                Self::HEX_LEN,
                hex
            ));
        }
        Ok(Self(hex))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 characters, for log lines
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A transfer row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub transfer_id: TransferId,
    pub patient_id: PatientId,
    pub source_hospital: HospitalId,
    pub target_hospital: HospitalId,
    pub department_id: DepartmentId,
    pub initiated_by: AdminId,
    pub status: TransferStatus,
    /// Set once at creation, never overwritten
    pub checksum_original: Option<Checksum>,
    pub checksum_verified: Option<Checksum>,
    /// Anchor hashed into the payload on both sides
    pub transferred_at: DateTime<Utc>,
}

impl Transfer {
    /// True when both digests are present and equal
    pub fn checksums_match(&self) -> bool {
        match (&self.checksum_original, &self.checksum_verified) {
            (Some(original), Some(verified)) => original == verified,
            _ => false,
        }
    }
}

/// A transfer about to be inserted; the store assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransfer {
    pub patient_id: PatientId,
    pub source_hospital: HospitalId,
    pub target_hospital: HospitalId,
    pub department_id: DepartmentId,
    pub initiated_by: AdminId,
    pub checksum_original: Checksum,
    pub transferred_at: DateTime<Utc>,
}

impl NewTransfer {
    /// Materializes the row in `pending` with the store-assigned id
    pub fn into_transfer(self, transfer_id: TransferId) -> Transfer {
        Transfer {
            transfer_id,
            patient_id: self.patient_id,
            source_hospital: self.source_hospital,
            target_hospital: self.target_hospital,
            department_id: self.department_id,
            initiated_by: self.initiated_by,
            status: TransferStatus::Pending,
            checksum_original: Some(self.checksum_original),
            checksum_verified: None,
            transferred_at: self.transferred_at,
        }
    }
}

/// Business outcome of a lifecycle operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferOutcome {
    /// Digests matched; the target hospital was granted access
    Verified,
    /// Digests differed; the record drifted since initiation
    ChecksumMismatch,
    /// An operator rejected the transfer
    Rejected,
}

impl TransferOutcome {
    /// The status this outcome leaves the transfer in
    pub fn status(&self) -> TransferStatus {
        match self {
            TransferOutcome::Verified => TransferStatus::Verified,
            TransferOutcome::ChecksumMismatch => TransferStatus::Failed,
            TransferOutcome::Rejected => TransferStatus::Rejected,
        }
    }

    /// Message shown to the operator
    pub fn message(&self) -> &'static str {
        match self {
            TransferOutcome::Verified => "transfer verified: access granted to target hospital",
            TransferOutcome::ChecksumMismatch => {
                "transfer rejected: data integrity check failed"
            }
            TransferOutcome::Rejected => "transfer rejected by operator",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_transitions() {
        assert!(TransferStatus::Pending.can_transition_to(TransferStatus::Verified));
        assert!(TransferStatus::Pending.can_transition_to(TransferStatus::Failed));
        assert!(TransferStatus::Pending.can_transition_to(TransferStatus::Rejected));
        assert!(!TransferStatus::Pending.can_transition_to(TransferStatus::Accepted));
        assert!(!TransferStatus::Pending.can_transition_to(TransferStatus::Pending));
    }

    #[test]
    fn test_default_status_is_pending() {
        assert_eq!(TransferStatus::default(), TransferStatus::Pending);
    }

    #[test]
    fn test_nothing_returns_to_pending() {
        for status in TransferStatus::ALL {
            assert!(!status.can_transition_to(TransferStatus::Pending));
        }
    }

    #[test]
    fn test_accepted_is_unreachable() {
        for status in TransferStatus::ALL {
            assert!(!status.can_transition_to(TransferStatus::Accepted));
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(!TransferStatus::Pending.is_terminal());
        assert!(TransferStatus::Verified.is_terminal());
        assert!(TransferStatus::Failed.is_terminal());
        assert!(TransferStatus::Rejected.is_terminal());
        assert!(TransferStatus::Accepted.is_terminal());
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("failed".parse::<TransferStatus>().unwrap(), TransferStatus::Failed);
        assert!("FAILED".parse::<TransferStatus>().is_err());
    }

    #[test]
    fn test_status_serde_uses_storage_names() {
        let json = serde_json::to_string(&TransferStatus::Verified).unwrap();
        assert_eq!(json, "\"verified\"");
    }

    #[test]
    fn test_checksum_validation() {
        let hex = "a".repeat(64);
        let checksum = Checksum::new(hex.to_uppercase()).unwrap();
        assert_eq!(checksum.as_str(), hex);
        assert_eq!(checksum.short().len(), 12);

        assert!(Checksum::new("abc").is_err());
        assert!(Checksum::new("z".repeat(64)).is_err());
    }

    #[test]
    fn test_outcome_status_mapping() {
        assert_eq!(TransferOutcome::Verified.status(), TransferStatus::Verified);
        assert_eq!(TransferOutcome::ChecksumMismatch.status(), TransferStatus::Failed);
        assert_eq!(TransferOutcome::Rejected.status(), TransferStatus::Rejected);
        assert_eq!(
            TransferOutcome::ChecksumMismatch.message(),
            "transfer rejected: data integrity check failed"
        );
    }
}
