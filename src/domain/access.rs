//! Access grants created by successful transfer verification

use crate::domain::ids::{GrantId, HospitalId, PatientId, TransferId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authorization for a hospital to view a patient's record
///
/// Never mutated by the core. Deactivation belongs to the CRUD side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessGrant {
    pub grant_id: GrantId,
    pub patient_id: PatientId,
    pub hospital_id: HospitalId,
    pub reason: String,
    pub transfer_id: Option<TransferId>,
    pub granted_at: DateTime<Utc>,
    pub is_active: bool,
}

/// A grant about to be inserted alongside a verification
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccessGrant {
    pub patient_id: PatientId,
    pub hospital_id: HospitalId,
    pub reason: String,
    pub transfer_id: TransferId,
    pub granted_at: DateTime<Utc>,
}

impl NewAccessGrant {
    pub fn into_grant(self, grant_id: GrantId) -> AccessGrant {
        AccessGrant {
            grant_id,
            patient_id: self.patient_id,
            hospital_id: self.hospital_id,
            reason: self.reason,
            transfer_id: Some(self.transfer_id),
            granted_at: self.granted_at,
            is_active: true,
        }
    }
}
