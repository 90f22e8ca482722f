//! Transfer payload construction
//!
//! The payload is the snapshot of a patient's record that gets hashed at
//! both ends of a transfer. It must come out identical for unchanged data,
//! so history is sorted explicitly and every value goes through the
//! canonical serializers.

use crate::adapters::database::traits::RecordSource;
use crate::core::verification::checksum::canonical;
use crate::domain::errors::CareLinkError;
use crate::domain::ids::{
    DepartmentId, DeviceId, DoctorId, HospitalId, PatientId, SessionId, TreatmentId,
};
use crate::domain::records::{Patient, TreatmentSession};
use crate::domain::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Everything hashed for one transfer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferPayload {
    pub patient: PatientBlock,
    pub treatment_history: Vec<HistoryEntry>,
    pub transfer_context: TransferContext,
}

/// Patient demographics as hashed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientBlock {
    pub patient_id: PatientId,
    pub name: String,
    pub email: String,
    #[serde(serialize_with = "canonical::opt_date")]
    pub dob: Option<NaiveDate>,
    pub current_hospital_id: HospitalId,
}

/// One treatment session as hashed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub session_id: SessionId,
    pub treatment_id: TreatmentId,
    pub hospital_id: HospitalId,
    pub device_id: Option<DeviceId>,
    pub doctor_id: Option<DoctorId>,
    pub doctor_minutes: Option<i32>,
    pub nurse_minutes: Option<i32>,
    #[serde(serialize_with = "canonical::opt_decimal")]
    pub device_cost: Option<Decimal>,
    #[serde(serialize_with = "canonical::opt_decimal")]
    pub device_price: Option<Decimal>,
    #[serde(serialize_with = "canonical::opt_decimal")]
    pub staff_cost: Option<Decimal>,
    #[serde(serialize_with = "canonical::opt_decimal")]
    pub total_price: Option<Decimal>,
    #[serde(serialize_with = "canonical::opt_decimal")]
    pub profit: Option<Decimal>,
    pub notes: Option<String>,
    #[serde(serialize_with = "canonical::timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Department and time anchor of the transfer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferContext {
    pub department_id: DepartmentId,
    /// Null until the caller anchors the payload
    #[serde(serialize_with = "canonical::opt_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl From<&Patient> for PatientBlock {
    fn from(patient: &Patient) -> Self {
        Self {
            patient_id: patient.patient_id.clone(),
            name: patient.name.clone(),
            email: patient.email.clone(),
            dob: patient.dob,
            current_hospital_id: patient.hospital_id.clone(),
        }
    }
}

impl From<TreatmentSession> for HistoryEntry {
    fn from(session: TreatmentSession) -> Self {
        Self {
            session_id: session.session_id,
            treatment_id: session.treatment_id,
            hospital_id: session.hospital_id,
            device_id: session.device_id,
            doctor_id: session.doctor_id,
            doctor_minutes: session.doctor_minutes,
            nurse_minutes: session.nurse_minutes,
            device_cost: session.device_cost,
            device_price: session.device_price,
            staff_cost: session.staff_cost,
            total_price: session.total_price,
            profit: session.profit,
            notes: session.notes,
            created_at: session.created_at,
        }
    }
}

impl TransferPayload {
    /// Assemble a payload from already loaded records
    ///
    /// History is ordered by `created_at`, then `session_id`.
    pub fn assemble(
        patient: &Patient,
        mut sessions: Vec<TreatmentSession>,
        department_id: DepartmentId,
    ) -> Self {
        sessions.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.session_id.cmp(&b.session_id))
        });

        Self {
            patient: PatientBlock::from(patient),
            treatment_history: sessions.into_iter().map(HistoryEntry::from).collect(),
            transfer_context: TransferContext {
                department_id,
                timestamp: None,
            },
        }
    }

    /// Fill the time anchor with the transfer's `transferred_at`
    pub fn anchored(mut self, at: DateTime<Utc>) -> Self {
        self.transfer_context.timestamp = Some(at);
        self
    }
}

/// Build the unanchored payload for a patient from the store
///
/// # Errors
///
/// Returns `CareLinkError::Validation` if the patient does not exist.
pub async fn build<S: RecordSource + ?Sized>(
    source: &S,
    patient_id: &PatientId,
    department_id: DepartmentId,
) -> Result<TransferPayload> {
    let patient = source
        .patient(patient_id)
        .await?
        .ok_or_else(|| CareLinkError::Validation(format!("Patient not found: {patient_id}")))?;
    let sessions = source.treatment_sessions(patient_id).await?;

    tracing::debug!(
        patient_id = %patient_id,
        sessions = sessions.len(),
        department_id = %department_id,
        "Built transfer payload"
    );

    Ok(TransferPayload::assemble(&patient, sessions, department_id))
}
