//! Row mapping for the PostgreSQL store
//!
//! Column values are converted into domain types here; a value that fails
//! domain validation surfaces as `PersistenceError::CorruptRow`.

use crate::domain::access::AccessGrant;
use crate::domain::connection::{HospitalConnection, LinkMetrics};
use crate::domain::errors::PersistenceError;
use crate::domain::ids::{
    AdminId, ConnectionId, DepartmentId, DeviceId, DoctorId, GrantId, HospitalId, PatientId,
    SessionId, TransferId, TreatmentId,
};
use crate::domain::records::{Department, Hospital, Patient, TreatmentSession};
use crate::domain::transfer::{Checksum, Transfer, TransferStatus};
use crate::domain::Result;
use tokio_postgres::types::FromSql;
use tokio_postgres::Row;
use uuid::Uuid;

fn get<'a, T: FromSql<'a>>(row: &'a Row, column: &str) -> Result<T> {
    row.try_get(column)
        .map_err(|e| PersistenceError::CorruptRow(format!("column {column}: {e}")).into())
}

fn corrupt(column: &str, message: String) -> PersistenceError {
    PersistenceError::CorruptRow(format!("column {column}: {message}"))
}

fn hospital_id(row: &Row, column: &str) -> Result<HospitalId> {
    Ok(HospitalId::new(get::<String>(row, column)?).map_err(|e| corrupt(column, e))?)
}

fn patient_id(row: &Row, column: &str) -> Result<PatientId> {
    let uuid: Uuid = get(row, column)?;
    Ok(PatientId::new(uuid.to_string()).map_err(|e| corrupt(column, e))?)
}

fn checksum(row: &Row, column: &str) -> Result<Option<Checksum>> {
    get::<Option<String>>(row, column)?
        .map(|hex| Checksum::new(hex.trim()).map_err(|e| corrupt(column, e).into()))
        .transpose()
}

/// Converts a patient id into the UUID column type
pub fn patient_uuid(patient_id: &PatientId) -> Result<Uuid> {
    Uuid::parse_str(patient_id.as_str())
        .map_err(|e| PersistenceError::QueryFailed(format!("patient id {patient_id}: {e}")).into())
}

pub fn hospital_from_row(row: &Row) -> Result<Hospital> {
    Ok(Hospital {
        hospital_id: hospital_id(row, "hospital_id")?,
        name: get(row, "name")?,
        location: get(row, "location")?,
    })
}

pub fn department_from_row(row: &Row) -> Result<Department> {
    Ok(Department {
        department_id: DepartmentId::new(get(row, "department_id")?),
        name: get(row, "name")?,
    })
}

pub fn patient_from_row(row: &Row) -> Result<Patient> {
    Ok(Patient {
        patient_id: patient_id(row, "patient_id")?,
        hospital_id: hospital_id(row, "hospital_id")?,
        name: get(row, "name")?,
        email: get(row, "email")?,
        dob: get(row, "dob")?,
    })
}

pub fn session_from_row(row: &Row) -> Result<TreatmentSession> {
    Ok(TreatmentSession {
        session_id: SessionId::new(get::<String>(row, "session_id")?)
            .map_err(|e| corrupt("session_id", e))?,
        patient_id: patient_id(row, "patient_id")?,
        hospital_id: hospital_id(row, "hospital_id")?,
        treatment_id: TreatmentId::new(get(row, "treatment_id")?),
        device_id: get::<Option<i64>>(row, "device_id")?.map(DeviceId::new),
        doctor_id: get::<Option<String>>(row, "doctor_id")?.map(DoctorId),
        doctor_minutes: get(row, "doctor_minutes")?,
        nurse_minutes: get(row, "nurse_minutes")?,
        device_cost: get(row, "device_cost")?,
        device_price: get(row, "device_price")?,
        staff_cost: get(row, "staff_cost")?,
        total_price: get(row, "total_price")?,
        profit: get(row, "profit")?,
        notes: get(row, "notes")?,
        created_at: get(row, "created_at")?,
    })
}

pub fn transfer_from_row(row: &Row) -> Result<Transfer> {
    let status: String = get(row, "status")?;
    Ok(Transfer {
        transfer_id: TransferId::new(get(row, "transfer_id")?),
        patient_id: patient_id(row, "patient_id")?,
        source_hospital: hospital_id(row, "source_hospital")?,
        target_hospital: hospital_id(row, "target_hospital")?,
        department_id: DepartmentId::new(get(row, "department_id")?),
        initiated_by: AdminId::new(get(row, "initiated_by")?),
        status: status
            .parse::<TransferStatus>()
            .map_err(|e| corrupt("status", e))?,
        checksum_original: checksum(row, "checksum_original")?,
        checksum_verified: checksum(row, "checksum_verified")?,
        transferred_at: get(row, "transferred_at")?,
    })
}

pub fn connection_from_row(row: &Row) -> Result<HospitalConnection> {
    let metrics = LinkMetrics {
        cost: get(row, "cost")?,
        latency: get(row, "latency")?,
        reliability: get(row, "reliability")?,
    };
    metrics
        .validate()
        .map_err(|e| corrupt("metrics", e.to_string()))?;

    Ok(HospitalConnection {
        connection_id: ConnectionId::new(get(row, "connection_id")?),
        from: hospital_id(row, "hospital_from")?,
        to: hospital_id(row, "hospital_to")?,
        metrics,
        created_at: get(row, "created_at")?,
    })
}

pub fn grant_from_row(row: &Row) -> Result<AccessGrant> {
    Ok(AccessGrant {
        grant_id: GrantId::new(get(row, "grant_id")?),
        patient_id: patient_id(row, "patient_id")?,
        hospital_id: hospital_id(row, "hospital_id")?,
        reason: get(row, "reason")?,
        transfer_id: get::<Option<i64>>(row, "transfer_id")?.map(TransferId::new),
        granted_at: get(row, "granted_at")?,
        is_active: get(row, "is_active")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_uuid_round_trips_canonical_form() {
        let id = PatientId::generate();
        let uuid = patient_uuid(&id).unwrap();
        assert_eq!(uuid.to_string(), id.as_str());
    }

    #[test]
    fn test_corrupt_names_column() {
        let err = corrupt("status", "Unknown transfer status 'lost'".to_string());
        assert!(err.to_string().contains("column status"));
    }
}
