//! Reference records read by the core
//!
//! Hospitals, departments, patients and treatment sessions are owned and
//! mutated by the CRUD side of the application. The core only ever reads
//! them, so these types carry no behaviour beyond construction helpers.

use crate::domain::ids::{
    DepartmentId, DeviceId, DoctorId, HospitalId, PatientId, SessionId, TreatmentId,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A facility in the network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub hospital_id: HospitalId,
    pub name: String,
    pub location: String,
}

/// A department catalog entry; hospitals offer departments from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub department_id: DepartmentId,
    pub name: String,
}

/// Patient demographics as stored by the CRUD side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: PatientId,
    /// Hospital the patient is currently registered at
    pub hospital_id: HospitalId,
    pub name: String,
    pub email: String,
    pub dob: Option<NaiveDate>,
}

/// One treatment session in a patient's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentSession {
    pub session_id: SessionId,
    pub patient_id: PatientId,
    pub hospital_id: HospitalId,
    pub treatment_id: TreatmentId,
    #[serde(default)]
    pub device_id: Option<DeviceId>,
    #[serde(default)]
    pub doctor_id: Option<DoctorId>,
    #[serde(default)]
    pub doctor_minutes: Option<i32>,
    #[serde(default)]
    pub nurse_minutes: Option<i32>,
    #[serde(default)]
    pub device_cost: Option<Decimal>,
    #[serde(default)]
    pub device_price: Option<Decimal>,
    #[serde(default)]
    pub staff_cost: Option<Decimal>,
    #[serde(default)]
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub profit: Option<Decimal>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TreatmentSession {
    /// Creates a session with only the mandatory fields set
    pub fn new(
        session_id: SessionId,
        patient_id: PatientId,
        hospital_id: HospitalId,
        treatment_id: TreatmentId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            patient_id,
            hospital_id,
            treatment_id,
            device_id: None,
            doctor_id: None,
            doctor_minutes: None,
            nurse_minutes: None,
            device_cost: None,
            device_price: None,
            staff_cost: None,
            total_price: None,
            profit: None,
            notes: None,
            created_at,
        }
    }

    /// Sets the free-text notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
