//! JSON fixtures for the in-process store
//!
//! A fixture seeds the reference data the CRUD side would normally own,
//! plus any pre-existing connection rows.

use crate::domain::connection::{LinkMetrics, NewConnection};
use crate::domain::errors::{CareLinkError, GraphError};
use crate::domain::ids::{DepartmentId, HospitalId};
use crate::domain::records::{Department, Hospital, Patient, TreatmentSession};
use crate::domain::Result;
use serde::Deserialize;
use std::path::Path;

/// Reference data loaded into a [`MemoryStore`](super::MemoryStore)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemoryFixture {
    #[serde(default)]
    pub hospitals: Vec<Hospital>,
    #[serde(default)]
    pub departments: Vec<Department>,
    #[serde(default)]
    pub offerings: Vec<DepartmentOffering>,
    #[serde(default)]
    pub patients: Vec<Patient>,
    #[serde(default)]
    pub treatment_sessions: Vec<TreatmentSession>,
    #[serde(default)]
    pub connections: Vec<FixtureConnection>,
}

/// A hospital offering a catalog department
#[derive(Debug, Clone, Deserialize)]
pub struct DepartmentOffering {
    pub hospital_id: HospitalId,
    pub department_id: DepartmentId,
}

/// One directed connection row as written in a fixture
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureConnection {
    pub from: HospitalId,
    pub to: HospitalId,
    pub cost: f64,
    pub latency: f64,
    pub reliability: f64,
}

impl FixtureConnection {
    pub fn into_new_connection(self) -> std::result::Result<NewConnection, GraphError> {
        Ok(NewConnection {
            metrics: LinkMetrics::new(self.cost, self.latency, self.reliability)?,
            from: self.from,
            to: self.to,
        })
    }
}

impl MemoryFixture {
    /// Parse a fixture from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CareLinkError::Configuration(format!("Invalid fixture: {e}")))
    }
}

/// Load a fixture file
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid fixture.
pub fn load_fixture<P: AsRef<Path>>(path: P) -> Result<MemoryFixture> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        CareLinkError::Configuration(format!(
            "Failed to read fixture {}: {}",
            path.display(),
            e
        ))
    })?;
    MemoryFixture::from_json(&content)
}
