//! In-process store
//!
//! Keeps every table in one lock-guarded state value. Each trait method
//! takes the lock once, validates, then applies all of its writes, which
//! gives the same all-or-nothing behaviour as a SQL transaction.

use crate::adapters::database::traits::{CareStore, RecordSource};
use crate::adapters::memory::fixture::MemoryFixture;
use crate::domain::access::{AccessGrant, NewAccessGrant};
use crate::domain::connection::{ConnectionPair, HospitalConnection, NewConnection};
use crate::domain::errors::{CareLinkError, GraphError, PersistenceError};
use crate::domain::ids::{
    ConnectionId, DepartmentId, GrantId, HospitalId, PatientId, SessionId, TransferId,
};
use crate::domain::records::{Department, Hospital, Patient, TreatmentSession};
use crate::domain::transfer::{NewTransfer, Transfer, TransferStatus};
use crate::domain::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MemoryState {
    hospitals: Vec<Hospital>,
    departments: BTreeMap<DepartmentId, Department>,
    offerings: Vec<(HospitalId, DepartmentId)>,
    patients: HashMap<PatientId, Patient>,
    sessions: Vec<TreatmentSession>,
    transfers: BTreeMap<TransferId, Transfer>,
    grants: BTreeMap<GrantId, AccessGrant>,
    connections: BTreeMap<ConnectionId, HospitalConnection>,
    last_transfer_id: i64,
    last_grant_id: i64,
    last_connection_id: i64,
}

impl MemoryState {
    fn next_transfer_id(&mut self) -> TransferId {
        self.last_transfer_id += 1;
        TransferId::new(self.last_transfer_id)
    }

    fn next_grant_id(&mut self) -> GrantId {
        self.last_grant_id += 1;
        GrantId::new(self.last_grant_id)
    }

    fn next_connection_id(&mut self) -> ConnectionId {
        self.last_connection_id += 1;
        ConnectionId::new(self.last_connection_id)
    }

    fn has_connection(&self, from: &HospitalId, to: &HospitalId) -> bool {
        self.connections
            .values()
            .any(|c| &c.from == from && &c.to == to)
    }

    fn push_connection(&mut self, connection: NewConnection) -> HospitalConnection {
        let row = HospitalConnection {
            connection_id: self.next_connection_id(),
            from: connection.from,
            to: connection.to,
            metrics: connection.metrics,
            created_at: Utc::now(),
        };
        self.connections.insert(row.connection_id, row.clone());
        row
    }
}

/// In-process implementation of [`CareStore`]
///
/// Also exposes the reference-data writes the CRUD side would normally
/// perform, so tests and fixture-driven runs can set up and mutate records.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated from a fixture
    ///
    /// Fixture connections are inserted as directed rows exactly as listed.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the fixture references unknown
    /// hospitals or departments, or lists the same ordered pair twice.
    pub fn from_fixture(fixture: MemoryFixture) -> Result<Self> {
        let mut state = MemoryState {
            hospitals: fixture.hospitals,
            ..Default::default()
        };

        for department in fixture.departments {
            state.departments.insert(department.department_id, department);
        }

        for offering in fixture.offerings {
            if !state
                .hospitals
                .iter()
                .any(|h| h.hospital_id == offering.hospital_id)
            {
                return Err(CareLinkError::Validation(format!(
                    "Fixture offering references unknown hospital {}",
                    offering.hospital_id
                )));
            }
            if !state.departments.contains_key(&offering.department_id) {
                return Err(CareLinkError::Validation(format!(
                    "Fixture offering references unknown department {}",
                    offering.department_id
                )));
            }
            state
                .offerings
                .push((offering.hospital_id, offering.department_id));
        }

        for patient in fixture.patients {
            state.patients.insert(patient.patient_id.clone(), patient);
        }
        state.sessions = fixture.treatment_sessions;

        for link in fixture.connections {
            let connection = link.into_new_connection()?;
            if connection.from == connection.to {
                return Err(GraphError::SelfConnection(connection.from).into());
            }
            if state.has_connection(&connection.from, &connection.to) {
                return Err(GraphError::DuplicateConnection {
                    from: connection.from,
                    to: connection.to,
                }
                .into());
            }
            state.push_connection(connection);
        }

        Ok(Self {
            state: RwLock::new(state),
        })
    }

    /// Register a hospital
    pub async fn add_hospital(&self, hospital: Hospital) {
        let mut state = self.state.write().await;
        state.hospitals.retain(|h| h.hospital_id != hospital.hospital_id);
        state.hospitals.push(hospital);
    }

    /// Register a department catalog entry
    pub async fn add_department(&self, department: Department) {
        let mut state = self.state.write().await;
        state.departments.insert(department.department_id, department);
    }

    /// Record that a hospital offers a department
    pub async fn offer_department(&self, hospital_id: HospitalId, department_id: DepartmentId) {
        let mut state = self.state.write().await;
        let offering = (hospital_id, department_id);
        if !state.offerings.contains(&offering) {
            state.offerings.push(offering);
        }
    }

    /// Insert or replace a patient
    pub async fn upsert_patient(&self, patient: Patient) {
        let mut state = self.state.write().await;
        state.patients.insert(patient.patient_id.clone(), patient);
    }

    /// Insert or replace a treatment session, keyed by session id
    pub async fn upsert_treatment_session(&self, session: TreatmentSession) {
        let mut state = self.state.write().await;
        match state
            .sessions
            .iter_mut()
            .find(|s| s.session_id == session.session_id)
        {
            Some(existing) => *existing = session,
            None => state.sessions.push(session),
        }
    }

    /// Remove a treatment session
    pub async fn remove_treatment_session(&self, session_id: &SessionId) -> bool {
        let mut state = self.state.write().await;
        let before = state.sessions.len();
        state.sessions.retain(|s| &s.session_id != session_id);
        state.sessions.len() != before
    }
}

#[async_trait]
impl RecordSource for MemoryStore {
    async fn patient(&self, patient_id: &PatientId) -> Result<Option<Patient>> {
        Ok(self.state.read().await.patients.get(patient_id).cloned())
    }

    async fn treatment_sessions(&self, patient_id: &PatientId) -> Result<Vec<TreatmentSession>> {
        let state = self.state.read().await;
        Ok(state
            .sessions
            .iter()
            .filter(|s| &s.patient_id == patient_id)
            .cloned()
            .collect())
    }

    async fn hospital(&self, hospital_id: &HospitalId) -> Result<Option<Hospital>> {
        let state = self.state.read().await;
        Ok(state
            .hospitals
            .iter()
            .find(|h| &h.hospital_id == hospital_id)
            .cloned())
    }

    async fn department(&self, department_id: DepartmentId) -> Result<Option<Department>> {
        Ok(self
            .state
            .read()
            .await
            .departments
            .get(&department_id)
            .cloned())
    }

    async fn hospitals_with_department(
        &self,
        department_id: DepartmentId,
    ) -> Result<Vec<Hospital>> {
        let state = self.state.read().await;
        Ok(state
            .hospitals
            .iter()
            .filter(|h| {
                state
                    .offerings
                    .iter()
                    .any(|(hid, did)| hid == &h.hospital_id && *did == department_id)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CareStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn insert_transfer(&self, transfer: NewTransfer) -> Result<Transfer> {
        let mut state = self.state.write().await;
        let transfer_id = state.next_transfer_id();
        let row = transfer.into_transfer(transfer_id);
        state.transfers.insert(transfer_id, row.clone());
        Ok(row)
    }

    async fn transfer(&self, transfer_id: TransferId) -> Result<Option<Transfer>> {
        Ok(self.state.read().await.transfers.get(&transfer_id).cloned())
    }

    async fn list_transfers(&self, hospital: Option<&HospitalId>) -> Result<Vec<Transfer>> {
        let state = self.state.read().await;
        Ok(state
            .transfers
            .values()
            .filter(|t| match hospital {
                Some(h) => &t.source_hospital == h || &t.target_hospital == h,
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn commit_transition(
        &self,
        transfer: &Transfer,
        expected: TransferStatus,
        grant: Option<NewAccessGrant>,
    ) -> Result<Option<AccessGrant>> {
        let mut state = self.state.write().await;

        let stored = state.transfers.get(&transfer.transfer_id).ok_or_else(|| {
            PersistenceError::Conflict(format!(
                "transfer {} disappeared during update",
                transfer.transfer_id
            ))
        })?;
        if stored.status != expected {
            return Err(PersistenceError::Conflict(format!(
                "transfer {} is {} but {} was expected",
                transfer.transfer_id, stored.status, expected
            ))
            .into());
        }

        let mut updated = stored.clone();
        updated.status = transfer.status;
        updated.checksum_verified = transfer.checksum_verified.clone();
        state.transfers.insert(transfer.transfer_id, updated);

        let stored_grant = grant.map(|g| {
            let grant_id = state.next_grant_id();
            let row = g.into_grant(grant_id);
            state.grants.insert(grant_id, row.clone());
            row
        });

        Ok(stored_grant)
    }

    async fn access_grants_for_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<AccessGrant>> {
        let state = self.state.read().await;
        Ok(state
            .grants
            .values()
            .filter(|g| &g.patient_id == patient_id)
            .cloned()
            .collect())
    }

    async fn connections(&self) -> Result<Vec<HospitalConnection>> {
        Ok(self
            .state
            .read()
            .await
            .connections
            .values()
            .cloned()
            .collect())
    }

    async fn insert_connection_pair(&self, connection: NewConnection) -> Result<ConnectionPair> {
        let mut state = self.state.write().await;

        if state.has_connection(&connection.from, &connection.to) {
            return Err(GraphError::DuplicateConnection {
                from: connection.from,
                to: connection.to,
            }
            .into());
        }

        let reverse_needed = !state.has_connection(&connection.to, &connection.from);
        let reverse_request = connection.reversed();

        let forward = state.push_connection(connection);
        let reverse = reverse_needed.then(|| state.push_connection(reverse_request));

        Ok(ConnectionPair { forward, reverse })
    }

    async fn delete_connection(&self, connection_id: ConnectionId) -> Result<bool> {
        Ok(self
            .state
            .write()
            .await
            .connections
            .remove(&connection_id)
            .is_some())
    }
}
