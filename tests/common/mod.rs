//! Shared fixtures for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use carelink::adapters::database::{CareStore, RecordSource};
use carelink::adapters::memory::{MemoryFixture, MemoryStore};
use carelink::domain::{
    AccessGrant, AdminId, ConnectionId, ConnectionPair, Department, DepartmentId, Hospital,
    HospitalConnection, HospitalId, NewAccessGrant, NewConnection, NewTransfer, Patient,
    PatientId, PersistenceError, RequestContext, Result, Transfer, TransferId, TransferStatus,
    TreatmentSession,
};
use std::sync::atomic::{AtomicBool, Ordering};

pub const DEMO_FIXTURE: &str = include_str!("../../demos/fixture.json");

/// Patient registered at H1 with two treatment sessions
pub const ANA: &str = "0b7f3c1e-8a51-4f3e-9d0c-2d5c7a1e9f10";

/// Patient registered at H2 with no sessions
pub const TOMAS: &str = "5d2a9e44-1c3b-4b7a-8f6e-9a0b1c2d3e4f";

pub const CARDIOLOGY: DepartmentId = DepartmentId::new(1);
pub const ONCOLOGY: DepartmentId = DepartmentId::new(2);
pub const NEUROLOGY: DepartmentId = DepartmentId::new(3);

pub fn hid(id: &str) -> HospitalId {
    HospitalId::new(id).unwrap()
}

pub fn pid(id: &str) -> PatientId {
    PatientId::new(id).unwrap()
}

pub fn ctx(hospital: &str) -> RequestContext {
    RequestContext::new(AdminId::new(42), hid(hospital))
}

pub fn demo_store() -> MemoryStore {
    MemoryStore::from_fixture(MemoryFixture::from_json(DEMO_FIXTURE).unwrap()).unwrap()
}

/// Delegates to a [`MemoryStore`] but can be told to fail writes
pub struct FlakyStore {
    pub inner: MemoryStore,
    fail_commits: AtomicBool,
    fail_transfer_inserts: AtomicBool,
    fail_connection_inserts: AtomicBool,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            fail_commits: AtomicBool::new(false),
            fail_transfer_inserts: AtomicBool::new(false),
            fail_connection_inserts: AtomicBool::new(false),
        }
    }

    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    pub fn fail_transfer_inserts(&self, fail: bool) {
        self.fail_transfer_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_connection_inserts(&self, fail: bool) {
        self.fail_connection_inserts.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordSource for FlakyStore {
    async fn patient(&self, patient_id: &PatientId) -> Result<Option<Patient>> {
        self.inner.patient(patient_id).await
    }

    async fn treatment_sessions(&self, patient_id: &PatientId) -> Result<Vec<TreatmentSession>> {
        self.inner.treatment_sessions(patient_id).await
    }

    async fn hospital(&self, hospital_id: &HospitalId) -> Result<Option<Hospital>> {
        self.inner.hospital(hospital_id).await
    }

    async fn department(&self, department_id: DepartmentId) -> Result<Option<Department>> {
        self.inner.department(department_id).await
    }

    async fn hospitals_with_department(
        &self,
        department_id: DepartmentId,
    ) -> Result<Vec<Hospital>> {
        self.inner.hospitals_with_department(department_id).await
    }
}

#[async_trait]
impl CareStore for FlakyStore {
    fn backend_name(&self) -> &'static str {
        "flaky"
    }

    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn insert_transfer(&self, transfer: NewTransfer) -> Result<Transfer> {
        if self.fail_transfer_inserts.load(Ordering::SeqCst) {
            return Err(PersistenceError::TransactionFailed("injected failure".into()).into());
        }
        self.inner.insert_transfer(transfer).await
    }

    async fn transfer(&self, transfer_id: TransferId) -> Result<Option<Transfer>> {
        self.inner.transfer(transfer_id).await
    }

    async fn list_transfers(&self, hospital: Option<&HospitalId>) -> Result<Vec<Transfer>> {
        self.inner.list_transfers(hospital).await
    }

    async fn commit_transition(
        &self,
        transfer: &Transfer,
        expected: TransferStatus,
        grant: Option<NewAccessGrant>,
    ) -> Result<Option<AccessGrant>> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(PersistenceError::TransactionFailed("injected failure".into()).into());
        }
        self.inner.commit_transition(transfer, expected, grant).await
    }

    async fn access_grants_for_patient(&self, patient_id: &PatientId) -> Result<Vec<AccessGrant>> {
        self.inner.access_grants_for_patient(patient_id).await
    }

    async fn connections(&self) -> Result<Vec<HospitalConnection>> {
        self.inner.connections().await
    }

    async fn insert_connection_pair(&self, connection: NewConnection) -> Result<ConnectionPair> {
        if self.fail_connection_inserts.load(Ordering::SeqCst) {
            return Err(PersistenceError::TransactionFailed("injected failure".into()).into());
        }
        self.inner.insert_connection_pair(connection).await
    }

    async fn delete_connection(&self, connection_id: ConnectionId) -> Result<bool> {
        self.inner.delete_connection(connection_id).await
    }
}
