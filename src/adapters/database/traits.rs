//! Store abstraction traits
//!
//! This module defines the traits that store adapters must implement
//! to back CareLink. Every mutating method is one atomic unit: it either
//! commits all of its writes or none of them.

use crate::domain::access::{AccessGrant, NewAccessGrant};
use crate::domain::connection::{ConnectionPair, HospitalConnection, NewConnection};
use crate::domain::ids::{ConnectionId, DepartmentId, HospitalId, PatientId, TransferId};
use crate::domain::records::{Department, Hospital, Patient, TreatmentSession};
use crate::domain::transfer::{NewTransfer, Transfer, TransferStatus};
use crate::domain::Result;
use async_trait::async_trait;

/// Read-only access to records owned by the CRUD side
///
/// The core never writes through this trait.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Load a patient
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` if the patient does not exist.
    async fn patient(&self, patient_id: &PatientId) -> Result<Option<Patient>>;

    /// Load every treatment session of a patient
    ///
    /// No ordering is promised; callers that need a stable order sort.
    async fn treatment_sessions(&self, patient_id: &PatientId) -> Result<Vec<TreatmentSession>>;

    /// Load a hospital
    async fn hospital(&self, hospital_id: &HospitalId) -> Result<Option<Hospital>>;

    /// Load a department catalog entry
    async fn department(&self, department_id: DepartmentId) -> Result<Option<Department>>;

    /// Hospitals offering a department, in store order
    async fn hospitals_with_department(&self, department_id: DepartmentId)
        -> Result<Vec<Hospital>>;
}

/// Store for the entities the core owns: transfers, access grants and
/// hospital connections
#[async_trait]
pub trait CareStore: RecordSource {
    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;

    /// Test the store connection
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    async fn test_connection(&self) -> Result<()>;

    /// Insert a complete transfer row in `pending`
    ///
    /// The row is written with its original checksum in a single write, so
    /// a failure leaves no transfer behind.
    async fn insert_transfer(&self, transfer: NewTransfer) -> Result<Transfer>;

    /// Load a transfer
    async fn transfer(&self, transfer_id: TransferId) -> Result<Option<Transfer>>;

    /// List transfers ordered by id, optionally only those where the hospital
    /// is the source or the target
    async fn list_transfers(&self, hospital: Option<&HospitalId>) -> Result<Vec<Transfer>>;

    /// Persist a status change and, optionally, the access grant it produces
    ///
    /// Writes `status` and `checksum_verified` from `transfer`. The update
    /// only applies while the stored status still equals `expected`;
    /// otherwise nothing is written and a `PersistenceError::Conflict` is
    /// returned. The grant is inserted in the same transaction.
    ///
    /// # Returns
    ///
    /// The stored grant, if one was requested.
    async fn commit_transition(
        &self,
        transfer: &Transfer,
        expected: TransferStatus,
        grant: Option<NewAccessGrant>,
    ) -> Result<Option<AccessGrant>>;

    /// Access grants of a patient, ordered by id
    async fn access_grants_for_patient(&self, patient_id: &PatientId)
        -> Result<Vec<AccessGrant>>;

    /// Every directed connection row, ordered by id
    async fn connections(&self) -> Result<Vec<HospitalConnection>>;

    /// Insert `from -> to` and, if absent, `to -> from` with the same metrics
    ///
    /// # Errors
    ///
    /// Returns `GraphError::DuplicateConnection` if `from -> to` already
    /// exists. Nothing is written in that case.
    async fn insert_connection_pair(&self, connection: NewConnection) -> Result<ConnectionPair>;

    /// Delete one directed row
    ///
    /// # Returns
    ///
    /// `false` if no row had this id.
    async fn delete_connection(&self, connection_id: ConnectionId) -> Result<bool>;
}
