//! PostgreSQL store implementing the store traits
//!
//! Every mutating method runs inside a single SQL transaction. Dropping the
//! transaction on an error path rolls it back.

use crate::adapters::database::traits::{CareStore, RecordSource};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::{
    connection_from_row, department_from_row, grant_from_row, hospital_from_row,
    patient_from_row, patient_uuid, session_from_row, transfer_from_row,
};
use crate::domain::access::{AccessGrant, NewAccessGrant};
use crate::domain::connection::{ConnectionPair, HospitalConnection, NewConnection};
use crate::domain::errors::{CareLinkError, GraphError, PersistenceError};
use crate::domain::ids::{ConnectionId, DepartmentId, HospitalId, PatientId, TransferId};
use crate::domain::records::{Department, Hospital, Patient, TreatmentSession};
use crate::domain::transfer::{NewTransfer, Transfer, TransferStatus};
use crate::domain::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_postgres::error::SqlState;

const TRANSFER_COLUMNS: &str = "transfer_id, patient_id, source_hospital, target_hospital, \
     department_id, initiated_by, status, checksum_original, checksum_verified, transferred_at";

const CONNECTION_COLUMNS: &str =
    "connection_id, hospital_from, hospital_to, cost, latency, reliability, created_at";

const GRANT_COLUMNS: &str =
    "grant_id, patient_id, hospital_id, reason, transfer_id, granted_at, is_active";

fn query_failed(e: tokio_postgres::Error) -> PersistenceError {
    PersistenceError::QueryFailed(e.to_string())
}

fn write_failed(e: tokio_postgres::Error) -> PersistenceError {
    PersistenceError::WriteFailed(e.to_string())
}

fn transaction_failed(e: tokio_postgres::Error) -> PersistenceError {
    PersistenceError::TransactionFailed(e.to_string())
}

/// A unique violation on the forward insert means the ordered pair exists
fn connection_insert_error(
    code: Option<&SqlState>,
    detail: String,
    connection: &NewConnection,
) -> CareLinkError {
    if code == Some(&SqlState::UNIQUE_VIOLATION) {
        GraphError::DuplicateConnection {
            from: connection.from.clone(),
            to: connection.to.clone(),
        }
        .into()
    } else {
        PersistenceError::WriteFailed(detail).into()
    }
}

/// PostgreSQL implementation of [`CareStore`]
pub struct PostgreSQLStore {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLStore {
    /// Create a new PostgreSQL store
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl RecordSource for PostgreSQLStore {
    async fn patient(&self, patient_id: &PatientId) -> Result<Option<Patient>> {
        let conn = self.client.get_connection().await?;
        let row = conn
            .query_opt(
                "SELECT patient_id, hospital_id, name, email, dob \
                 FROM patients WHERE patient_id = $1",
                &[&patient_uuid(patient_id)?],
            )
            .await
            .map_err(query_failed)?;
        row.as_ref().map(patient_from_row).transpose()
    }

    async fn treatment_sessions(&self, patient_id: &PatientId) -> Result<Vec<TreatmentSession>> {
        let conn = self.client.get_connection().await?;
        let rows = conn
            .query(
                "SELECT session_id, patient_id, hospital_id, treatment_id, device_id, doctor_id, \
                        doctor_minutes, nurse_minutes, device_cost, device_price, staff_cost, \
                        total_price, profit, notes, created_at \
                 FROM treatment_sessions WHERE patient_id = $1",
                &[&patient_uuid(patient_id)?],
            )
            .await
            .map_err(query_failed)?;
        rows.iter().map(session_from_row).collect()
    }

    async fn hospital(&self, hospital_id: &HospitalId) -> Result<Option<Hospital>> {
        let conn = self.client.get_connection().await?;
        let row = conn
            .query_opt(
                "SELECT hospital_id, name, location FROM hospitals WHERE hospital_id = $1",
                &[&hospital_id.as_str()],
            )
            .await
            .map_err(query_failed)?;
        row.as_ref().map(hospital_from_row).transpose()
    }

    async fn department(&self, department_id: DepartmentId) -> Result<Option<Department>> {
        let conn = self.client.get_connection().await?;
        let row = conn
            .query_opt(
                "SELECT department_id, name FROM departments WHERE department_id = $1",
                &[&department_id.value()],
            )
            .await
            .map_err(query_failed)?;
        row.as_ref().map(department_from_row).transpose()
    }

    async fn hospitals_with_department(
        &self,
        department_id: DepartmentId,
    ) -> Result<Vec<Hospital>> {
        let conn = self.client.get_connection().await?;
        let rows = conn
            .query(
                "SELECT h.hospital_id, h.name, h.location \
                 FROM hospitals h \
                 JOIN hospital_departments hd ON hd.hospital_id = h.hospital_id \
                 WHERE hd.department_id = $1 \
                 ORDER BY h.hospital_id",
                &[&department_id.value()],
            )
            .await
            .map_err(query_failed)?;
        rows.iter().map(hospital_from_row).collect()
    }
}

#[async_trait]
impl CareStore for PostgreSQLStore {
    fn backend_name(&self) -> &'static str {
        "postgresql"
    }

    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn insert_transfer(&self, transfer: NewTransfer) -> Result<Transfer> {
        let conn = self.client.get_connection().await?;
        let sql = format!(
            "INSERT INTO transfers (patient_id, source_hospital, target_hospital, department_id, \
                                    initiated_by, status, checksum_original, transferred_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {TRANSFER_COLUMNS}"
        );
        let row = conn
            .query_one(
                &sql,
                &[
                    &patient_uuid(&transfer.patient_id)?,
                    &transfer.source_hospital.as_str(),
                    &transfer.target_hospital.as_str(),
                    &transfer.department_id.value(),
                    &transfer.initiated_by.value(),
                    &TransferStatus::Pending.as_str(),
                    &transfer.checksum_original.as_str(),
                    &transfer.transferred_at,
                ],
            )
            .await
            .map_err(write_failed)?;
        transfer_from_row(&row)
    }

    async fn transfer(&self, transfer_id: TransferId) -> Result<Option<Transfer>> {
        let conn = self.client.get_connection().await?;
        let sql = format!("SELECT {TRANSFER_COLUMNS} FROM transfers WHERE transfer_id = $1");
        let row = conn
            .query_opt(&sql, &[&transfer_id.value()])
            .await
            .map_err(query_failed)?;
        row.as_ref().map(transfer_from_row).transpose()
    }

    async fn list_transfers(&self, hospital: Option<&HospitalId>) -> Result<Vec<Transfer>> {
        let conn = self.client.get_connection().await?;
        let rows = match hospital {
            Some(hospital) => {
                let sql = format!(
                    "SELECT {TRANSFER_COLUMNS} FROM transfers \
                     WHERE source_hospital = $1 OR target_hospital = $1 \
                     ORDER BY transfer_id"
                );
                conn.query(&sql, &[&hospital.as_str()]).await
            }
            None => {
                let sql = format!("SELECT {TRANSFER_COLUMNS} FROM transfers ORDER BY transfer_id");
                conn.query(&sql, &[]).await
            }
        }
        .map_err(query_failed)?;
        rows.iter().map(transfer_from_row).collect()
    }

    async fn commit_transition(
        &self,
        transfer: &Transfer,
        expected: TransferStatus,
        grant: Option<NewAccessGrant>,
    ) -> Result<Option<AccessGrant>> {
        let mut conn = self.client.get_connection().await?;
        let tx = conn.transaction().await.map_err(transaction_failed)?;

        let updated = tx
            .execute(
                "UPDATE transfers SET status = $1, checksum_verified = $2 \
                 WHERE transfer_id = $3 AND status = $4",
                &[
                    &transfer.status.as_str(),
                    &transfer.checksum_verified.as_ref().map(|c| c.as_str()),
                    &transfer.transfer_id.value(),
                    &expected.as_str(),
                ],
            )
            .await
            .map_err(write_failed)?;

        if updated != 1 {
            return Err(PersistenceError::Conflict(format!(
                "transfer {} is no longer {}",
                transfer.transfer_id, expected
            ))
            .into());
        }

        let stored_grant = match grant {
            Some(grant) => {
                let sql = format!(
                    "INSERT INTO patient_access \
                         (patient_id, hospital_id, reason, transfer_id, granted_at, is_active) \
                     VALUES ($1, $2, $3, $4, $5, TRUE) \
                     RETURNING {GRANT_COLUMNS}"
                );
                let row = tx
                    .query_one(
                        &sql,
                        &[
                            &patient_uuid(&grant.patient_id)?,
                            &grant.hospital_id.as_str(),
                            &grant.reason,
                            &grant.transfer_id.value(),
                            &grant.granted_at,
                        ],
                    )
                    .await
                    .map_err(write_failed)?;
                Some(grant_from_row(&row)?)
            }
            None => None,
        };

        tx.commit().await.map_err(transaction_failed)?;
        Ok(stored_grant)
    }

    async fn access_grants_for_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<AccessGrant>> {
        let conn = self.client.get_connection().await?;
        let sql = format!(
            "SELECT {GRANT_COLUMNS} FROM patient_access WHERE patient_id = $1 ORDER BY grant_id"
        );
        let rows = conn
            .query(&sql, &[&patient_uuid(patient_id)?])
            .await
            .map_err(query_failed)?;
        rows.iter().map(grant_from_row).collect()
    }

    async fn connections(&self) -> Result<Vec<HospitalConnection>> {
        let conn = self.client.get_connection().await?;
        let sql =
            format!("SELECT {CONNECTION_COLUMNS} FROM hospital_connections ORDER BY connection_id");
        let rows = conn.query(&sql, &[]).await.map_err(query_failed)?;
        rows.iter().map(connection_from_row).collect()
    }

    async fn insert_connection_pair(&self, connection: NewConnection) -> Result<ConnectionPair> {
        let mut conn = self.client.get_connection().await?;
        let tx = conn.transaction().await.map_err(transaction_failed)?;

        let forward_sql = format!(
            "INSERT INTO hospital_connections (hospital_from, hospital_to, cost, latency, reliability) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {CONNECTION_COLUMNS}"
        );
        let metrics = connection.metrics;
        let forward = tx
            .query_one(
                &forward_sql,
                &[
                    &connection.from.as_str(),
                    &connection.to.as_str(),
                    &metrics.cost,
                    &metrics.latency,
                    &metrics.reliability,
                ],
            )
            .await
            .map_err(|e| connection_insert_error(e.code(), e.to_string(), &connection))?;

        let reverse_sql = format!(
            "INSERT INTO hospital_connections (hospital_from, hospital_to, cost, latency, reliability) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (hospital_from, hospital_to) DO NOTHING \
             RETURNING {CONNECTION_COLUMNS}"
        );
        let reverse = tx
            .query_opt(
                &reverse_sql,
                &[
                    &connection.to.as_str(),
                    &connection.from.as_str(),
                    &metrics.cost,
                    &metrics.latency,
                    &metrics.reliability,
                ],
            )
            .await
            .map_err(write_failed)?;

        let pair = ConnectionPair {
            forward: connection_from_row(&forward)?,
            reverse: reverse.as_ref().map(connection_from_row).transpose()?,
        };

        tx.commit().await.map_err(transaction_failed)?;
        Ok(pair)
    }

    async fn delete_connection(&self, connection_id: ConnectionId) -> Result<bool> {
        let conn = self.client.get_connection().await?;
        let deleted = conn
            .execute(
                "DELETE FROM hospital_connections WHERE connection_id = $1",
                &[&connection_id.value()],
            )
            .await
            .map_err(write_failed)?;
        Ok(deleted > 0)
    }
}
