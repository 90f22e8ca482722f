//! Transfer lifecycle manager
//!
//! Creates transfers at the source, verifies them at the destination by
//! re-hashing the same payload, and records operator rejections. Every
//! operation validates first and then hands the store a single atomic unit.

use crate::adapters::database::traits::CareStore;
use crate::config::TransferConfig;
use crate::core::verification::checksum::calculate_checksum;
use crate::core::verification::payload;
use crate::core::verification::report::VerificationReport;
use crate::domain::access::{AccessGrant, NewAccessGrant};
use crate::domain::errors::{CareLinkError, TransferError};
use crate::domain::ids::{DepartmentId, HospitalId, PatientId, TransferId};
use crate::domain::request::RequestContext;
use crate::domain::transfer::{NewTransfer, Transfer, TransferOutcome, TransferStatus};
use crate::domain::Result;
use crate::{log_checksum_comparison, log_transfer_transition};
use chrono::{SubsecRound, Utc};
use std::sync::Arc;
use std::time::Instant;

/// What a `verify` call decided and wrote
#[derive(Debug, Clone)]
pub struct VerificationResult {
    /// The transfer as stored after the update
    pub transfer: Transfer,
    pub outcome: TransferOutcome,
    /// The grant created for the target hospital, on success only
    pub grant: Option<AccessGrant>,
    pub report: VerificationReport,
}

/// Drives transfers through their status state machine
pub struct TransferManager {
    store: Arc<dyn CareStore>,
    config: TransferConfig,
}

impl TransferManager {
    /// Create a new TransferManager
    pub fn new(store: Arc<dyn CareStore>, config: TransferConfig) -> Self {
        Self { store, config }
    }

    /// Start a transfer of a patient to a target hospital
    ///
    /// The source is the patient's current hospital. The payload is anchored
    /// at `transferred_at` and hashed before anything is written.
    ///
    /// # Errors
    ///
    /// Returns `CareLinkError::Validation` if the patient, department or
    /// target is missing or unsuitable. Nothing is written in that case.
    pub async fn initiate(
        &self,
        ctx: &RequestContext,
        patient_id: &PatientId,
        department_id: DepartmentId,
        target: &HospitalId,
    ) -> Result<Transfer> {
        let patient = self.store.patient(patient_id).await?.ok_or_else(|| {
            CareLinkError::Validation(format!("Patient not found: {patient_id}"))
        })?;

        if self.config.enforce_source_scope && patient.hospital_id != ctx.hospital_id {
            return Err(CareLinkError::Validation(format!(
                "Patient {} is registered at {}, not at {}",
                patient_id, patient.hospital_id, ctx.hospital_id
            )));
        }

        let department = self.store.department(department_id).await?.ok_or_else(|| {
            CareLinkError::Validation(format!("Department not found: {department_id}"))
        })?;

        if self.store.hospital(target).await?.is_none() {
            return Err(CareLinkError::Validation(format!(
                "Target hospital not found: {target}"
            )));
        }

        if target == &patient.hospital_id {
            return Err(CareLinkError::Validation(format!(
                "Target hospital {target} is the patient's current hospital"
            )));
        }

        let offers_department = self
            .store
            .hospitals_with_department(department_id)
            .await?
            .iter()
            .any(|h| &h.hospital_id == target);
        if !offers_department {
            return Err(CareLinkError::Validation(format!(
                "Target hospital {} has no {} department",
                target, department.name
            )));
        }

        // Stores keep microseconds; the anchor must survive a round trip
        let transferred_at = Utc::now().trunc_subsecs(6);

        let snapshot = payload::build(self.store.as_ref(), patient_id, department_id)
            .await?
            .anchored(transferred_at);
        let checksum_original = calculate_checksum(&snapshot)?;

        let transfer = self
            .store
            .insert_transfer(NewTransfer {
                patient_id: patient_id.clone(),
                source_hospital: patient.hospital_id.clone(),
                target_hospital: target.clone(),
                department_id,
                initiated_by: ctx.principal,
                checksum_original: checksum_original.clone(),
                transferred_at,
            })
            .await?;

        tracing::info!(
            transfer_id = %transfer.transfer_id,
            patient_id = %patient_id,
            source = %transfer.source_hospital,
            target = %transfer.target_hospital,
            department = %department.name,
            sessions = snapshot.treatment_history.len(),
            checksum = checksum_original.short(),
            principal = %ctx.principal,
            "Transfer initiated"
        );

        Ok(transfer)
    }

    /// Re-hash the payload at the destination and settle the transfer
    ///
    /// Equal digests move the transfer to `verified` and grant the target
    /// hospital access; different digests move it to `failed` with no grant.
    /// Either way the recomputed digest is stored.
    ///
    /// # Errors
    ///
    /// Returns `TransferError::NotFound` for an unknown id and
    /// `TransferError::InvalidTransition` unless the transfer is `pending`.
    pub async fn verify(
        &self,
        ctx: &RequestContext,
        transfer_id: TransferId,
    ) -> Result<VerificationResult> {
        let started = Instant::now();
        let transfer = self.get(transfer_id).await?;
        ensure_transition(&transfer, TransferStatus::Verified)?;

        let checksum_original = transfer
            .checksum_original
            .clone()
            .ok_or(TransferError::MissingOriginalChecksum(transfer_id))?;

        let snapshot =
            payload::build(self.store.as_ref(), &transfer.patient_id, transfer.department_id)
                .await?
                .anchored(transfer.transferred_at);
        let checksum_verified = calculate_checksum(&snapshot)?;

        log_checksum_comparison!(transfer_id, &checksum_original, &checksum_verified);

        let outcome = if checksum_verified == checksum_original {
            TransferOutcome::Verified
        } else {
            TransferOutcome::ChecksumMismatch
        };

        let grant = if outcome.is_success() {
            Some(self.grant_for(&transfer).await?)
        } else {
            None
        };

        let mut updated = transfer.clone();
        updated.status = outcome.status();
        updated.checksum_verified = Some(checksum_verified.clone());

        let grant = self
            .store
            .commit_transition(&updated, TransferStatus::Pending, grant)
            .await?;

        log_transfer_transition!(transfer_id, transfer.status, updated.status);
        tracing::info!(
            transfer_id = %transfer_id,
            outcome = ?outcome,
            grant_id = grant.as_ref().map(|g| g.grant_id.value()),
            principal = %ctx.principal,
            "{}",
            outcome.message()
        );

        let mut report = VerificationReport {
            transfer_id,
            patient_id: updated.patient_id.clone(),
            target_hospital: updated.target_hospital.clone(),
            verified_at: Utc::now(),
            checksum_original,
            checksum_verified,
            sessions_hashed: snapshot.treatment_history.len(),
            outcome,
            duration_ms: 0,
        };
        report.set_duration(started.elapsed().as_millis() as u64);

        Ok(VerificationResult {
            transfer: updated,
            outcome,
            grant,
            report,
        })
    }

    /// Reject a pending transfer; never creates a grant
    ///
    /// # Errors
    ///
    /// Returns `TransferError::InvalidTransition` unless the transfer is
    /// `pending`.
    pub async fn reject(&self, ctx: &RequestContext, transfer_id: TransferId) -> Result<Transfer> {
        let transfer = self.get(transfer_id).await?;
        ensure_transition(&transfer, TransferStatus::Rejected)?;

        let mut updated = transfer.clone();
        updated.status = TransferOutcome::Rejected.status();

        self.store
            .commit_transition(&updated, TransferStatus::Pending, None)
            .await?;

        log_transfer_transition!(transfer_id, transfer.status, updated.status);
        tracing::info!(
            transfer_id = %transfer_id,
            principal = %ctx.principal,
            hospital = %ctx.hospital_id,
            "Transfer rejected by operator"
        );

        Ok(updated)
    }

    /// Load one transfer
    pub async fn get(&self, transfer_id: TransferId) -> Result<Transfer> {
        self.store
            .transfer(transfer_id)
            .await?
            .ok_or_else(|| TransferError::NotFound(transfer_id).into())
    }

    /// The transfer audit trail, optionally limited to one hospital
    pub async fn list(&self, hospital: Option<&HospitalId>) -> Result<Vec<Transfer>> {
        self.store.list_transfers(hospital).await
    }

    /// Grants created for a patient by successful verifications
    pub async fn access_grants(&self, patient_id: &PatientId) -> Result<Vec<AccessGrant>> {
        self.store.access_grants_for_patient(patient_id).await
    }

    async fn grant_for(&self, transfer: &Transfer) -> Result<NewAccessGrant> {
        let department = self
            .store
            .department(transfer.department_id)
            .await?
            .ok_or_else(|| {
                CareLinkError::Validation(format!(
                    "Department not found: {}",
                    transfer.department_id
                ))
            })?;

        Ok(NewAccessGrant {
            patient_id: transfer.patient_id.clone(),
            hospital_id: transfer.target_hospital.clone(),
            reason: grant_reason(&department.name),
            transfer_id: transfer.transfer_id,
            granted_at: Utc::now(),
        })
    }
}

/// Reason recorded on the access grant a verified transfer creates
pub fn grant_reason(department_name: &str) -> String {
    format!("Patient transfer: {department_name} department")
}

fn ensure_transition(transfer: &Transfer, to: TransferStatus) -> Result<()> {
    if transfer.status.can_transition_to(to) {
        Ok(())
    } else {
        Err(TransferError::InvalidTransition {
            transfer_id: transfer.transfer_id,
            from: transfer.status,
            to,
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::domain::ids::{AdminId, SessionId, TreatmentId};
    use crate::domain::records::{Department, Hospital, Patient, TreatmentSession};

    const CARDIOLOGY: DepartmentId = DepartmentId::new(1);

    fn hid(s: &str) -> HospitalId {
        HospitalId::new(s).unwrap()
    }

    fn ctx(hospital: &str) -> RequestContext {
        RequestContext::new(AdminId::new(1), hid(hospital))
    }

    async fn seeded() -> (Arc<MemoryStore>, PatientId) {
        let store = Arc::new(MemoryStore::new());
        for id in ["A", "B", "C"] {
            store
                .add_hospital(Hospital {
                    hospital_id: hid(id),
                    name: format!("Hospital {id}"),
                    location: "Town".to_string(),
                })
                .await;
        }
        store
            .add_department(Department {
                department_id: CARDIOLOGY,
                name: "Cardiology".to_string(),
            })
            .await;
        store.offer_department(hid("B"), CARDIOLOGY).await;

        let patient_id = PatientId::generate();
        store
            .upsert_patient(Patient {
                patient_id: patient_id.clone(),
                hospital_id: hid("A"),
                name: "Grace Hopper".to_string(),
                email: "grace@example.org".to_string(),
                dob: None,
            })
            .await;
        store
            .upsert_treatment_session(TreatmentSession::new(
                SessionId::new("s-1").unwrap(),
                patient_id.clone(),
                hid("A"),
                TreatmentId::new(3),
                Utc::now(),
            ))
            .await;

        (store, patient_id)
    }

    fn manager(store: Arc<MemoryStore>) -> TransferManager {
        TransferManager::new(store, TransferConfig::default())
    }

    #[tokio::test]
    async fn test_initiate_creates_pending_with_checksum() {
        let (store, patient_id) = seeded().await;
        let manager = manager(store);

        let transfer = manager
            .initiate(&ctx("A"), &patient_id, CARDIOLOGY, &hid("B"))
            .await
            .unwrap();

        assert_eq!(transfer.status, TransferStatus::Pending);
        assert_eq!(transfer.source_hospital, hid("A"));
        assert_eq!(transfer.initiated_by, AdminId::new(1));
        assert!(transfer.checksum_original.is_some());
        assert!(transfer.checksum_verified.is_none());
    }

    #[tokio::test]
    async fn test_initiate_rejects_target_without_department() {
        let (store, patient_id) = seeded().await;
        let manager = manager(store.clone());

        let err = manager
            .initiate(&ctx("A"), &patient_id, CARDIOLOGY, &hid("C"))
            .await
            .unwrap_err();

        assert!(matches!(err, CareLinkError::Validation(_)));
        assert!(store.list_transfers(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_initiate_rejects_source_as_target() {
        let (store, patient_id) = seeded().await;
        store.offer_department(hid("A"), CARDIOLOGY).await;
        let manager = manager(store);

        let err = manager
            .initiate(&ctx("A"), &patient_id, CARDIOLOGY, &hid("A"))
            .await
            .unwrap_err();
        assert!(matches!(err, CareLinkError::Validation(_)));
    }

    #[tokio::test]
    async fn test_initiate_enforces_source_scope() {
        let (store, patient_id) = seeded().await;

        let scoped = manager(store.clone());
        let err = scoped
            .initiate(&ctx("C"), &patient_id, CARDIOLOGY, &hid("B"))
            .await
            .unwrap_err();
        assert!(matches!(err, CareLinkError::Validation(_)));

        let unscoped = TransferManager::new(
            store,
            TransferConfig {
                enforce_source_scope: false,
            },
        );
        let transfer = unscoped
            .initiate(&ctx("C"), &patient_id, CARDIOLOGY, &hid("B"))
            .await
            .unwrap();
        assert_eq!(transfer.source_hospital, hid("A"));
    }

    #[tokio::test]
    async fn test_initiate_unknown_department() {
        let (store, patient_id) = seeded().await;
        let err = manager(store)
            .initiate(&ctx("A"), &patient_id, DepartmentId::new(99), &hid("B"))
            .await
            .unwrap_err();
        assert!(matches!(err, CareLinkError::Validation(_)));
    }

    #[tokio::test]
    async fn test_verify_grants_access_with_department_reason() {
        let (store, patient_id) = seeded().await;
        let manager = manager(store);
        let transfer = manager
            .initiate(&ctx("A"), &patient_id, CARDIOLOGY, &hid("B"))
            .await
            .unwrap();

        let result = manager.verify(&ctx("B"), transfer.transfer_id).await.unwrap();

        assert_eq!(result.outcome, TransferOutcome::Verified);
        assert_eq!(result.transfer.status, TransferStatus::Verified);
        assert!(result.transfer.checksums_match());
        let grant = result.grant.unwrap();
        assert_eq!(grant.hospital_id, hid("B"));
        assert_eq!(grant.reason, "Patient transfer: Cardiology department");
        assert!(grant.is_active);
        assert!(result.report.is_success());
    }

    #[tokio::test]
    async fn test_verify_twice_is_invalid_transition() {
        let (store, patient_id) = seeded().await;
        let manager = manager(store);
        let transfer = manager
            .initiate(&ctx("A"), &patient_id, CARDIOLOGY, &hid("B"))
            .await
            .unwrap();
        manager.verify(&ctx("B"), transfer.transfer_id).await.unwrap();

        let err = manager
            .verify(&ctx("B"), transfer.transfer_id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CareLinkError::Transfer(TransferError::InvalidTransition {
                from: TransferStatus::Verified,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_reject_after_reject_is_invalid() {
        let (store, patient_id) = seeded().await;
        let manager = manager(store);
        let transfer = manager
            .initiate(&ctx("A"), &patient_id, CARDIOLOGY, &hid("B"))
            .await
            .unwrap();

        let rejected = manager.reject(&ctx("A"), transfer.transfer_id).await.unwrap();
        assert_eq!(rejected.status, TransferStatus::Rejected);

        assert!(manager.reject(&ctx("A"), transfer.transfer_id).await.is_err());
        assert!(manager.verify(&ctx("B"), transfer.transfer_id).await.is_err());
    }

    #[tokio::test]
    async fn test_get_unknown_transfer() {
        let (store, _) = seeded().await;
        let err = manager(store).get(TransferId::new(404)).await.unwrap_err();
        assert!(matches!(
            err,
            CareLinkError::Transfer(TransferError::NotFound(_))
        ));
    }

    #[test]
    fn test_grant_reason() {
        assert_eq!(
            grant_reason("Oncology"),
            "Patient transfer: Oncology department"
        );
    }
}
