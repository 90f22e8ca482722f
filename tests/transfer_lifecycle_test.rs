//! Integration tests for the transfer lifecycle against the in-process store

mod common;

use carelink::adapters::database::{CareStore, RecordSource};
use carelink::config::TransferConfig;
use carelink::core::transfer::{grant_reason, TransferManager};
use carelink::domain::{
    CareLinkError, SessionId, TransferError, TransferId, TransferOutcome, TransferStatus,
    TreatmentId, TreatmentSession,
};
use chrono::{TimeZone, Utc};
use common::*;
use std::sync::Arc;

fn manager_for(store: Arc<dyn CareStore>) -> TransferManager {
    TransferManager::new(store, TransferConfig::default())
}

#[tokio::test]
async fn test_initiate_then_verify_grants_access() {
    let store = Arc::new(demo_store());
    let manager = manager_for(store.clone());

    let transfer = manager
        .initiate(&ctx("H1"), &pid(ANA), CARDIOLOGY, &hid("H2"))
        .await
        .unwrap();
    assert_eq!(transfer.status, TransferStatus::Pending);
    assert_eq!(transfer.source_hospital, hid("H1"));
    assert!(transfer.checksum_original.is_some());
    assert!(transfer.checksum_verified.is_none());

    let result = manager.verify(&ctx("H2"), transfer.transfer_id).await.unwrap();
    assert_eq!(result.outcome, TransferOutcome::Verified);
    assert_eq!(result.transfer.status, TransferStatus::Verified);
    assert_eq!(
        result.transfer.checksum_verified,
        transfer.checksum_original
    );
    assert_eq!(result.report.sessions_hashed, 2);

    let grant = result.grant.expect("verified transfer creates a grant");
    assert_eq!(grant.hospital_id, hid("H2"));
    assert_eq!(grant.reason, grant_reason("Cardiology"));
    assert_eq!(grant.transfer_id, Some(transfer.transfer_id));
    assert!(grant.is_active);

    let stored = manager.get(transfer.transfer_id).await.unwrap();
    assert_eq!(stored.status, TransferStatus::Verified);

    let grants = manager.access_grants(&pid(ANA)).await.unwrap();
    assert_eq!(grants.len(), 1);
}

#[tokio::test]
async fn test_record_drift_fails_verification_without_grant() {
    let store = Arc::new(demo_store());
    let manager = manager_for(store.clone());

    let transfer = manager
        .initiate(&ctx("H1"), &pid(ANA), CARDIOLOGY, &hid("H3"))
        .await
        .unwrap();

    // A session recorded after initiation changes the payload
    store
        .upsert_treatment_session(
            TreatmentSession::new(
                SessionId::new("S-1003").unwrap(),
                pid(ANA),
                hid("H1"),
                TreatmentId::new(13),
                Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap(),
            )
            .with_notes("Follow-up ECG"),
        )
        .await;

    let result = manager.verify(&ctx("H3"), transfer.transfer_id).await.unwrap();
    assert_eq!(result.outcome, TransferOutcome::ChecksumMismatch);
    assert_eq!(result.transfer.status, TransferStatus::Failed);
    assert_ne!(result.transfer.checksum_verified, transfer.checksum_original);
    assert!(result.grant.is_none());
    assert!(!result.report.is_success());

    assert!(manager.access_grants(&pid(ANA)).await.unwrap().is_empty());
    assert_eq!(
        manager.get(transfer.transfer_id).await.unwrap().status,
        TransferStatus::Failed
    );
}

#[tokio::test]
async fn test_notes_edit_is_detected() {
    let store = Arc::new(demo_store());
    let manager = manager_for(store.clone());

    let transfer = manager
        .initiate(&ctx("H1"), &pid(ANA), CARDIOLOGY, &hid("H2"))
        .await
        .unwrap();

    let mut sessions = store.treatment_sessions(&pid(ANA)).await.unwrap();
    let edited = sessions.remove(0).with_notes("Amended after transfer");
    store.upsert_treatment_session(edited).await;

    let result = manager.verify(&ctx("H2"), transfer.transfer_id).await.unwrap();
    assert_eq!(result.outcome, TransferOutcome::ChecksumMismatch);
}

#[tokio::test]
async fn test_reject_pending_transfer() {
    let store = Arc::new(demo_store());
    let manager = manager_for(store.clone());

    let transfer = manager
        .initiate(&ctx("H1"), &pid(ANA), CARDIOLOGY, &hid("H2"))
        .await
        .unwrap();

    let rejected = manager.reject(&ctx("H1"), transfer.transfer_id).await.unwrap();
    assert_eq!(rejected.status, TransferStatus::Rejected);
    assert!(rejected.checksum_verified.is_none());
    assert!(manager.access_grants(&pid(ANA)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_settled_transfers_cannot_move_again() {
    let store = Arc::new(demo_store());
    let manager = manager_for(store.clone());

    let verified = manager
        .initiate(&ctx("H1"), &pid(ANA), CARDIOLOGY, &hid("H2"))
        .await
        .unwrap();
    manager.verify(&ctx("H2"), verified.transfer_id).await.unwrap();

    let rejected = manager
        .initiate(&ctx("H1"), &pid(ANA), CARDIOLOGY, &hid("H3"))
        .await
        .unwrap();
    manager.reject(&ctx("H1"), rejected.transfer_id).await.unwrap();

    for (id, from) in [
        (verified.transfer_id, TransferStatus::Verified),
        (rejected.transfer_id, TransferStatus::Rejected),
    ] {
        let err = manager.verify(&ctx("H2"), id).await.unwrap_err();
        assert!(matches!(
            err,
            CareLinkError::Transfer(TransferError::InvalidTransition { from: f, .. }) if f == from
        ));

        let err = manager.reject(&ctx("H1"), id).await.unwrap_err();
        assert!(matches!(
            err,
            CareLinkError::Transfer(TransferError::InvalidTransition { .. })
        ));
    }

    assert_eq!(manager.access_grants(&pid(ANA)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_transfer_is_not_found() {
    let manager = manager_for(Arc::new(demo_store()));
    let err = manager
        .verify(&ctx("H2"), TransferId::new(999))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CareLinkError::Transfer(TransferError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_initiate_validation_writes_nothing() {
    let store = Arc::new(demo_store());
    let manager = manager_for(store.clone());

    let cases = [
        // Target is the patient's own hospital
        (ctx("H1"), pid(ANA), CARDIOLOGY, hid("H1")),
        // Target does not offer oncology
        (ctx("H1"), pid(ANA), ONCOLOGY, hid("H2")),
        // Unknown target
        (ctx("H1"), pid(ANA), CARDIOLOGY, hid("H9")),
        // Unknown department
        (ctx("H1"), pid(ANA), carelink::domain::DepartmentId::new(77), hid("H2")),
        // Caller acts for a hospital the patient is not registered at
        (ctx("H2"), pid(ANA), CARDIOLOGY, hid("H3")),
        // Unknown patient
        (ctx("H1"), carelink::domain::PatientId::generate(), CARDIOLOGY, hid("H2")),
    ];

    for (caller, patient, department, target) in cases {
        let err = manager
            .initiate(&caller, &patient, department, &target)
            .await
            .unwrap_err();
        assert!(
            matches!(err, CareLinkError::Validation(_)),
            "unexpected error {err:?}"
        );
    }

    assert!(manager.list(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_source_scope_can_be_disabled() {
    let store = Arc::new(demo_store());
    let manager = TransferManager::new(
        store,
        TransferConfig {
            enforce_source_scope: false,
        },
    );

    let transfer = manager
        .initiate(&ctx("H4"), &pid(ANA), CARDIOLOGY, &hid("H2"))
        .await
        .unwrap();
    // Source is still the patient's hospital, not the caller's
    assert_eq!(transfer.source_hospital, hid("H1"));
}

#[tokio::test]
async fn test_patient_without_history_verifies() {
    let manager = manager_for(Arc::new(demo_store()));

    let transfer = manager
        .initiate(&ctx("H2"), &pid(TOMAS), CARDIOLOGY, &hid("H3"))
        .await
        .unwrap();
    let result = manager.verify(&ctx("H3"), transfer.transfer_id).await.unwrap();
    assert_eq!(result.outcome, TransferOutcome::Verified);
    assert_eq!(result.report.sessions_hashed, 0);
}

#[tokio::test]
async fn test_failed_commit_leaves_transfer_pending() {
    let store = Arc::new(FlakyStore::new(demo_store()));
    let manager = manager_for(store.clone());

    let transfer = manager
        .initiate(&ctx("H1"), &pid(ANA), CARDIOLOGY, &hid("H2"))
        .await
        .unwrap();

    store.fail_commits(true);
    let err = manager
        .verify(&ctx("H2"), transfer.transfer_id)
        .await
        .unwrap_err();
    assert!(matches!(err, CareLinkError::Persistence(_)));

    let stored = manager.get(transfer.transfer_id).await.unwrap();
    assert_eq!(stored.status, TransferStatus::Pending);
    assert!(stored.checksum_verified.is_none());
    assert!(manager.access_grants(&pid(ANA)).await.unwrap().is_empty());

    // The transfer can still be settled once the store recovers
    store.fail_commits(false);
    let result = manager.verify(&ctx("H2"), transfer.transfer_id).await.unwrap();
    assert_eq!(result.outcome, TransferOutcome::Verified);
}

#[tokio::test]
async fn test_failed_insert_leaves_no_transfer() {
    let store = Arc::new(FlakyStore::new(demo_store()));
    let manager = manager_for(store.clone());

    store.fail_transfer_inserts(true);
    let err = manager
        .initiate(&ctx("H1"), &pid(ANA), CARDIOLOGY, &hid("H2"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, CareLinkError::Persistence(_)),
        "unexpected error {err:?}"
    );

    assert!(manager.list(None).await.unwrap().is_empty());
    assert!(store.inner.list_transfers(None).await.unwrap().is_empty());
    assert!(manager.access_grants(&pid(ANA)).await.unwrap().is_empty());

    // Nothing half-written blocks a retry once the store recovers
    store.fail_transfer_inserts(false);
    let transfer = manager
        .initiate(&ctx("H1"), &pid(ANA), CARDIOLOGY, &hid("H2"))
        .await
        .unwrap();
    assert_eq!(transfer.status, TransferStatus::Pending);
    assert_eq!(manager.list(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_filters_by_hospital() {
    let manager = manager_for(Arc::new(demo_store()));

    manager
        .initiate(&ctx("H1"), &pid(ANA), CARDIOLOGY, &hid("H2"))
        .await
        .unwrap();
    manager
        .initiate(&ctx("H2"), &pid(TOMAS), CARDIOLOGY, &hid("H3"))
        .await
        .unwrap();

    assert_eq!(manager.list(None).await.unwrap().len(), 2);
    assert_eq!(manager.list(Some(&hid("H2"))).await.unwrap().len(), 2);
    assert_eq!(manager.list(Some(&hid("H1"))).await.unwrap().len(), 1);
    assert!(manager.list(Some(&hid("H4"))).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_deleted_session_is_detected() {
    let store = Arc::new(demo_store());
    let manager = manager_for(store.clone());

    let transfer = manager
        .initiate(&ctx("H1"), &pid(ANA), CARDIOLOGY, &hid("H2"))
        .await
        .unwrap();

    assert!(
        store
            .remove_treatment_session(&SessionId::new("S-1002").unwrap())
            .await
    );

    let result = manager.verify(&ctx("H2"), transfer.transfer_id).await.unwrap();
    assert_eq!(result.outcome, TransferOutcome::ChecksumMismatch);
    assert_eq!(result.report.sessions_hashed, 1);
}
