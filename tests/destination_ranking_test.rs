//! Integration tests for destination ranking

mod common;

use carelink::core::network::{ConnectionManager, DestinationScorer};
use carelink::domain::{CareLinkError, DepartmentId, LinkMetrics};
use common::*;
use std::sync::Arc;

#[tokio::test]
async fn test_rank_orders_by_link_score() {
    let scorer = DestinationScorer::new(Arc::new(demo_store()), 4);

    let ranked = scorer
        .rank_destinations(&hid("H1"), CARDIOLOGY)
        .await
        .unwrap();

    let order: Vec<&str> = ranked
        .iter()
        .map(|r| r.hospital.hospital_id.as_str())
        .collect();
    assert_eq!(order, vec!["H3", "H2", "H4"]);

    assert!((ranked[0].score - 0.2).abs() < 1e-12);
    assert!((ranked[1].score - 0.05625).abs() < 1e-12);
    assert_eq!(ranked[1].display_score, 0.0563);
    assert_eq!(ranked[2].score, 0.0);
    assert!(ranked[2].link.is_none());
}

#[tokio::test]
async fn test_rank_never_includes_source() {
    let scorer = DestinationScorer::new(Arc::new(demo_store()), 4);
    let ranked = scorer
        .rank_destinations(&hid("H2"), CARDIOLOGY)
        .await
        .unwrap();
    assert!(ranked.iter().all(|r| r.hospital.hospital_id != hid("H2")));
    assert_eq!(ranked[0].hospital.hospital_id, hid("H1"));
}

#[tokio::test]
async fn test_rank_uses_direction_of_link() {
    let store = Arc::new(demo_store());
    let connections = ConnectionManager::new(store.clone());

    // H4 -> H3 exists after this; H3 -> H4 is created with the same metrics
    connections
        .add_connection(
            &ctx("H4"),
            &hid("H4"),
            &hid("H3"),
            LinkMetrics::new(1.0, 1.0, 0.6).unwrap(),
        )
        .await
        .unwrap();

    let scorer = DestinationScorer::new(store, 4);
    let ranked = scorer
        .rank_destinations(&hid("H4"), CARDIOLOGY)
        .await
        .unwrap();
    assert_eq!(ranked[0].hospital.hospital_id, hid("H3"));
    assert!((ranked[0].score - 0.2).abs() < 1e-12);
    assert!(ranked[1..].iter().all(|r| r.score == 0.0));
}

#[tokio::test]
async fn test_rank_ties_keep_store_order() {
    let scorer = DestinationScorer::new(Arc::new(demo_store()), 4);

    // H4 has no links at all, so every candidate scores 0
    let ranked = scorer
        .rank_destinations(&hid("H4"), CARDIOLOGY)
        .await
        .unwrap();
    let order: Vec<&str> = ranked
        .iter()
        .map(|r| r.hospital.hospital_id.as_str())
        .collect();
    assert_eq!(order, vec!["H1", "H2", "H3"]);
}

#[tokio::test]
async fn test_rank_department_without_other_hospitals() {
    let scorer = DestinationScorer::new(Arc::new(demo_store()), 4);
    let ranked = scorer.rank_destinations(&hid("H1"), ONCOLOGY).await.unwrap();
    assert!(ranked.is_empty());
}

#[tokio::test]
async fn test_rank_rejects_unknown_inputs() {
    let scorer = DestinationScorer::new(Arc::new(demo_store()), 4);

    let err = scorer
        .rank_destinations(&hid("H9"), CARDIOLOGY)
        .await
        .unwrap_err();
    assert!(matches!(err, CareLinkError::Validation(_)));

    let err = scorer
        .rank_destinations(&hid("H1"), DepartmentId::new(99))
        .await
        .unwrap_err();
    assert!(matches!(err, CareLinkError::Validation(_)));
}
