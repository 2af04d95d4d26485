//! Conflict detection: mismatch emission, pending uniqueness, snapshots

mod common;

use common::{count, insert_linked_product, insert_unlinked_product, item, test_state};
use shared::sync::{ConflictStatus, ConflictSubject, ConflictType, DELETED_EXTERNAL_NAME};
use sync_server::sync::detector;

#[tokio::test]
async fn quantity_mismatch_captures_both_snapshots() {
    let (state, commerce) = test_state().await;
    insert_linked_product(&state.pool, "prod-a", "Blue Vase", 2500, 5, "ext-1", "var-1", 1).await;
    commerce.set_catalog(vec![item("ext-1", "Blue Vase", 1, "var-1", 2500)]);
    commerce.set_counts(vec![count("var-1", 3)]);

    let report = detector::detect_conflicts(&state, None).await.unwrap();
    assert_eq!(report.detected, 1);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.conflicts.len(), 1);

    let conflict = &report.conflicts[0];
    assert_eq!(conflict.conflict_type, ConflictType::QuantityMismatch);
    assert_eq!(conflict.status, ConflictStatus::Pending);
    assert_eq!(conflict.subject, ConflictSubject::Local("prod-a".to_string()));
    assert_eq!(conflict.system, "commerce");
    assert_eq!(conflict.local_state.quantity, 5);
    assert_eq!(conflict.external_state.quantity, 3);
    assert_eq!(conflict.local_state.name, "Blue Vase");
}

#[tokio::test]
async fn detection_does_not_duplicate_pending_conflicts() {
    let (state, commerce) = test_state().await;
    insert_linked_product(&state.pool, "prod-a", "Blue Vase", 2500, 5, "ext-1", "var-1", 1).await;
    commerce.set_catalog(vec![item("ext-1", "Blue Vase", 1, "var-1", 2500)]);
    commerce.set_counts(vec![count("var-1", 3)]);

    let first = detector::detect_conflicts(&state, None).await.unwrap();
    assert_eq!(first.detected, 1);

    let second = detector::detect_conflicts(&state, None).await.unwrap();
    assert_eq!(second.detected, 0);
    assert_eq!(second.skipped, 1);
    assert_eq!(second.conflicts.len(), 1);
}

#[tokio::test]
async fn price_and_quantity_mismatch_are_separate_conflicts() {
    let (state, commerce) = test_state().await;
    insert_linked_product(&state.pool, "prod-a", "Blue Vase", 2500, 5, "ext-1", "var-1", 1).await;
    commerce.set_catalog(vec![item("ext-1", "Blue Vase", 2, "var-1", 3000)]);
    commerce.set_counts(vec![count("var-1", 2)]);

    let report = detector::detect_conflicts(&state, None).await.unwrap();
    assert_eq!(report.detected, 2);

    let mut types: Vec<ConflictType> =
        report.conflicts.iter().map(|c| c.conflict_type).collect();
    types.sort_by_key(|t| t.as_str().to_string());
    assert_eq!(
        types,
        vec![ConflictType::PriceMismatch, ConflictType::QuantityMismatch]
    );
}

#[tokio::test]
async fn missing_external_uses_sentinel_snapshot() {
    let (state, commerce) = test_state().await;
    insert_linked_product(&state.pool, "prod-a", "Blue Vase", 2500, 5, "ext-1", "var-1", 1).await;
    commerce.set_catalog(vec![]);

    let report = detector::detect_conflicts(&state, None).await.unwrap();
    assert_eq!(report.detected, 1);

    let conflict = &report.conflicts[0];
    assert_eq!(conflict.conflict_type, ConflictType::MissingExternal);
    assert_eq!(conflict.external_state.name, DELETED_EXTERNAL_NAME);
    assert_eq!(conflict.external_state.price_cents, 0);
    assert_eq!(conflict.local_state.name, "Blue Vase");
}

#[tokio::test]
async fn missing_local_is_keyed_by_external_id() {
    let (state, commerce) = test_state().await;
    commerce.set_catalog(vec![item("ext-9", "Orphan Item", 4, "var-9", 1200)]);
    commerce.set_counts(vec![count("var-9", 6)]);

    let report = detector::detect_conflicts(&state, None).await.unwrap();
    assert_eq!(report.detected, 1);

    let conflict = &report.conflicts[0];
    assert_eq!(conflict.conflict_type, ConflictType::MissingLocal);
    assert_eq!(conflict.subject, ConflictSubject::External("ext-9".to_string()));
    assert_eq!(conflict.external_state.name, "Orphan Item");
    assert_eq!(conflict.external_state.price_cents, 1200);
    assert_eq!(conflict.external_state.quantity, 6);
    assert_eq!(conflict.local_state.name, "");
}

#[tokio::test]
async fn unlinked_products_are_not_compared() {
    let (state, commerce) = test_state().await;
    insert_unlinked_product(&state.pool, "prod-u", "Local Only", 9900).await;
    commerce.set_catalog(vec![]);

    let report = detector::detect_conflicts(&state, None).await.unwrap();
    assert_eq!(report.detected, 0);
    assert!(report.conflicts.is_empty());
}

#[tokio::test]
async fn product_filter_scopes_the_sweep() {
    let (state, commerce) = test_state().await;
    insert_linked_product(&state.pool, "prod-a", "Vase A", 2500, 5, "ext-1", "var-1", 1).await;
    insert_linked_product(&state.pool, "prod-b", "Vase B", 1500, 4, "ext-2", "var-2", 1).await;
    commerce.set_catalog(vec![
        item("ext-1", "Vase A", 1, "var-1", 2500),
        item("ext-2", "Vase B", 1, "var-2", 1500),
    ]);
    // Both diverge on quantity
    commerce.set_counts(vec![count("var-1", 1), count("var-2", 1)]);

    let report = detector::detect_conflicts(&state, Some(&["prod-a".to_string()]))
        .await
        .unwrap();
    assert_eq!(report.detected, 1);
    assert_eq!(
        report.conflicts[0].subject,
        ConflictSubject::Local("prod-a".to_string())
    );
}

#[tokio::test]
async fn in_sync_products_emit_nothing() {
    let (state, commerce) = test_state().await;
    insert_linked_product(&state.pool, "prod-a", "Blue Vase", 2500, 5, "ext-1", "var-1", 1).await;
    commerce.set_catalog(vec![item("ext-1", "Blue Vase", 1, "var-1", 2500)]);
    commerce.set_counts(vec![count("var-1", 5)]);

    let report = detector::detect_conflicts(&state, None).await.unwrap();
    assert_eq!(report.detected, 0);
    assert_eq!(report.skipped, 0);
    assert!(report.conflicts.is_empty());
}
