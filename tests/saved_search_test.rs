mod common;

use common::*;
use marketplace_search::saved::{
    CreateSavedSearch, InMemorySavedSearchStore, SavedSearchManager, UpdateSavedSearch,
};
use marketplace_search::search::{FilterRequest, SearchRequest};
use marketplace_search::AppError;
use std::sync::Arc;
use uuid::Uuid;

fn manager(h: &TestHarness) -> SavedSearchManager {
    SavedSearchManager::new(Arc::new(InMemorySavedSearchStore::new()), h.service.clone())
}

fn create_request(name: &str, query: &str) -> CreateSavedSearch {
    CreateSavedSearch {
        name: name.to_string(),
        query: query.to_string(),
        entity_types: Vec::new(),
        filters: FilterRequest::default(),
    }
}

#[tokio::test]
async fn test_saved_search_executes_like_the_live_query() {
    let h = harness();
    let mut entities = vec![
        asset("logo alpha", &["logo"]),
        asset("logo beta", &["logo"]),
        asset("mascot", &[]),
    ];
    age_days(&mut entities[1], 5);
    seed(&h.index, &entities).await;

    let me = viewer();
    let manager = manager(&h);

    let saved = manager
        .create(&me, &create_request("logos", "logo"))
        .await
        .unwrap();

    let live = h
        .service
        .search(&me, &SearchRequest::new("logo"))
        .await
        .unwrap();
    let replayed = manager.execute(&me, &saved.id).await.unwrap();

    let live_ids: Vec<Uuid> = live.results.iter().map(|r| r.id).collect();
    let replayed_ids: Vec<Uuid> = replayed.results.iter().map(|r| r.id).collect();
    assert_eq!(live_ids, replayed_ids);
    assert_eq!(replayed.pagination.total, 2);
}

#[tokio::test]
async fn test_execute_reflects_index_changes_since_save() {
    let h = harness();
    seed(&h.index, &[asset("logo alpha", &[])]).await;

    let me = viewer();
    let manager = manager(&h);
    let saved = manager
        .create(&me, &create_request("logos", "logo"))
        .await
        .unwrap();

    assert_eq!(
        manager.execute(&me, &saved.id).await.unwrap().pagination.total,
        1
    );

    seed(&h.index, &[asset("logo beta", &[])]).await;
    assert_eq!(
        manager.execute(&me, &saved.id).await.unwrap().pagination.total,
        2
    );
}

#[tokio::test]
async fn test_deleted_saved_search_is_gone() {
    let h = harness();
    let me = viewer();
    let manager = manager(&h);

    let saved = manager
        .create(&me, &create_request("logos", "logo"))
        .await
        .unwrap();
    manager.delete(&me, &saved.id).await.unwrap();

    let err = manager.execute(&me, &saved.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(manager.list(&me).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_foreign_saved_search_is_indistinguishable_from_absent() {
    let h = harness();
    let owner = viewer();
    let stranger = viewer();
    let manager = manager(&h);

    let saved = manager
        .create(&owner, &create_request("logos", "logo"))
        .await
        .unwrap();

    let foreign = manager.execute(&stranger, &saved.id).await.unwrap_err();
    let absent = manager.execute(&stranger, &Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(foreign, AppError::NotFound(_)));
    assert!(matches!(absent, AppError::NotFound(_)));
    assert_eq!(foreign.error_code(), absent.error_code());
    assert!(manager.list(&stranger).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_partial_update_keeps_unspecified_fields() {
    let h = harness();
    let me = viewer();
    let manager = manager(&h);

    let mut request = create_request("logos", "logo");
    request.entity_types = vec!["asset".to_string()];
    let saved = manager.create(&me, &request).await.unwrap();

    let update = UpdateSavedSearch {
        name: Some("renamed".to_string()),
        ..UpdateSavedSearch::default()
    };
    let updated = manager.update(&me, &saved.id, &update).await.unwrap();

    assert_eq!(updated.name, "renamed");
    assert_eq!(updated.query, "logo");
    assert_eq!(updated.entity_types, saved.entity_types);
    assert!(updated.updated_at >= saved.updated_at);
}

#[tokio::test]
async fn test_create_rejects_unknown_entity_type() {
    let h = harness();
    let me = viewer();
    let manager = manager(&h);

    let mut request = create_request("bad", "logo");
    request.entity_types = vec!["invoice".to_string()];
    let err = manager.create(&me, &request).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}
