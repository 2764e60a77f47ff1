//! `PgUserStore` against a real `PostgreSQL` database.
//!
//! These tests require `ROSTER_TEST_DATABASE_URL` pointing at a scratch
//! database. Run with: `cargo test -p roster-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use serde_json::json;

use roster_core::{
    CreateUserRequest, FromPayload, NewUser, Paging, PatchUserRequest, Sort, UserListQuery,
};
use roster_integration_tests::{test_pool, unique_email, unique_token, user_payload};
use roster_server::db::{PgUserStore, RepositoryError, UserStore};

fn new_user(name: &str, email: &str, company: &str) -> NewUser {
    CreateUserRequest::from_payload(&user_payload(name, email, company))
        .unwrap()
        .into_inner()
}

#[tokio::test]
#[ignore = "Requires ROSTER_TEST_DATABASE_URL"]
async fn test_create_get_round_trip() {
    let store = PgUserStore::new(test_pool().await);
    let input = new_user("Leanne Graham", &unique_email(), "Romaguera-Crona");

    let created = store.create(input.clone()).await.unwrap();
    assert!(created.id.as_i32() > 0);
    assert_eq!(created.email, input.email);
    assert_eq!(created.address, input.address);
    assert_eq!(created.created_at, created.updated_at);

    let fetched = store.get(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
#[ignore = "Requires ROSTER_TEST_DATABASE_URL"]
async fn test_unique_email_under_concurrency() {
    let store = Arc::new(PgUserStore::new(test_pool().await));
    let email = unique_email();

    let a = tokio::spawn({
        let store = Arc::clone(&store);
        let input = new_user("A", &email, "Acme");
        async move { store.create(input).await }
    });
    let b = tokio::spawn({
        let store = Arc::clone(&store);
        let input = new_user("B", &email, "Acme");
        async move { store.create(input).await }
    });

    let results = [a.await.unwrap(), b.await.unwrap()];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().any(|r| matches!(
        r,
        Err(RepositoryError::Conflict { field, .. }) if field == "email"
    )));
}

#[tokio::test]
#[ignore = "Requires ROSTER_TEST_DATABASE_URL"]
async fn test_patch_merges_address_in_place() {
    let store = PgUserStore::new(test_pool().await);
    let created = store
        .create(new_user("Ervin Howell", &unique_email(), "Deckow-Crist"))
        .await
        .unwrap();

    let patch = PatchUserRequest::from_payload(&json!({
        "company": "X",
        "address": { "city": "Wisokyburgh", "geo": { "lat": 5, "lng": 6 } }
    }))
    .unwrap()
    .into_inner();

    let patched = store.patch(created.id, patch).await.unwrap().unwrap();
    assert_eq!(patched.company, "X");
    assert_eq!(patched.name, created.name);
    assert_eq!(patched.address.city, "Wisokyburgh");
    assert_eq!(patched.address.street, created.address.street);
    assert!((patched.address.geo.lat - 5.0).abs() < f64::EPSILON);
    assert!(patched.updated_at >= created.updated_at);
    assert_eq!(patched.created_at, created.created_at);
}

#[tokio::test]
#[ignore = "Requires ROSTER_TEST_DATABASE_URL"]
async fn test_list_search_sort_and_page() {
    let store = PgUserStore::new(test_pool().await);
    let company = format!("Crona_{}%", unique_token());
    for name in ["Carol", "Alice", "Bob"] {
        store
            .create(new_user(name, &unique_email(), &company))
            .await
            .unwrap();
    }

    let query = UserListQuery {
        search: Some(company.to_lowercase()),
        sort: Sort::parse("-name"),
        paging: Some(Paging { page: 1, limit: 2 }),
    };
    let page = store.list(&query).await.unwrap();
    assert_eq!(page.total, Some(3));
    let names: Vec<&str> = page.users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["Carol", "Bob"]);
}

#[tokio::test]
#[ignore = "Requires ROSTER_TEST_DATABASE_URL"]
async fn test_delete_and_missing_rows() {
    let store = PgUserStore::new(test_pool().await);
    let created = store
        .create(new_user("Gone", &unique_email(), "Acme"))
        .await
        .unwrap();

    assert!(store.delete(created.id).await.unwrap());
    assert!(!store.delete(created.id).await.unwrap());
    assert!(store.get(created.id).await.unwrap().is_none());
    assert!(
        store
            .replace(created.id, new_user("Gone", &unique_email(), "Acme"))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
#[ignore = "Requires ROSTER_TEST_DATABASE_URL"]
async fn test_seed_rolls_back_on_conflict() {
    let store = PgUserStore::new(test_pool().await);
    let taken = unique_email();
    store
        .create(new_user("Existing", &taken, "Acme"))
        .await
        .unwrap();

    let fresh = unique_email();
    let result = store
        .seed(
            vec![
                new_user("Fresh", &fresh, "Acme"),
                new_user("Clash", &taken, "Acme"),
            ],
            false,
        )
        .await;
    assert!(matches!(result, Err(RepositoryError::Conflict { .. })));

    let query = UserListQuery {
        search: Some(fresh),
        ..UserListQuery::default()
    };
    assert!(store.list(&query).await.unwrap().users.is_empty());
}
