use super::test_util::{TestDatabase, send};
use crate::api::test_util::{body_text, deserialize_body};
use crate::app_env::TodoStorage;
use crate::dto::InsertedIdResponse;
use crate::dto::user::UserFoundResponse;
use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
async fn can_create_and_fetch_user() {
    let test_db = TestDatabase::create().await;
    let router = test_db.router(TodoStorage::Embedded);

    let created = send(
        &router,
        Method::POST,
        "/users",
        Some(json!({ "uid": "u1", "name": "First Last" })),
    )
    .await;
    assert_eq!(StatusCode::CREATED, created.status());
    let created_body: InsertedIdResponse = deserialize_body(created.into_body()).await;

    let fetched = send(&router, Method::GET, "/users/u1", None).await;
    assert_eq!(StatusCode::OK, fetched.status());
    let fetched_body: UserFoundResponse = deserialize_body(fetched.into_body()).await;
    assert_eq!(created_body.data, fetched_body.data.id);
    assert_eq!(Some(&json!("First Last")), fetched_body.data.profile.get("name"));
    assert!(fetched_body.data.todos.is_empty());

    test_db.drop_db().await;
}

#[tokio::test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
async fn root_reports_running_and_blank_uid_is_rejected() {
    let test_db = TestDatabase::create().await;
    let router = test_db.router(TodoStorage::Embedded);

    let running = send(&router, Method::GET, "/", None).await;
    assert_eq!(StatusCode::OK, running.status());
    assert_eq!("Todo App is Running...", body_text(running.into_body()).await);

    let no_uid = send(&router, Method::GET, "/users/", None).await;
    assert_eq!(StatusCode::BAD_REQUEST, no_uid.status());

    test_db.drop_db().await;
}

#[tokio::test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
async fn duplicate_uid_is_rejected() {
    let test_db = TestDatabase::create().await;
    let router = test_db.router(TodoStorage::Embedded);

    let first = send(&router, Method::POST, "/users", Some(json!({ "uid": "u1" }))).await;
    assert_eq!(StatusCode::CREATED, first.status());

    let second = send(&router, Method::POST, "/users", Some(json!({ "uid": "u1" }))).await;
    assert_eq!(StatusCode::CONFLICT, second.status());

    test_db.drop_db().await;
}
