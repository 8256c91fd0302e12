use super::test_util::{TestDatabase, send};
use crate::api::test_util::deserialize_body;
use crate::app_env::TodoStorage;
use crate::dto::todo::Todo;
use crate::persistence::USERS_COLLECTION;
use crate::routing_utils::BasicErrorResponse;
use axum::http::{Method, StatusCode};
use mongodb::bson::{Document, doc};
use serde_json::json;

fn todo(id: &str, text: &str) -> Todo {
    Todo {
        id: id.to_owned(),
        todo: text.to_owned(),
    }
}

#[tokio::test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
async fn embedded_todo_lifecycle() {
    let test_db = TestDatabase::create().await;
    let router = test_db.router(TodoStorage::Embedded);

    let registered = send(&router, Method::POST, "/users", Some(json!({ "uid": "u1" }))).await;
    assert_eq!(StatusCode::CREATED, registered.status());

    for (id, text) in [("t1", "buy milk"), ("t2", "walk dog")] {
        let added = send(
            &router,
            Method::PUT,
            "/todo",
            Some(json!({ "uid": "u1", "todoData": { "id": id, "todo": text } })),
        )
        .await;
        assert_eq!(StatusCode::CREATED, added.status());
    }

    let duplicate = send(
        &router,
        Method::PUT,
        "/todo",
        Some(json!({ "uid": "u1", "todoData": { "id": "t1", "todo": "again" } })),
    )
    .await;
    assert_eq!(StatusCode::CONFLICT, duplicate.status());

    let updated = send(
        &router,
        Method::PUT,
        "/todos/t1/u1",
        Some(json!({ "todo": "buy oat milk" })),
    )
    .await;
    assert_eq!(StatusCode::OK, updated.status());

    let fetched = send(&router, Method::GET, "/todo?id=t1&uid=u1", None).await;
    assert_eq!(StatusCode::OK, fetched.status());
    let fetched_body: Todo = deserialize_body(fetched.into_body()).await;
    assert_eq!(todo("t1", "buy oat milk"), fetched_body);

    let deleted = send(&router, Method::DELETE, "/todos/u1", Some(json!("t1"))).await;
    assert_eq!(StatusCode::OK, deleted.status());
    let deleted_again = send(&router, Method::DELETE, "/todos/u1", Some(json!({ "id": "t1" }))).await;
    assert_eq!(StatusCode::OK, deleted_again.status());

    let listed = send(&router, Method::GET, "/todos/u1", None).await;
    assert_eq!(StatusCode::OK, listed.status());
    let listed_body: Vec<Todo> = deserialize_body(listed.into_body()).await;
    assert_eq!(vec![todo("t2", "walk dog")], listed_body);

    test_db.drop_db().await;
}

#[tokio::test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
async fn concurrent_append_and_update_both_land() {
    let test_db = TestDatabase::create().await;
    let router = test_db.router(TodoStorage::Embedded);

    send(&router, Method::POST, "/users", Some(json!({ "uid": "u1" }))).await;
    send(
        &router,
        Method::PUT,
        "/todo",
        Some(json!({ "uid": "u1", "todoData": { "id": "t1", "todo": "buy milk" } })),
    )
    .await;

    let (appended, updated) = tokio::join!(
        send(
            &router,
            Method::PUT,
            "/todo",
            Some(json!({ "uid": "u1", "todoData": { "id": "t2", "todo": "walk dog" } })),
        ),
        send(
            &router,
            Method::PUT,
            "/todos/t1/u1",
            Some(json!({ "todo": "buy oat milk" })),
        ),
    );
    assert_eq!(StatusCode::CREATED, appended.status());
    assert_eq!(StatusCode::OK, updated.status());

    let listed = send(&router, Method::GET, "/todos/u1", None).await;
    let listed_body: Vec<Todo> = deserialize_body(listed.into_body()).await;
    assert_eq!(
        vec![todo("t1", "buy oat milk"), todo("t2", "walk dog")],
        listed_body
    );

    test_db.drop_db().await;
}

#[tokio::test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
async fn unknown_user_and_missing_params() {
    let test_db = TestDatabase::create().await;
    let router = test_db.router(TodoStorage::Embedded);

    let listed = send(&router, Method::GET, "/todos/ghost", None).await;
    assert_eq!(StatusCode::NOT_FOUND, listed.status());

    let added = send(
        &router,
        Method::PUT,
        "/todo",
        Some(json!({ "uid": "ghost", "todoData": { "todo": "buy milk" } })),
    )
    .await;
    assert_eq!(StatusCode::NOT_FOUND, added.status());

    let no_owner = send(&router, Method::GET, "/todos/", None).await;
    assert_eq!(StatusCode::BAD_REQUEST, no_owner.status());

    let no_query = send(&router, Method::GET, "/todo?uid=u1", None).await;
    assert_eq!(StatusCode::BAD_REQUEST, no_query.status());

    let no_selector = send(&router, Method::DELETE, "/todos/u1", None).await;
    assert_eq!(StatusCode::BAD_REQUEST, no_selector.status());
    let no_selector_body: BasicErrorResponse = deserialize_body(no_selector.into_body()).await;
    assert_eq!("missing_input", no_selector_body.error_code);

    test_db.drop_db().await;
}

#[tokio::test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
async fn legacy_numeric_ids_are_reachable() {
    let test_db = TestDatabase::create().await;
    let router = test_db.router(TodoStorage::Embedded);
    test_db
        .database()
        .collection::<Document>(USERS_COLLECTION)
        .insert_one(doc! {
            "uid": "u1",
            "todos": [{ "id": 7, "todo": "legacy" }, { "id": "8", "todo": "text id" }],
        })
        .await
        .expect("seeding a legacy user should succeed");

    let fetched = send(&router, Method::GET, "/todo?id=7&uid=u1", None).await;
    assert_eq!(StatusCode::OK, fetched.status());
    let fetched_body: Todo = deserialize_body(fetched.into_body()).await;
    assert_eq!(todo("7", "legacy"), fetched_body);

    let duplicate = send(
        &router,
        Method::PUT,
        "/todo",
        Some(json!({ "uid": "u1", "todoData": { "id": "7", "todo": "again" } })),
    )
    .await;
    assert_eq!(StatusCode::CONFLICT, duplicate.status());

    let updated = send(
        &router,
        Method::PUT,
        "/todos/7/u1",
        Some(json!({ "todo": "legacy, edited" })),
    )
    .await;
    assert_eq!(StatusCode::OK, updated.status());

    let deleted = send(&router, Method::DELETE, "/todos/u1", Some(json!(7))).await;
    assert_eq!(StatusCode::OK, deleted.status());

    let listed = send(&router, Method::GET, "/todos/u1", None).await;
    let listed_body: Vec<Todo> = deserialize_body(listed.into_body()).await;
    assert_eq!(vec![todo("8", "text id")], listed_body);

    test_db.drop_db().await;
}
