use axum::body::{self, Body, Bytes};
use serde::de::DeserializeOwned;

async fn body_bytes(response_body: Body) -> Bytes {
    body::to_bytes(response_body, usize::MAX)
        .await
        .expect("response body should be readable")
}

/// Reads a response body and parses it as JSON into [T]. Panics, failing the test, when the
/// body can't be read or doesn't have the expected shape.
pub async fn deserialize_body<T: DeserializeOwned>(response_body: Body) -> T {
    let bytes = body_bytes(response_body).await;

    serde_json::from_slice(&bytes).unwrap_or_else(|err| {
        panic!(
            "response body did not match the expected shape: {err}, body was {:?}",
            String::from_utf8_lossy(&bytes)
        )
    })
}

/// Reads a plain text response body
pub async fn body_text(response_body: Body) -> String {
    let bytes = body_bytes(response_body).await;

    String::from_utf8(bytes.to_vec()).expect("response body should be UTF-8")
}
