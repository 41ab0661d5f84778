use axum::body::{self, Body, Bytes};
use serde::de::DeserializeOwned;

async fn body_bytes(response_body: Body) -> Bytes {
    body::to_bytes(response_body, usize::MAX)
        .await
        .expect("Could not read data from response body!")
}

/// Reads a whole response body and parses it as JSON into the requested type, failing the test
/// if the body can't be read or doesn't have the expected shape
pub async fn deserialize_body<T: DeserializeOwned>(response_body: Body) -> T {
    let bytes = body_bytes(response_body).await;

    serde_json::from_slice(&bytes).unwrap_or_else(|err| {
        panic!("Response body didn't match the expected type ({err}). Received body: {bytes:?}")
    })
}

/// Reads a response body as UTF-8 text
pub async fn body_text(response_body: Body) -> String {
    let bytes = body_bytes(response_body).await;

    String::from_utf8(bytes.to_vec()).expect("Response body was not UTF-8")
}
