use crate::{SharedData, db, persistence, routes};
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use dotenv::dotenv;
use futures::FutureExt;
use mongodb::Database;
use rand::{Rng, thread_rng};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::env;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tower::ServiceExt;

/// Connects to the MongoDB instance named by TEST_MONGODB_URI, runs [test_fn] against a router
/// backed by a freshly named database, then drops that database whether or not the test passed.
/// The test also receives the database itself for setup the API can't do.
pub async fn prepare_db_and_test<F, R>(test_fn: F)
where
    F: FnOnce(Router, Database) -> R,
    R: Future<Output = ()>,
{
    if dotenv().is_err() {
        println!("Test is running without .env file.");
    }

    let base_uri = env::var("TEST_MONGODB_URI").expect(
        "You must provide the TEST_MONGODB_URI environment variable as the MongoDB connection string",
    );
    let db_name = format!("todo_test_{}", thread_rng().gen_range(10_000..99_999));
    let (client, database) = db::connect_mongo(&base_uri, Some(&db_name))
        .await
        .expect("Could not build a MongoDB client for the test database");
    db::ping(&database)
        .await
        .expect("Test MongoDB instance is not reachable");

    let router = routes::build_router(Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(database.clone()),
    }));
    let outcome = AssertUnwindSafe(test_fn(router, database.clone())).catch_unwind().await;

    drop_database(&database).await;
    client.shutdown().await;

    if let Err(test_panic) = outcome {
        panic::resume_unwind(test_panic);
    }
}

async fn drop_database(database: &Database) {
    if let Err(db_err) = database.drop(None).await {
        println!(
            "Failed to drop test database {}, please remove it manually. Error: {db_err}",
            database.name()
        );
    }
}

/// Sends one request through the router, encoding [body] as JSON when present
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Body) {
    let request_builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json_body) => request_builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json_body.to_string())),
        None => request_builder.body(Body::empty()),
    }
    .expect("Test request should be well formed");

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("Router should always produce a response");

    (response.status(), response.into_body())
}

/// Like [send], but also decodes the response body as JSON
pub async fn send_and_decode<T: DeserializeOwned>(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, T) {
    let (status, response_body) = send(router, method, uri, body).await;

    (
        status,
        crate::api::test_util::deserialize_body(response_body).await,
    )
}
