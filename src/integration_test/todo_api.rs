use super::test_util::{prepare_db_and_test, send, send_and_decode};
use crate::api::test_util::body_text;
use crate::persistence::db_todo_driven_ports::TODO_COLLECTION;
use crate::routing_utils::BasicErrorResponse;
use axum::http::{Method, StatusCode};
use mongodb::IndexModel;
use mongodb::bson::{Document, doc};
use mongodb::options::IndexOptions;
use serde_json::{Value, json};

fn todo_id(todo: &Value) -> String {
    todo["_id"]
        .as_str()
        .expect("Todo should carry a string _id")
        .to_owned()
}

#[tokio::test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
async fn created_todo_shows_up_in_listing() {
    prepare_db_and_test(|router, _| async move {
        let (status, created): (_, Value) = send_and_decode(
            &router,
            Method::POST,
            "/todos",
            Some(json!({ "text": "Buy milk", "pinned": false })),
        )
        .await;
        assert_eq!(StatusCode::CREATED, status);
        let created_id = todo_id(&created);
        assert_eq!(24, created_id.len());
        assert!(created.get("label").is_none());

        let (status, listed): (_, Vec<Value>) =
            send_and_decode(&router, Method::GET, "/todos", None).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(vec![created], listed);
    })
    .await;
}

#[tokio::test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
async fn pages_split_the_collection_in_insertion_order() {
    prepare_db_and_test(|router, _| async move {
        let batch: Vec<Value> = (1..=5).map(|n| json!({ "text": format!("todo {n}") })).collect();
        let (status, created): (_, Vec<Value>) =
            send_and_decode(&router, Method::POST, "/todos/bulk", Some(Value::Array(batch))).await;
        assert_eq!(StatusCode::CREATED, status);
        let created_ids: Vec<String> = created.iter().map(todo_id).collect();

        let mut paged_ids = Vec::new();
        for page in 1..=3 {
            let (status, listed): (_, Vec<Value>) = send_and_decode(
                &router,
                Method::GET,
                &format!("/todos?page={page}&limit=2"),
                None,
            )
            .await;
            assert_eq!(StatusCode::OK, status);
            assert!(listed.len() <= 2);
            paged_ids.extend(listed.iter().map(todo_id));
        }

        assert_eq!(created_ids, paged_ids);
    })
    .await;
}

#[tokio::test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
async fn bulk_create_is_all_or_nothing() {
    prepare_db_and_test(|router, _| async move {
        let (status, created): (_, Vec<Value>) = send_and_decode(
            &router,
            Method::POST,
            "/todos/bulk",
            Some(json!([{ "text": "a" }, { "text": "b" }, { "label": "c" }])),
        )
        .await;
        assert_eq!(StatusCode::CREATED, status);
        let mut ids: Vec<String> = created.iter().map(todo_id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(3, ids.len());

        let (status, error): (_, BasicErrorResponse) = send_and_decode(
            &router,
            Method::POST,
            "/todos/bulk",
            Some(json!([{ "text": "fine" }, { "label": "x".repeat(101) }])),
        )
        .await;
        assert_eq!(StatusCode::BAD_REQUEST, status);
        assert!(error.message.contains("index 1"));

        let (_, listed): (_, Vec<Value>) =
            send_and_decode(&router, Method::GET, "/todos?limit=100", None).await;
        assert_eq!(3, listed.len());
    })
    .await;
}

#[tokio::test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
async fn failed_bulk_insert_leaves_no_partial_batch() {
    prepare_db_and_test(|router, database| async move {
        database
            .collection::<Document>(TODO_COLLECTION)
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "text": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
                None,
            )
            .await
            .expect("unique index on text should be created");

        // The third todo collides with the first after two inserts have already landed
        let (status, error): (_, BasicErrorResponse) = send_and_decode(
            &router,
            Method::POST,
            "/todos/bulk",
            Some(json!([{ "text": "same" }, { "text": "other" }, { "text": "same" }])),
        )
        .await;
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);
        assert_eq!("Could not access data to complete your request", error.message);

        let stored = database
            .collection::<Document>(TODO_COLLECTION)
            .count_documents(None, None)
            .await
            .expect("todos should be countable");
        assert_eq!(0, stored);
    })
    .await;
}

#[tokio::test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
async fn repeated_paging_params_use_the_first_value() {
    prepare_db_and_test(|router, _| async move {
        let batch: Vec<Value> = (1..=3).map(|n| json!({ "text": format!("todo {n}") })).collect();
        let (status, created): (_, Vec<Value>) =
            send_and_decode(&router, Method::POST, "/todos/bulk", Some(Value::Array(batch))).await;
        assert_eq!(StatusCode::CREATED, status);

        let (status, listed): (_, Vec<Value>) = send_and_decode(
            &router,
            Method::GET,
            "/todos?page=2&page=1&limit=2&limit=50",
            None,
        )
        .await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(vec![created[2].clone()], listed);
    })
    .await;
}

#[tokio::test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
async fn update_merges_and_reports_missing_todos() {
    prepare_db_and_test(|router, _| async move {
        let (_, created): (_, Value) = send_and_decode(
            &router,
            Method::POST,
            "/todos",
            Some(json!({ "text": "Walk the dog", "label": "chores" })),
        )
        .await;
        let created_id = todo_id(&created);

        let (status, updated): (_, Value) = send_and_decode(
            &router,
            Method::PUT,
            &format!("/todos/{created_id}"),
            Some(json!({ "pinned": true })),
        )
        .await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(
            json!({ "_id": created_id, "text": "Walk the dog", "label": "chores", "pinned": true }),
            updated
        );

        let (status, _) = send(
            &router,
            Method::PUT,
            "/todos/000000000000000000000000",
            Some(json!({ "pinned": true })),
        )
        .await;
        assert_eq!(StatusCode::NOT_FOUND, status);

        let (status, _) = send(
            &router,
            Method::PUT,
            "/todos/not-an-id",
            Some(json!({ "pinned": true })),
        )
        .await;
        assert_eq!(StatusCode::BAD_REQUEST, status);
    })
    .await;
}

#[tokio::test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
async fn delete_is_idempotent() {
    prepare_db_and_test(|router, _| async move {
        let (_, created): (_, Value) =
            send_and_decode(&router, Method::POST, "/todos", Some(json!({ "text": "Temp" }))).await;
        let delete_uri = format!("/todos/{}", todo_id(&created));

        for _ in 0..2 {
            let (status, body): (_, Value) =
                send_and_decode(&router, Method::DELETE, &delete_uri, None).await;
            assert_eq!(StatusCode::OK, status);
            assert_eq!(json!({ "message": "Todo deleted" }), body);
        }

        let (_, listed): (_, Vec<Value>) =
            send_and_decode(&router, Method::GET, "/todos", None).await;
        assert!(listed.is_empty());
    })
    .await;
}

#[tokio::test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
async fn malformed_json_is_rejected() {
    prepare_db_and_test(|router, _| async move {
        let (status, error): (_, BasicErrorResponse) = send_and_decode(
            &router,
            Method::POST,
            "/todos",
            Some(json!({ "pinned": "yes" })),
        )
        .await;
        assert_eq!(StatusCode::BAD_REQUEST, status);
        assert!(error.message.starts_with("The passed request body"));
    })
    .await;
}

#[tokio::test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
async fn service_routes_respond() {
    prepare_db_and_test(|router, _| async move {
        let (status, banner) = send(&router, Method::GET, "/", None).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!("This is a todo app", body_text(banner).await);

        let (status, health): (_, Value) =
            send_and_decode(&router, Method::GET, "/health", None).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(json!({ "status": "ok" }), health);

        let (status, _) = send(&router, Method::GET, "/api-docs/openapi.json", None).await;
        assert_eq!(StatusCode::OK, status);
    })
    .await;
}
