//! Helpers shared by handler tests

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value as JsonValue;
use tower::ServiceExt;

use crate::config::Config;
use crate::server;
use crate::state::AppState;
use crate::store::{self, Store};

/// Build the full router over a fresh store at `TEST_DATABASE_URL`
pub async fn setup_test_app() -> (Router, Store) {
    let store = store::connect(&Config::test_database_url())
        .await
        .expect("Failed to open test store");

    let app = server::app(AppState {
        store: store.clone(),
    });
    (app, store)
}

/// Send a request and return the status with the raw body
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<JsonValue>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_string(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

/// POST a post with the given title and return its JSON body
pub async fn create_post(app: &Router, title: &str) -> JsonValue {
    let (status, body) = send(
        app,
        "POST",
        "/blog",
        Some(serde_json::json!({
            "title": title,
            "content": format!("{} content", title),
            "author": {"firstName": "Donald", "lastName": "Duck"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    serde_json::from_slice(&body).unwrap()
}
