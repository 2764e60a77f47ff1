//! Shared helpers for router-level tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use roster_server::config::ServerConfig;
use roster_server::db::MemoryUserStore;
use roster_server::{AppState, app};

/// A fresh application over an empty in-memory store.
pub fn test_app() -> Router {
    let config = ServerConfig::from_lookup(|key| match key {
        "ROSTER_STORE" => Some("memory".to_string()),
        _ => None,
    })
    .unwrap();
    app(AppState::new(config, Arc::new(MemoryUserStore::new())))
}

/// A valid create payload with the given email.
pub fn user_payload(name: &str, email: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "phone": "1-770-736-8031",
        "company": "Romaguera-Crona",
        "address": {
            "street": "Kulas Light",
            "city": "Gwenborough",
            "zipcode": "92998-3874",
            "geo": { "lat": -37.3159, "lng": 81.1496 }
        }
    })
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

/// Send a JSON request and decode the JSON response.
pub async fn json_request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = send(app, request).await;
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn create_user(app: &Router, name: &str, email: &str) -> Value {
    let (status, body) = json_request(app, "POST", "/api/users", Some(user_payload(name, email))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
