//! Helpers for driving the router in tests.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION, header::CONTENT_TYPE},
};
use bankline_core::{
    account::{AccountStore, InMemoryAccountStore},
    auth::PasswordService,
};
use bankline_shared::JwtService;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{AppState, create_router};

pub const TEST_SECRET: &str = "test-secret-key-for-testing";

/// State over the given store with a cheap hasher.
pub fn state_with_store(accounts: Arc<dyn AccountStore>) -> AppState {
    AppState {
        accounts,
        jwt_service: Arc::new(JwtService::new(TEST_SECRET)),
        password_service: Arc::new(PasswordService::new(1024, 1, 1).unwrap()),
    }
}

/// State backed by a fresh in-memory store.
pub fn test_state() -> AppState {
    state_with_store(Arc::new(InMemoryAccountStore::new()))
}

pub fn test_app() -> (Router, AppState) {
    let state = test_state();
    (create_router(state.clone()), state)
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, token)
        .body(Body::empty())
        .unwrap()
}

pub fn bare_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Sends a request and returns the status with the JSON body (`Null` if empty).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Creates an account through the API and returns its token.
pub async fn create_account(app: &Router, first: &str, last: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/account",
            &json!({ "firstName": first, "lastName": last, "password": password }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body.as_str().unwrap().to_string()
}
