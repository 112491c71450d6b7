//! Shared setup for the integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chirpy_backend_lib::{
    config::Settings,
    router::create_router,
    storage::{FlatFileStorage, MemoryStorage, Storage},
    AppState,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

/// Settings for tests: cheap password hashing, dev platform, assets in `dir`
pub fn test_settings(dir: &TempDir) -> Settings {
    let mut settings = Settings::default();
    settings.auth.jwt_secret = "integration-test-secret".to_string();
    settings.auth.password_cost = 4;
    settings.platform = "dev".to_string();
    settings.polka_key = POLKA_KEY.to_string();
    settings.assets_dir = dir.path().to_path_buf();
    settings.storage.path = dir.path().join("data");
    settings
}

/// A router over in-memory storage. Keep the `TempDir` alive for the test.
pub fn setup_app() -> (Router, Arc<AppState<MemoryStorage>>, TempDir) {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>Welcome to Chirpy</h1>").unwrap();
    let settings = test_settings(&dir);
    build(MemoryStorage::new(), settings, dir)
}

/// Same as [`setup_app`] with a different platform
pub fn setup_app_on(platform: &str) -> (Router, Arc<AppState<MemoryStorage>>, TempDir) {
    let dir = TempDir::new().unwrap();
    let mut settings = test_settings(&dir);
    settings.platform = platform.to_string();
    build(MemoryStorage::new(), settings, dir)
}

/// A router over flat-file storage inside a temp dir
pub fn setup_flat_file_app() -> (Router, Arc<AppState<FlatFileStorage>>, TempDir) {
    let dir = TempDir::new().unwrap();
    let settings = test_settings(&dir);
    let storage = FlatFileStorage::new(&settings.storage.path).unwrap();
    build(storage, settings, dir)
}

fn build<S: Storage + Clone + 'static>(
    storage: S,
    settings: Settings,
    dir: TempDir,
) -> (Router, Arc<AppState<S>>, TempDir) {
    let state = Arc::new(AppState::new(storage, settings).unwrap());
    (create_router(state.clone()), state, dir)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

/// Send one request through the router
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    TestResponse { status, body }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Register a user and return its JSON
pub async fn register(app: &Router, email: &str, password: &str) -> Value {
    let res = send(
        app,
        Method::POST,
        "/api/users",
        None,
        Some(serde_json::json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.text());
    res.json()
}

/// Log in and return the login response JSON
pub async fn login(app: &Router, email: &str, password: &str) -> Value {
    let res = send(
        app,
        Method::POST,
        "/api/login",
        None,
        Some(serde_json::json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.text());
    res.json()
}

/// Register then log in, returning (user id, access token, refresh token)
pub async fn signed_in(app: &Router, email: &str) -> (String, String, String) {
    register(app, email, "pw123").await;
    let body = login(app, email, "pw123").await;
    (
        body["id"].as_str().unwrap().to_string(),
        body["token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
    )
}
