//! Shared helpers for integration tests
//!
//! Builds a client wired against a wiremock backend and mounts canned
//! responses for the token endpoints.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ims_client::{
    ApiClient, AuthGateway, Config, MemoryStorage, SessionController, SessionStore,
};

/// Everything a test needs to drive the client against a mock backend.
pub struct Harness {
    pub api: ApiClient,
    pub storage: Arc<MemoryStorage>,
    pub store: Arc<SessionStore>,
    pub controller: SessionController,
}

/// Install a tracing subscriber once so `RUST_LOG=debug cargo test`
/// shows the client's log output per test.
fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

pub async fn start_backend() -> MockServer {
    init_tracing();
    MockServer::start().await
}

pub fn harness(server: &MockServer) -> Harness {
    harness_with_storage(server, Arc::new(MemoryStorage::new()))
}

/// Build a harness over pre-existing storage, e.g. to simulate an app
/// restart.
pub fn harness_with_storage(server: &MockServer, storage: Arc<MemoryStorage>) -> Harness {
    let config = Config::with_server_url(server.uri());
    let api = ApiClient::new(config);
    let store = Arc::new(
        SessionStore::new(api.clone(), storage.clone()).expect("session store hydrates"),
    );
    let controller = SessionController::new(store.clone(), AuthGateway::new(api.clone()));
    Harness {
        api,
        storage,
        store,
        controller,
    }
}

pub async fn mount_login_success(server: &MockServer, access: &str, refresh: &str) {
    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "access": access, "refresh": refresh })),
        )
        .mount(server)
        .await;
}

pub async fn mount_login_failure(server: &MockServer, status: u16, detail: &str) {
    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "detail": detail })))
        .mount(server)
        .await;
}

pub async fn mount_verify_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/token/verify/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

pub async fn mount_verify_invalid(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/token/verify/"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "detail": "Token is invalid or expired" })),
        )
        .mount(server)
        .await;
}

pub async fn mount_refresh_success(server: &MockServer, access: &str, refresh: Option<&str>) {
    let body = match refresh {
        Some(refresh) => json!({ "access": access, "refresh": refresh }),
        None => json!({ "access": access }),
    };
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_refresh_failure(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_json(json!({ "detail": "Token is invalid or expired" })),
        )
        .mount(server)
        .await;
}
