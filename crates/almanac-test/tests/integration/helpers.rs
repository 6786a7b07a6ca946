#![allow(clippy::expect_used, dead_code)]
//! Test helpers for integration tests.
//!
//! Provides utilities for:
//! - Building a complete service over a fresh or snapshot-backed store
//! - Making HTTP requests
//! - Asserting on responses

use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use salvo::Service;
use salvo::http::StatusCode;
use salvo::http::header::HeaderName;
use salvo::test::{RequestBuilder, ResponseExt, TestClient};
use serde_json::Value;

use almanac_test::app::service_router;
use almanac_test::component::config::{
    AuthConfig, AuthMethod, CalendarConfig, CategoryPalette, LoggingConfig, ProxyAuthConfig,
    ServerConfig, Settings, SingleUserAuthConfig, StorageConfig,
};
use almanac_test::component::store::InMemoryStore;

pub use tracing;

const ORIGIN: &str = "http://127.0.0.1:5800";

/// Settings for a test server using `method` authentication.
#[must_use]
pub fn test_config(method: AuthMethod) -> Settings {
    Settings {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5800,
            serve_origin: None,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        auth: AuthConfig {
            method,
            proxy: Some(ProxyAuthConfig::default()),
            single_user: Some(SingleUserAuthConfig {
                name: "Integration User".to_string(),
                email: "integration@example.com".to_string(),
            }),
        },
        calendar: CalendarConfig::default(),
        categories: CategoryPalette::default(),
        storage: StorageConfig::default(),
    }
}

/// ## Summary
/// A complete service (config, store, API routes) over an empty store.
#[must_use]
pub fn create_test_service(method: AuthMethod) -> Service {
    Service::new(service_router(test_config(method), InMemoryStore::new()))
}

/// ## Summary
/// A complete service whose store persists to `path`, loading it if present.
///
/// ## Panics
/// Panics if an existing snapshot cannot be read.
#[must_use]
pub fn create_snapshot_service(method: AuthMethod, path: PathBuf) -> Service {
    tracing::debug!(path = %path.display(), "Opening snapshot-backed test service");
    let mut settings = test_config(method);
    settings.storage.snapshot_path = Some(path);
    let store = InMemoryStore::from_config(&settings.storage).expect("snapshot store");
    Service::new(service_router(settings, store))
}

/// Test request builder for constructing HTTP requests.
pub struct TestRequest {
    builder: RequestBuilder,
}

impl TestRequest {
    fn new(builder: RequestBuilder) -> Self {
        Self { builder }
    }

    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new(TestClient::get(format!("{ORIGIN}{path}")))
    }

    #[must_use]
    pub fn post(path: &str) -> Self {
        Self::new(TestClient::post(format!("{ORIGIN}{path}")))
    }

    #[must_use]
    pub fn put(path: &str) -> Self {
        Self::new(TestClient::put(format!("{ORIGIN}{path}")))
    }

    #[must_use]
    pub fn delete(path: &str) -> Self {
        Self::new(TestClient::delete(format!("{ORIGIN}{path}")))
    }

    /// Adds a header to the request.
    #[must_use]
    pub fn header(self, name: &str, value: &str) -> Self {
        let name = HeaderName::try_from(name).expect("valid header name");
        Self::new(self.builder.add_header(name, value.to_string(), true))
    }

    /// Authenticates with HTTP basic credentials.
    #[must_use]
    pub fn basic_auth(self, email: &str, password: &str) -> Self {
        let encoded = STANDARD.encode(format!("{email}:{password}"));
        self.header("authorization", &format!("Basic {encoded}"))
    }

    /// Sets a JSON request body.
    #[must_use]
    pub fn json(self, body: &Value) -> Self {
        Self::new(self.builder.json(body))
    }

    /// Sends the request to the test service and returns the response.
    pub async fn send(self, service: &Service) -> TestResponse {
        let mut response = self.builder.send(service).await;
        let status = response
            .status_code
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.take_string().await.unwrap_or_default();
        let json = serde_json::from_str(&body).unwrap_or(Value::Null);

        TestResponse { status, body, json }
    }
}

/// Represents an HTTP test response for assertions.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
    pub json: Value,
}

impl TestResponse {
    /// Asserts that the response status matches the expected code.
    #[must_use]
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status, expected,
            "Expected status {expected} but got {}: {}",
            self.status, self.body
        );
        self
    }

    /// Length of a top-level JSON array, or of the array under `key`.
    #[must_use]
    pub fn len_of(&self, key: Option<&str>) -> usize {
        let value = key.map_or(&self.json, |key| &self.json[key]);
        value.as_array().map_or(0, Vec::len)
    }

    /// The `id` field as a string.
    #[must_use]
    pub fn id(&self) -> String {
        self.json["id"].as_str().expect("id in response").to_string()
    }
}

/// Registers an account through the public route.
pub async fn register(service: &Service, name: &str, email: &str, password: &str) -> TestResponse {
    TestRequest::post("/api/app/auth/register")
        .json(&serde_json::json!({"name": name, "email": email, "password": password}))
        .send(service)
        .await
        .assert_status(StatusCode::CREATED)
}
