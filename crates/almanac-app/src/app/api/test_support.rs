//! Shared fixtures for the handler tests.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use salvo::Service;
use salvo::test::ResponseExt;

use almanac_core::config::{
    AuthConfig, AuthMethod, CalendarConfig, CategoryPalette, LoggingConfig, ProxyAuthConfig,
    ServerConfig, Settings, SingleUserAuthConfig, StorageConfig,
};
use almanac_service::store::InMemoryStore;

use crate::app::service_router;

pub const BASE: &str = "http://127.0.0.1:5800/api";

pub fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

pub fn settings(method: AuthMethod) -> Settings {
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
                name: "Test User".to_string(),
                email: "test@example.com".to_string(),
            }),
        },
        calendar: CalendarConfig::default(),
        categories: CategoryPalette::default(),
        storage: StorageConfig::default(),
    }
}

pub fn service(method: AuthMethod) -> Service {
    Service::new(service_router(settings(method), InMemoryStore::new()))
}

pub fn basic(email: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{email}:{password}")))
}

pub async fn json(res: &mut salvo::Response) -> serde_json::Value {
    res.take_json().await.expect("json body")
}
