//! Tests for health, identity and account routes.

use salvo::http::StatusCode;
use salvo::test::{ResponseExt, TestClient};
use serde_json::json;

use almanac_core::config::AuthMethod;

use crate::app::api::test_support::{basic, json, service, url};

#[test_log::test(tokio::test)]
async fn test_healthcheck_is_public() {
    let service = service(AuthMethod::BasicAuth);

    let mut res = TestClient::get(url("/app/healthcheck")).send(&service).await;
    assert_eq!(res.status_code, Some(StatusCode::OK));
    assert_eq!(res.take_string().await.expect("body"), "OK");
}

#[test_log::test(tokio::test)]
async fn test_whoami_requires_credentials_in_basic_mode() {
    let service = service(AuthMethod::BasicAuth);

    let mut res = TestClient::get(url("/app/whoami")).send(&service).await;
    assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    assert!(res.headers().contains_key("www-authenticate"));
    assert_eq!(json(&mut res).await["error"], "Not authenticated");
}

#[test_log::test(tokio::test)]
async fn test_register_login_and_whoami() {
    let service = service(AuthMethod::BasicAuth);
    let registration = json!({
        "name": "Ann Example",
        "email": "ann@example.com",
        "password": "s3cret!"
    });

    let mut res = TestClient::post(url("/app/auth/register"))
        .json(&registration)
        .send(&service)
        .await;
    assert_eq!(res.status_code, Some(StatusCode::CREATED));
    let body = json(&mut res).await;
    assert_eq!(body["email"], "ann@example.com");
    assert!(body.get("password_hash").is_none());

    let res = TestClient::post(url("/app/auth/register"))
        .json(&registration)
        .send(&service)
        .await;
    assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

    let res = TestClient::post(url("/app/auth/login"))
        .json(&json!({"email": "ann@example.com", "password": "wrong-password"}))
        .send(&service)
        .await;
    assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

    let mut res = TestClient::post(url("/app/auth/login"))
        .json(&json!({"email": "ann@example.com", "password": "s3cret!"}))
        .send(&service)
        .await;
    assert_eq!(res.status_code, Some(StatusCode::OK));
    assert_eq!(json(&mut res).await["success"], true);

    let mut res = TestClient::get(url("/app/whoami"))
        .add_header("authorization", basic("ann@example.com", "s3cret!"), true)
        .send(&service)
        .await;
    assert_eq!(res.status_code, Some(StatusCode::OK));
    assert_eq!(json(&mut res).await["name"], "Ann Example");
}

#[test_log::test(tokio::test)]
async fn test_register_rejects_invalid_input() {
    let service = service(AuthMethod::BasicAuth);

    let res = TestClient::post(url("/app/auth/register"))
        .json(&json!({"name": "A", "email": "a@example.com", "password": "s3cret!"}))
        .send(&service)
        .await;
    assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

    let res = TestClient::post(url("/app/auth/register"))
        .json(&json!({"name": "Ann"}))
        .send(&service)
        .await;
    assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
}

#[test_log::test(tokio::test)]
async fn test_single_user_is_provisioned() {
    let service = service(AuthMethod::SingleUser);

    let mut res = TestClient::get(url("/app/whoami")).send(&service).await;
    assert_eq!(res.status_code, Some(StatusCode::OK));
    assert_eq!(json(&mut res).await["email"], "test@example.com");
}

#[test_log::test(tokio::test)]
async fn test_proxy_header_identifies_account() {
    let service = service(AuthMethod::Proxy);

    let res = TestClient::get(url("/app/whoami")).send(&service).await;
    assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

    let mut res = TestClient::get(url("/app/whoami"))
        .add_header("x-remote-user", "bob@example.com", true)
        .send(&service)
        .await;
    assert_eq!(res.status_code, Some(StatusCode::OK));
    let body = json(&mut res).await;
    assert_eq!(body["email"], "bob@example.com");
    assert_eq!(body["name"], "bob");
}
