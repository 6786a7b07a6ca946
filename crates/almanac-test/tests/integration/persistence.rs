//! Snapshot persistence across service restarts.

use salvo::http::StatusCode;
use serde_json::json;

use almanac_test::component::config::AuthMethod;

use super::helpers::*;

/// ## Summary
/// Data written through one service instance is visible to the next one
/// built over the same snapshot file.
#[test_log::test(tokio::test)]
async fn snapshot_survives_restart() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("almanac.json");

    {
        let service = create_snapshot_service(AuthMethod::SingleUser, path.clone());
        TestRequest::post("/api/events")
            .json(&json!({"title": "Anniversary", "start_date": "2024-02-29", "all_day": true,
                          "recurrence": {"frequency": "yearly", "count": 3}}))
            .send(&service)
            .await
            .assert_status(StatusCode::CREATED);
        TestRequest::post("/api/task-lists")
            .json(&json!({"name": "Gifts"}))
            .send(&service)
            .await
            .assert_status(StatusCode::CREATED);
    }
    assert!(path.exists());

    let service = create_snapshot_service(AuthMethod::SingleUser, path);
    let events = TestRequest::get("/api/events")
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(events.len_of(None), 1);

    let lists = TestRequest::get("/api/task-lists")
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(lists.len_of(None), 4);

    let occurrences = TestRequest::get("/api/calendar/occurrences?from=2024-01-01&to=2030-12-31")
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
    let dates: Vec<_> = occurrences.json["occurrences"]
        .as_array()
        .expect("occurrences")
        .iter()
        .map(|o| o["start_date"].clone())
        .collect();
    assert_eq!(dates, [json!("2024-02-29"), json!("2025-02-28"), json!("2026-02-28")]);
}
