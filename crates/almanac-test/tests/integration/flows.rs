//! Multi-step user flows across accounts, events and tasks.

use salvo::http::StatusCode;
use serde_json::json;

use almanac_test::component::config::AuthMethod;

use super::helpers::*;

const ANN: (&str, &str) = ("ann@example.com", "ann-secret");
const BOB: (&str, &str) = ("bob@example.com", "bob-secret");

/// ## Summary
/// Accounts only ever see their own events, tasks and lists.
#[test_log::test(tokio::test)]
async fn accounts_are_isolated() {
    let service = create_test_service(AuthMethod::BasicAuth);
    register(&service, "Ann", ANN.0, ANN.1).await;
    register(&service, "Bob", BOB.0, BOB.1).await;

    let event = TestRequest::post("/api/events")
        .basic_auth(ANN.0, ANN.1)
        .json(&json!({"title": "Ann's dentist", "start_date": "2024-05-14", "category": "personal"}))
        .send(&service)
        .await
        .assert_status(StatusCode::CREATED);
    let event_path = format!("/api/events/{}", event.id());

    TestRequest::get(&event_path)
        .basic_auth(BOB.0, BOB.1)
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    TestRequest::delete(&event_path)
        .basic_auth(BOB.0, BOB.1)
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let bobs_view = TestRequest::get("/api/calendar/occurrences?from=2024-05-01&to=2024-05-31")
        .basic_auth(BOB.0, BOB.1)
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(bobs_view.len_of(Some("occurrences")), 0);

    let anns_view = TestRequest::get("/api/calendar/occurrences?from=2024-05-01&to=2024-05-31")
        .basic_auth(ANN.0, ANN.1)
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(anns_view.len_of(Some("occurrences")), 1);
    assert_eq!(anns_view.json["occurrences"][0]["color"], "#039be5");

    TestRequest::get("/api/events")
        .basic_auth(ANN.0, "wrong")
        .send(&service)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

/// ## Summary
/// A month agenda combines events and tasks, and a multi-day event shows on
/// every day it covers, filler days included.
#[test_log::test(tokio::test)]
async fn month_agenda_combines_events_and_tasks() {
    let service = create_test_service(AuthMethod::SingleUser);

    TestRequest::post("/api/events")
        .json(&json!({
            "title": "Trip",
            "start_date": "2024-08-30",
            "end_date": "2024-09-02",
            "all_day": true
        }))
        .send(&service)
        .await
        .assert_status(StatusCode::CREATED);
    TestRequest::post("/api/tasks")
        .json(&json!({"title": "Pack", "due_date": "2024-08-29", "list": "Personal"}))
        .send(&service)
        .await
        .assert_status(StatusCode::CREATED);

    let agenda = TestRequest::get("/api/calendar/agenda/month?date=2024-09-10&week_start=monday")
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
    let days = agenda.json["days"].as_array().expect("days");
    assert_eq!(days.len(), 42);

    let trip_days: Vec<_> = days
        .iter()
        .filter(|day| day["occurrences"].as_array().is_some_and(|o| !o.is_empty()))
        .map(|day| day["date"].as_str().expect("date"))
        .collect();
    assert_eq!(trip_days, ["2024-08-30", "2024-08-31", "2024-09-01", "2024-09-02"]);

    let pack_day = days
        .iter()
        .find(|day| day["date"] == "2024-08-29")
        .expect("filler day");
    assert_eq!(pack_day["in_focus_period"], false);
    assert_eq!(pack_day["tasks"][0]["title"], "Pack");
}

/// ## Summary
/// The weekly digest lists pending tasks only; completing one drops it.
#[test_log::test(tokio::test)]
async fn weekly_digest_tracks_task_completion() {
    let service = create_test_service(AuthMethod::SingleUser);

    let task = TestRequest::post("/api/tasks")
        .json(&json!({"title": "Renew passport", "due_date": "2024-10-09"}))
        .send(&service)
        .await
        .assert_status(StatusCode::CREATED);

    let digest = TestRequest::get("/api/calendar/digest/weekly?date=2024-10-10")
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(digest.len_of(Some("pending_tasks")), 1);

    TestRequest::post(&format!("/api/tasks/{}/toggle", task.id()))
        .send(&service)
        .await
        .assert_status(StatusCode::OK);

    let digest = TestRequest::get("/api/calendar/digest/weekly?date=2024-10-10")
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(digest.len_of(Some("pending_tasks")), 0);
}
