//! Recurring events as seen through the HTTP API.

use salvo::http::StatusCode;
use serde_json::{Value, json};

use almanac_test::component::config::AuthMethod;

use super::helpers::*;

fn dates(response: &TestResponse) -> Vec<String> {
    response.json["occurrences"]
        .as_array()
        .expect("occurrences")
        .iter()
        .filter_map(|o| o["instance_date"].as_str().map(str::to_string))
        .collect()
}

async fn create(service: &salvo::Service, body: &Value) -> TestResponse {
    TestRequest::post("/api/events")
        .json(body)
        .send(service)
        .await
        .assert_status(StatusCode::CREATED)
}

/// ## Summary
/// A monthly rule on the 31st lands on the last day of shorter months and
/// skips its exception dates.
#[test_log::test(tokio::test)]
async fn monthly_rule_clamps_and_skips_exceptions() {
    let service = create_test_service(AuthMethod::SingleUser);
    create(
        &service,
        &json!({
            "title": "Month end close",
            "start_date": "2024-01-31",
            "all_day": true,
            "recurrence": {
                "frequency": "monthly",
                "end_date": "2024-06-30",
                "exceptions": ["2024-04-30"]
            }
        }),
    )
    .await;

    let response = TestRequest::get("/api/calendar/occurrences?from=2024-01-01&to=2024-12-31")
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(
        dates(&response),
        ["2024-01-31", "2024-02-29", "2024-03-31", "2024-05-31", "2024-06-30"]
    );
    assert_eq!(response.json["occurrences"][0]["recurring"], true);
}

/// ## Summary
/// Weekly rules with a weekday set produce every selected weekday, and
/// `count` bounds the series even when the query window is wider.
#[test_log::test(tokio::test)]
async fn weekly_weekday_set_with_count() {
    let service = create_test_service(AuthMethod::SingleUser);
    create(
        &service,
        &json!({
            "title": "Gym",
            "start_date": "2024-07-01",
            "time": {"start": "07:00", "end": "08:00"},
            "recurrence": {"frequency": "weekly", "days_of_week": [1, 3, 5], "count": 5}
        }),
    )
    .await;

    let response = TestRequest::get("/api/calendar/occurrences?from=2024-07-01&to=2024-08-31")
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(
        dates(&response),
        ["2024-07-01", "2024-07-03", "2024-07-05", "2024-07-08", "2024-07-10"]
    );
}

/// ## Summary
/// Editing the rule of a stored event changes what the next query returns.
#[test_log::test(tokio::test)]
async fn updating_rule_reexpands() {
    let service = create_test_service(AuthMethod::SingleUser);
    let event = create(
        &service,
        &json!({
            "title": "Standup",
            "start_date": "2024-07-01",
            "recurrence": {"frequency": "daily"}
        }),
    )
    .await;

    let week = "/api/calendar/occurrences?from=2024-07-01&to=2024-07-07";
    let response = TestRequest::get(week).send(&service).await;
    assert_eq!(response.len_of(Some("occurrences")), 7);

    TestRequest::put(&format!("/api/events/{}", event.id()))
        .json(&json!({"recurrence": {"frequency": "daily", "interval": 2}}))
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
    let response = TestRequest::get(week).send(&service).await;
    assert_eq!(response.len_of(Some("occurrences")), 4);

    TestRequest::put(&format!("/api/events/{}", event.id()))
        .json(&json!({"recurrence": null}))
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
    let response = TestRequest::get(week).send(&service).await;
    assert_eq!(response.len_of(Some("occurrences")), 1);
}
