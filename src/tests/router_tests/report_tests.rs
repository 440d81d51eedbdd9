use crate::responses::error_to_response;
use crate::router::handle_at;
use crate::state::AppState;
use crate::status::DerivationProfile;
use crate::tests::utils::{feed_entry, feed_state, fixed_now, malformed_entry, read_body, registry, row, FailingFeed};
use astra::Body;
use chrono::Duration;
use http::{Method, Request};
use serde_json::Value;
use std::sync::atomic::Ordering;

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn report_json(state: &AppState, uri: &str) -> Value {
    let resp = handle_at(get(uri), state, fixed_now()).expect("report should succeed");
    assert_eq!(resp.status(), 200);
    serde_json::from_str(&read_body(resp)).unwrap()
}

#[test]
fn health_answers_ok() {
    let (state, _) = feed_state(&[], vec![]);

    let resp = handle_at(get("/health"), &state, fixed_now()).unwrap();

    assert_eq!(resp.status(), 200);
    assert!(read_body(resp).contains("ok"));
}

#[test]
fn report_has_summary_rows_and_snapshot() {
    let (state, _) = feed_state(
        &[row("RDT0A85"), row("ABC1D23"), row("XYZ9K88")],
        vec![feed_entry("RDT-0A85", "1"), malformed_entry("ABC1D23")],
    );

    let report = report_json(&state, "/report");

    assert_eq!(report["profile"], "live_feed");
    assert_eq!(report["summary"]["total"], 3);
    assert_eq!(report["summary"]["owners"], 1);
    assert_eq!(report["summary"]["with_measurement"], 1);
    assert_eq!(report["rows"].as_array().unwrap().len(), 3);
    assert_eq!(report["telemetry"]["status"]["state"], "live");
    assert_eq!(report["telemetry"]["entries"], 2);
    assert_eq!(report["stats"]["row_errors"], 1);
}

#[test]
fn report_applies_query_filters() {
    let (state, _) = feed_state(
        &[row("RDT0A85"), row("ABC1D23")],
        vec![feed_entry("RDT-0A85", "1")],
    );

    let report = report_json(&state, "/report?ignition_status=NOT_FOUND&situation=Active");

    assert_eq!(report["summary"]["total"], 1);
    let plate_col = report["columns"]
        .as_array()
        .unwrap()
        .iter()
        .position(|c| c == "Placa")
        .unwrap();
    assert_eq!(report["rows"][0][plate_col], "ABC1D23");
}

#[test]
fn encoded_labels_are_decoded() {
    let (state, _) = feed_state(&[row("RDT0A85")], vec![]);

    let report = report_json(&state, "/report?measurement_status=SEM%20MEDI%C3%87%C3%83O");

    assert_eq!(report["summary"]["total"], 1);
}

#[test]
fn unknown_filter_field_is_a_bad_request() {
    let (state, _) = feed_state(&[row("RDT0A85")], vec![]);

    let err = handle_at(get("/report?colour=red"), &state, fixed_now()).unwrap_err();
    let resp = error_to_response(err);

    assert_eq!(resp.status(), 400);
    assert!(read_body(resp).contains("colour"));
}

#[test]
fn unknown_route_is_not_found() {
    let (state, _) = feed_state(&[], vec![]);

    let err = handle_at(get("/nope"), &state, fixed_now()).unwrap_err();

    assert_eq!(error_to_response(err).status(), 404);
}

#[test]
fn feed_is_fetched_once_per_window() {
    let (state, calls) = feed_state(&[row("RDT0A85")], vec![feed_entry("RDT0A85", "1")]);
    let now = fixed_now();

    handle_at(get("/report"), &state, now).unwrap();
    handle_at(get("/export.csv"), &state, now + Duration::minutes(4)).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    handle_at(get("/report"), &state, now + Duration::minutes(5)).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(state.fetch_count(), Some(2));
}

#[test]
fn refresh_forces_the_next_fetch() {
    let (state, calls) = feed_state(&[row("RDT0A85")], vec![feed_entry("RDT0A85", "1")]);

    handle_at(get("/report"), &state, fixed_now()).unwrap();

    let refresh = Request::builder()
        .method(Method::POST)
        .uri("/telemetry/refresh")
        .body(Body::empty())
        .unwrap();
    let resp = handle_at(refresh, &state, fixed_now()).unwrap();
    assert_eq!(resp.status(), 200);

    handle_at(get("/report"), &state, fixed_now()).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn failed_fetch_reports_every_row_unmatched() {
    let state = AppState::with_feed(
        registry(&[row("RDT0A85"), row("ABC1D23")]),
        Box::new(FailingFeed),
        Duration::minutes(5),
        DerivationProfile::live_feed(),
    );

    let report = report_json(&state, "/report?ignition_status=NOT_FOUND");

    assert_eq!(report["summary"]["total"], 2);
    assert_eq!(report["telemetry"]["status"]["state"], "unavailable");
    assert!(report["telemetry"]["status"]["reason"]
        .as_str()
        .unwrap()
        .contains("timed out"));
}
