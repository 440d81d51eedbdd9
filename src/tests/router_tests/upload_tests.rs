use crate::domain::measurement::HOUR_METER;
use crate::responses::error_to_response;
use crate::router::handle_at;
use crate::state::AppState;
use crate::status::DerivationProfile;
use crate::table::RawTable;
use crate::tests::utils::{feed_state, fixed_now, measurement_grid, read_body, registry, registry_grid, row, text};
use astra::Body;
use http::{Method, Request};
use serde_json::Value;

fn post(uri: &str, grid: &RawTable) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_vec(grid).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn report(state: &AppState) -> Value {
    let resp = handle_at(get("/report"), state, fixed_now()).unwrap();
    serde_json::from_str(&read_body(resp)).unwrap()
}

#[test]
fn registry_upload_replaces_the_session() {
    let (state, _) = feed_state(&[row("RDT0A85")], vec![]);
    let mut grid = registry_grid(&[row("AAA1A11"), row("BBB2B22")]);
    grid.rows[0].push(text("Centro de Custo"));

    let resp = handle_at(post("/registry", &grid), &state, fixed_now()).unwrap();
    let body: Value = serde_json::from_str(&read_body(resp)).unwrap();

    assert_eq!(body["rows"], 2);
    assert_eq!(body["unknown_columns"][0], "Centro de Custo");
    assert_eq!(report(&state)["summary"]["total"], 2);
}

#[test]
fn registry_upload_missing_columns_is_rejected_and_keeps_old_registry() {
    let (state, _) = feed_state(&[row("RDT0A85")], vec![]);
    let grid = RawTable::new(vec![vec![text("Placa")], vec![text("AAA1A11")]]);

    let err = handle_at(post("/registry", &grid), &state, fixed_now()).unwrap_err();
    let resp = error_to_response(err);

    assert_eq!(resp.status(), 400);
    let body: Value = serde_json::from_str(&read_body(resp)).unwrap();
    assert!(body["missing"]
        .as_array()
        .unwrap()
        .iter()
        .any(|m| m == "chassis"));
    assert_eq!(report(&state)["summary"]["total"], 1);
}

#[test]
fn garbage_upload_is_a_bad_request() {
    let (state, _) = feed_state(&[], vec![]);
    let req = Request::builder()
        .method(Method::POST)
        .uri("/registry")
        .body(Body::from("not json"))
        .unwrap();

    let err = handle_at(req, &state, fixed_now()).unwrap_err();

    assert_eq!(error_to_response(err).status(), 400);
}

#[test]
fn measurements_are_refused_in_feed_mode() {
    let (state, _) = feed_state(&[row("RDT0A85")], vec![]);
    let grid = measurement_grid(&[("RDT0A85", "", 10.0, "2024-05-01")]);

    let err = handle_at(post("/measurements", &grid), &state, fixed_now()).unwrap_err();

    assert_eq!(error_to_response(err).status(), 409);
}

#[test]
fn measurement_upload_feeds_the_next_pass() {
    let state = AppState::with_sheet(
        registry(&[row("RDT0A85"), row("ABC1D23")]),
        None,
        DerivationProfile::measurement_sheet(),
        fixed_now(),
    );

    let before = report(&state);
    assert_eq!(before["summary"]["with_measurement"], 0);
    assert_eq!(before["telemetry"]["status"]["state"], "unavailable");

    let grid = measurement_grid(&[("RDT-0A85", "", 3120.5, "2024-05-01")]);
    let resp = handle_at(post("/measurements", &grid), &state, fixed_now()).unwrap();
    assert_eq!(read_body(resp), r#"{"entries":1}"#);

    let after = report(&state);
    assert_eq!(after["profile"], "measurement_sheet");
    assert_eq!(after["summary"]["with_measurement"], 1);
    assert!(!after["columns"].as_array().unwrap().iter().any(|c| c == "Ignição"));
}

#[test]
fn narrow_measurement_sheet_names_missing_columns() {
    let state = AppState::with_sheet(
        registry(&[row("RDT0A85")]),
        None,
        DerivationProfile::measurement_sheet(),
        fixed_now(),
    );
    let mut grid = measurement_grid(&[]);
    for r in grid.rows.iter_mut() {
        r.truncate(3);
    }

    let err = handle_at(post("/measurements", &grid), &state, fixed_now()).unwrap_err();
    let resp = error_to_response(err);

    assert_eq!(resp.status(), 400);
    assert!(read_body(resp).contains(HOUR_METER));
}
