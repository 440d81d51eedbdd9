use crate::router::handle_at;
use crate::tests::utils::{feed_entry, feed_state, fixed_now, read_body, row};
use astra::Body;
use http::{Method, Request};

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[test]
fn csv_export_is_an_attachment_with_filtered_rows() {
    let (state, _) = feed_state(
        &[row("RDT0A85"), row("ABC1D23")],
        vec![feed_entry("RDT-0A85", "1")],
    );

    let resp = handle_at(get("/export.csv?plate=ABC1D23"), &state, fixed_now()).unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        resp.headers().get("Content-Disposition").unwrap().to_str().unwrap(),
        "attachment; filename=\"frota_20240502_1500.csv\""
    );
    assert_eq!(resp.headers().get("Cache-Control").unwrap(), "no-store");

    let body = read_body(resp);
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Filial;Proprietário;Placa"));
    assert!(lines[1].contains("ABC1D23"));
}

#[test]
fn csv_export_uses_the_configured_delimiter() {
    let (state, _) = feed_state(&[row("RDT0A85")], vec![]);
    let state = state.with_delimiter(',');

    let body = read_body(handle_at(get("/export.csv"), &state, fixed_now()).unwrap());

    assert!(body.starts_with("Filial,Proprietário,Placa"));
}

#[test]
fn xlsx_export_is_a_workbook_download() {
    let (state, _) = feed_state(&[row("RDT0A85")], vec![feed_entry("RDT0A85", "1")]);

    let resp = handle_at(get("/export.xlsx"), &state, fixed_now()).unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );

    let mut bytes = Vec::new();
    std::io::Read::read_to_end(&mut resp.into_body().reader(), &mut bytes).unwrap();
    assert!(bytes.starts_with(b"PK"));
}
