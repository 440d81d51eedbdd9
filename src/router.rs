use crate::domain::{load_measurements, Registry};
use crate::errors::ServerError;
use crate::export::{display_columns, write_csv, write_xlsx};
use crate::query::Predicates;
use crate::report::build_report;
use crate::responses::{csv_response, json_response, xlsx_response, ResultResp};
use crate::state::{feed_conflict, AppState};
use crate::table::RawTable;
use astra::Request;
use chrono::{DateTime, Utc};
use serde_json::json;

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    handle_at(req, state, Utc::now())
}

/// Same as `handle`, with the pass time supplied by the caller.
pub fn handle_at(mut req: Request, state: &AppState, now: DateTime<Utc>) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    match (method.as_str(), path.as_str()) {
        ("GET", "/health") => json_response(&json!({ "status": "ok" })),

        ("GET", "/report") => {
            let predicates = Predicates::from_pairs(parse_query(&req))?;
            let pass = state.run_pass(now)?;
            json_response(&build_report(&pass, &predicates, state.profile()))
        }

        ("GET", "/export.csv") => {
            let predicates = Predicates::from_pairs(parse_query(&req))?;
            let pass = state.run_pass(now)?;
            let columns = display_columns(state.profile());
            let text = write_csv(&pass.select(&predicates), &columns, state.delimiter);
            csv_response(text, &export_name(now, "csv"))
        }

        ("GET", "/export.xlsx") => {
            let predicates = Predicates::from_pairs(parse_query(&req))?;
            let pass = state.run_pass(now)?;
            let columns = display_columns(state.profile());
            let buffer = write_xlsx(&pass.select(&predicates), &columns)?;
            xlsx_response(buffer, &export_name(now, "xlsx"))
        }

        ("POST", "/registry") => {
            let raw = RawTable::from_reader(req.body_mut().reader())?;
            let registry = Registry::load(&raw)?;
            let body = json!({
                "rows": registry.len(),
                "unknown_columns": registry.unknown_columns,
            });
            state.replace_registry(registry)?;
            json_response(&body)
        }

        ("POST", "/measurements") => {
            if !state.accepts_measurements() {
                return Err(feed_conflict());
            }
            let raw = RawTable::from_reader(req.body_mut().reader())?;
            let entries = load_measurements(&raw)?;
            let count = state.replace_measurements(entries, now)?;
            json_response(&json!({ "entries": count }))
        }

        ("POST", "/telemetry/refresh") => {
            state.refresh()?;
            json_response(&json!({ "status": "refreshed" }))
        }

        _ => Err(ServerError::NotFound),
    }
}

fn parse_query(req: &Request) -> Vec<(String, String)> {
    req.uri()
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default()
}

fn export_name(now: DateTime<Utc>, ext: &str) -> String {
    format!("frota_{}.{ext}", now.format("%Y%m%d_%H%M"))
}
