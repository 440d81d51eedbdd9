use crate::export::{display_columns, headers, write_csv, write_xlsx, CellValue};
use crate::query::Predicates;
use crate::report::build_report;
use crate::status::DerivationProfile;
use crate::tests::utils::{feed_entry, feed_state, fixed_now, row, Row};

#[test]
fn live_feed_columns_include_ignition_and_sheet_columns_do_not() {
    let live = headers(&display_columns(&DerivationProfile::live_feed()));
    let sheet = headers(&display_columns(&DerivationProfile::measurement_sheet()));

    assert!(live.contains(&"Ignição"));
    assert!(!sheet.contains(&"Ignição"));
    assert!(sheet.contains(&"Média Diária"));
    assert_eq!(live.first(), Some(&"Filial"));
    assert_eq!(live.last(), Some(&"Qualidade"));
}

#[test]
fn csv_mirrors_report_columns_and_rows() {
    let (state, _) = feed_state(
        &[row("RDT0A85"), row("ABC1D23")],
        vec![feed_entry("RDT-0A85", "1")],
    );
    let pass = state.run_pass(fixed_now()).unwrap();
    let predicates = Predicates::new();
    let columns = display_columns(state.profile());

    let report = build_report(&pass, &predicates, state.profile());
    let csv = write_csv(&pass.select(&predicates), &columns, ';');
    let lines: Vec<&str> = csv.split("\r\n").filter(|l| !l.is_empty()).collect();

    assert_eq!(lines[0], report.columns.join(";"));
    assert_eq!(lines.len(), 1 + report.rows.len());
    assert!(lines[1].contains("RDT0A85"));
    assert!(lines[1].contains("Ligado"));
    assert!(lines[2].contains("Não encontrado"));
    assert!(lines[2].contains("Sem dados do rastreador"));
}

#[test]
fn csv_quotes_fields_holding_the_delimiter() {
    let (state, _) = feed_state(
        &[Row {
            plate: "RDT0A85",
            owner: "Silva; Filhos Ltda",
            ..Row::default()
        }],
        vec![],
    );
    let pass = state.run_pass(fixed_now()).unwrap();
    let columns = display_columns(state.profile());

    let csv = write_csv(&pass.select(&Predicates::new()), &columns, ';');

    assert!(csv.contains("\"Silva; Filhos Ltda\""));
}

#[test]
fn report_rows_carry_typed_cells() {
    let (state, _) = feed_state(&[row("RDT0A85")], vec![feed_entry("RDT0A85", "0")]);
    let pass = state.run_pass(fixed_now()).unwrap();

    let report = build_report(&pass, &Predicates::new(), state.profile());
    let at = |header: &str| report.columns.iter().position(|c| *c == header).unwrap();

    assert_eq!(report.rows[0][at("Valor Locação")], CellValue::Number(1500.0));
    assert_eq!(report.rows[0][at("Ignição")], CellValue::Text("Desligado".to_string()));
    assert_eq!(report.rows[0][at("Horímetro Cadastro")], CellValue::Empty);
    assert_eq!(report.rows[0][at("Qualidade")], CellValue::Text("Normal".to_string()));
}

#[test]
fn xlsx_export_is_a_zip_workbook() {
    let (state, _) = feed_state(&[row("RDT0A85")], vec![feed_entry("RDT0A85", "1")]);
    let pass = state.run_pass(fixed_now()).unwrap();
    let columns = display_columns(state.profile());

    let buffer = write_xlsx(&pass.select(&Predicates::new()), &columns).unwrap();

    assert!(buffer.starts_with(b"PK"));
}
