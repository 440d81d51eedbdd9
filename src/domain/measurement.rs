// domain/measurement.rs
//
// Dual-sheet mode: readings come from a second uploaded sheet instead of the
// live tracker feed. The sheet has four banner rows, a header row we can't
// trust, one repeated header line and then up to 21 unnamed columns.
use crate::domain::reading::parse_reading;
use crate::domain::{TelemetryEntry, TelemetryRecord};
use crate::table::{self, ColumnSpec, HeaderMode, RawTable, SchemaError, TableSchema};
use tracing::info;

pub const PLATE: &str = "Placa";
pub const CHASSIS: &str = "Chassi";
pub const MODEL: &str = "Modelo";
pub const CLIENT: &str = "Cliente";
pub const CITY: &str = "Cidade";
pub const HOUR_METER: &str = "Horimetro_Atual";
pub const READING_DATE: &str = "Data_Atual";
pub const HOUR_METER_DELTA: &str = "Diferenca_Horimetro";
pub const DAILY_AVERAGE: &str = "Media_Diaria";
pub const LAST_UPDATE: &str = "Ultima_Atualizacao";
pub const UPDATE_STATUS: &str = "Status_Atualizacao";

pub const HEADER_OFFSET: usize = 4;

pub fn measurement_schema() -> TableSchema {
    let positional = |name: &'static str| ColumnSpec::optional(name, &[]);

    TableSchema {
        table: "measurements",
        columns: vec![
            ColumnSpec::required(PLATE, &[]),
            ColumnSpec::required(CHASSIS, &[]),
            positional(MODEL),
            positional(CLIENT),
            positional(CITY),
            positional("Status"),
            positional("Col7"),
            positional("Col8"),
            positional("Col9"),
            positional("Col10"),
            ColumnSpec::required(HOUR_METER, &[]),
            positional("Data_Anterior"),
            positional("Horimetro_Anterior"),
            ColumnSpec::required(READING_DATE, &[]),
            positional("Col15"),
            positional(HOUR_METER_DELTA),
            positional("Col17"),
            positional(DAILY_AVERAGE),
            positional("Col19"),
            positional(LAST_UPDATE),
            positional(UPDATE_STATUS),
        ],
        header_offset: HEADER_OFFSET,
        header_mode: HeaderMode::Positional,
        skip_data_rows: 1,
    }
}

/// Measurement sheet rows as telemetry entries, in sheet order.
pub fn load_measurements(raw: &RawTable) -> Result<Vec<TelemetryEntry>, SchemaError> {
    let table = table::load(raw, &measurement_schema())?;

    let entries: Vec<TelemetryEntry> = table
        .rows()
        .iter()
        .map(|row| {
            let text = |column: &str| table.get(row, column).map(str::to_string);
            let number = |column: &str| table.get(row, column).and_then(parse_reading);

            TelemetryEntry::Valid(TelemetryRecord {
                plate: text(PLATE),
                chassis: text(CHASSIS),
                engine_hours: number(HOUR_METER),
                last_update: text(LAST_UPDATE).or_else(|| text(READING_DATE)),
                daily_average: number(DAILY_AVERAGE),
                hour_meter_delta: number(HOUR_METER_DELTA),
                update_status: text(UPDATE_STATUS),
                ..TelemetryRecord::default()
            })
        })
        .collect();

    info!(
        rows = entries.len(),
        extra_columns = table.unknown_columns().len(),
        "measurement sheet loaded"
    );

    Ok(entries)
}
