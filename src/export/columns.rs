// export/columns.rs
use crate::domain::MergedRecord;
use crate::status::DerivationProfile;
use serde::Serialize;

/// One cell of the display table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    fn text(v: &Option<String>) -> Self {
        v.as_ref().map_or(CellValue::Empty, |s| CellValue::Text(s.clone()))
    }

    fn number(v: Option<f64>) -> Self {
        v.map_or(CellValue::Empty, CellValue::Number)
    }

    /// Plain rendering for delimited text.
    pub fn render(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            CellValue::Number(n) => n.to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

/// A column of the on-screen table. Every export uses the same list, so
/// the download mirrors the display.
#[derive(Clone, Copy)]
pub struct DisplayColumn {
    pub header: &'static str,
    pub value: fn(&MergedRecord) -> CellValue,
}

impl std::fmt::Debug for DisplayColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayColumn").field("header", &self.header).finish()
    }
}

const fn col(header: &'static str, value: fn(&MergedRecord) -> CellValue) -> DisplayColumn {
    DisplayColumn { header, value }
}

const REGISTRY_COLUMNS: &[DisplayColumn] = &[
    col("Filial", |r| CellValue::text(&r.equipment.branch)),
    col("Proprietário", |r| CellValue::text(&r.equipment.owner)),
    col("Placa", |r| CellValue::text(&r.equipment.plate)),
    col("Apelido", |r| CellValue::text(&r.equipment.nickname)),
    col("Chassi", |r| CellValue::text(&r.equipment.chassis)),
    col("Série", |r| CellValue::text(&r.equipment.series)),
    col("Marca", |r| CellValue::text(&r.equipment.brand)),
    col("Modelo", |r| CellValue::text(&r.equipment.model)),
    col("Tipo", |r| CellValue::text(&r.equipment.equipment_type)),
    col("Grupo", |r| CellValue::text(&r.equipment.group)),
    col("Subgrupo", |r| CellValue::text(&r.equipment.subgroup)),
    col("Situação", |r| CellValue::text(&r.equipment.situation)),
    col("Valor Locação", |r| CellValue::number(r.equipment.lease_value)),
    col("Horímetro Cadastro", |r| CellValue::number(r.equipment.hour_meter)),
    col("Status Medição", |r| CellValue::Text(r.measurement_status.label().to_string())),
];

const FEED_COLUMNS: &[DisplayColumn] = &[
    col("Ignição", |r| {
        r.ignition_status
            .map_or(CellValue::Empty, |s| CellValue::Text(s.label().to_string()))
    }),
    col("Velocidade", |r| CellValue::number(r.telemetry.as_ref().and_then(|t| t.speed))),
    col("Odômetro", |r| CellValue::number(r.telemetry.as_ref().and_then(|t| t.odometer))),
    col("Horímetro Rastreador", |r| {
        CellValue::number(r.telemetry.as_ref().and_then(|t| t.engine_hours))
    }),
    col("Latitude", |r| CellValue::number(r.telemetry.as_ref().and_then(|t| t.latitude))),
    col("Longitude", |r| CellValue::number(r.telemetry.as_ref().and_then(|t| t.longitude))),
];

const SHEET_COLUMNS: &[DisplayColumn] = &[
    col("Horímetro", |r| CellValue::number(r.telemetry.as_ref().and_then(|t| t.engine_hours))),
    col("Diferença Horímetro", |r| {
        CellValue::number(r.telemetry.as_ref().and_then(|t| t.hour_meter_delta))
    }),
    col("Média Diária", |r| CellValue::number(r.telemetry.as_ref().and_then(|t| t.daily_average))),
    col("Status Atualização", |r| {
        CellValue::text(&r.telemetry.as_ref().and_then(|t| t.update_status.clone()))
    }),
];

const TRAILING_COLUMNS: &[DisplayColumn] = &[
    col("Última Atualização", |r| {
        CellValue::text(&r.telemetry.as_ref().and_then(|t| t.last_update.clone()))
    }),
    col("Qualidade", |r| CellValue::Text(r.quality_summary())),
];

/// Column order for a profile. Ignition columns only appear when the
/// profile derives ignition.
pub fn display_columns(profile: &DerivationProfile) -> Vec<DisplayColumn> {
    let telemetry = if profile.derive_ignition {
        FEED_COLUMNS
    } else {
        SHEET_COLUMNS
    };

    REGISTRY_COLUMNS
        .iter()
        .chain(telemetry)
        .chain(TRAILING_COLUMNS)
        .copied()
        .collect()
}

pub fn headers(columns: &[DisplayColumn]) -> Vec<&'static str> {
    columns.iter().map(|c| c.header).collect()
}

pub fn row_values(row: &MergedRecord, columns: &[DisplayColumn]) -> Vec<CellValue> {
    columns.iter().map(|c| (c.value)(row)).collect()
}
