use crate::domain::measurement::HEADER_OFFSET;
use crate::domain::{Registry, TelemetryEntry, TelemetryRecord};
use crate::state::AppState;
use crate::status::DerivationProfile;
use crate::table::{Cell, RawTable};
use crate::telemetry::{TelemetryError, TelemetryFeed};
use astra::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const REGISTRY_HEADER: [&str; 15] = [
    "Localização/Filial Atual*:",
    "Série",
    "Chassis:",
    "Horímetro",
    "Marca",
    "Modelo",
    "Tipo",
    "Placa:",
    "Situação",
    "Valor Locação",
    "Grupo",
    "Subgrupo",
    "Observações",
    "Apelido",
    "Proprietário ou Locador*:",
];

pub fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

/// Pass time shared by every test that cares about "now".
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 2, 15, 0, 0).unwrap()
}

/// One registry line. Fields not set read as blank.
#[derive(Debug, Clone)]
pub struct Row {
    pub branch: &'static str,
    pub plate: &'static str,
    pub chassis: &'static str,
    pub nickname: &'static str,
    pub situation: &'static str,
    pub owner: &'static str,
    pub hour_meter: Option<f64>,
}

impl Default for Row {
    fn default() -> Self {
        Self {
            branch: "São Paulo",
            plate: "",
            chassis: "",
            nickname: "",
            situation: "Active",
            owner: "Locadora Norte",
            hour_meter: None,
        }
    }
}

impl Row {
    fn cells(&self) -> Vec<Cell> {
        vec![
            text(self.branch),
            text("S-100"),
            text(self.chassis),
            self.hour_meter.map_or(Cell::Empty, Cell::Number),
            text("Caterpillar"),
            text("320"),
            text("Escavadeira"),
            text(self.plate),
            text(self.situation),
            text("R$ 1.500,00"),
            text("Linha Amarela"),
            text("Escavadeiras"),
            Cell::Empty,
            text(self.nickname),
            text(self.owner),
        ]
    }
}

pub fn row(plate: &'static str) -> Row {
    Row {
        plate,
        ..Row::default()
    }
}

pub fn registry_grid(rows: &[Row]) -> RawTable {
    let mut grid = vec![REGISTRY_HEADER.iter().map(|h| text(h)).collect::<Vec<_>>()];
    grid.extend(rows.iter().map(Row::cells));
    RawTable::new(grid)
}

pub fn registry(rows: &[Row]) -> Registry {
    Registry::load(&registry_grid(rows)).expect("registry fixture should load")
}

/// Feed entry with coordinates set, so only the flags under test fire.
pub fn feed_entry(plate: &str, ignition: &str) -> TelemetryEntry {
    TelemetryEntry::Valid(TelemetryRecord {
        plate: Some(plate.to_string()),
        ignition: Some(ignition.to_string()),
        speed: Some(0.0),
        latitude: Some(-23.55),
        longitude: Some(-46.63),
        last_update: Some("2024-05-02 14:30:00".to_string()),
        ..TelemetryRecord::default()
    })
}

pub fn malformed_entry(plate: &str) -> TelemetryEntry {
    TelemetryEntry::Malformed {
        plate: Some(plate.to_string()),
        reason: "missing field `ignicao`".to_string(),
    }
}

/// In-memory feed that counts how often it is asked.
pub struct FixedFeed {
    entries: Vec<TelemetryEntry>,
    calls: Arc<AtomicUsize>,
}

impl FixedFeed {
    pub fn new(entries: Vec<TelemetryEntry>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let feed = Self {
            entries,
            calls: Arc::clone(&calls),
        };
        (feed, calls)
    }
}

impl TelemetryFeed for FixedFeed {
    fn fetch(&self) -> Result<Vec<TelemetryEntry>, TelemetryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.clone())
    }
}

pub struct FailingFeed;

impl TelemetryFeed for FailingFeed {
    fn fetch(&self) -> Result<Vec<TelemetryEntry>, TelemetryError> {
        Err(TelemetryError::Timeout("tracker did not answer within 30s".into()))
    }
}

pub fn feed_state(rows: &[Row], entries: Vec<TelemetryEntry>) -> (AppState, Arc<AtomicUsize>) {
    let (feed, calls) = FixedFeed::new(entries);
    let state = AppState::with_feed(
        registry(rows),
        Box::new(feed),
        Duration::minutes(5),
        DerivationProfile::live_feed(),
    );
    (state, calls)
}

/// (plate, chassis, current hour meter, reading date)
pub type Measurement = (&'static str, &'static str, f64, &'static str);

const MEASUREMENT_WIDTH: usize = 21;

/// Sheet shaped like the hour-meter export: banner rows, an untrusted
/// header, a repeated header line, then data.
pub fn measurement_grid(rows: &[Measurement]) -> RawTable {
    let mut grid: Vec<Vec<Cell>> = (0..HEADER_OFFSET)
        .map(|i| vec![text(&format!("Relatório de horímetros {i}"))])
        .collect();

    let header: Vec<Cell> = (0..MEASUREMENT_WIDTH).map(|i| text(&format!("Coluna {i}"))).collect();
    grid.push(header.clone());
    grid.push(header);

    for (plate, chassis, hours, date) in rows {
        let mut cells = vec![Cell::Empty; MEASUREMENT_WIDTH];
        cells[0] = text(plate);
        cells[1] = text(chassis);
        cells[10] = Cell::Number(*hours);
        cells[13] = text(date);
        cells[20] = text("Atualizado");
        grid.push(cells);
    }

    RawTable::new(grid)
}

pub fn read_body(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}
