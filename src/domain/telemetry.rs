// domain/telemetry.rs
use crate::identity::{normalize_identifier, normalize_plate, CanonicalKey};
use serde::Serialize;

/// One tracker reading (or one measurement-sheet row). Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TelemetryRecord {
    /// As sent by the source, possibly hyphenated.
    pub plate: Option<String>,
    /// Measurement sheet only; the live feed does not carry it.
    pub chassis: Option<String>,
    /// Raw ignition value; "1" and "0" are the only ones with a known meaning.
    pub ignition: Option<String>,
    pub speed: Option<f64>,
    pub odometer: Option<f64>,
    pub engine_hours: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub last_update: Option<String>,
    pub daily_average: Option<f64>,
    pub hour_meter_delta: Option<f64>,
    pub update_status: Option<String>,
}

impl TelemetryRecord {
    pub fn plate_key(&self) -> CanonicalKey {
        normalize_plate(self.plate.as_deref())
    }

    pub fn chassis_key(&self) -> CanonicalKey {
        normalize_identifier(self.chassis.as_deref())
    }
}

/// A feed element after decoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TelemetryEntry {
    Valid(TelemetryRecord),
    /// Keyed by plate but missing or garbling an expected field.
    Malformed {
        plate: Option<String>,
        reason: String,
    },
}

impl TelemetryEntry {
    pub fn plate_key(&self) -> CanonicalKey {
        match self {
            TelemetryEntry::Valid(record) => record.plate_key(),
            TelemetryEntry::Malformed { plate, .. } => normalize_plate(plate.as_deref()),
        }
    }

    pub fn chassis_key(&self) -> CanonicalKey {
        match self {
            TelemetryEntry::Valid(record) => record.chassis_key(),
            TelemetryEntry::Malformed { .. } => CanonicalKey::default(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, TelemetryEntry::Valid(_))
    }
}
