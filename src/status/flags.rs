// status/flags.rs
use crate::domain::reading::parse_timestamp;
use crate::domain::{EquipmentRecord, TelemetryLink, TelemetryRecord};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// A consistency check a profile can turn on. Each is evaluated on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityCheck {
    MissingTelemetry,
    TelemetryError,
    IgnitionOffWithSpeed,
    MissingCoordinates,
    EngineHoursBelowRegistry,
    StaleReading { max_age: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFlag {
    NoTrackerData,
    TelemetryError,
    IgnitionOffWithSpeed,
    MissingCoordinates,
    EngineHoursBelowRegistry,
    StaleReading,
}

impl StatusFlag {
    pub fn label(&self) -> &'static str {
        match self {
            StatusFlag::NoTrackerData => "Sem dados do rastreador",
            StatusFlag::TelemetryError => "Erro na leitura do rastreador",
            StatusFlag::IgnitionOffWithSpeed => "Ignição desligada com velocidade",
            StatusFlag::MissingCoordinates => "Sem coordenadas",
            StatusFlag::EngineHoursBelowRegistry => "Horímetro abaixo do cadastro",
            StatusFlag::StaleReading => "Leitura desatualizada",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            StatusFlag::NoTrackerData => "no_tracker_data",
            StatusFlag::TelemetryError => "telemetry_error",
            StatusFlag::IgnitionOffWithSpeed => "ignition_off_with_speed",
            StatusFlag::MissingCoordinates => "missing_coordinates",
            StatusFlag::EngineHoursBelowRegistry => "engine_hours_below_registry",
            StatusFlag::StaleReading => "stale_reading",
        }
    }
}

impl QualityCheck {
    pub fn evaluate(
        &self,
        equipment: &EquipmentRecord,
        link: TelemetryLink<'_>,
        now: DateTime<Utc>,
    ) -> Option<StatusFlag> {
        match (self, link) {
            (QualityCheck::MissingTelemetry, TelemetryLink::Missing) => Some(StatusFlag::NoTrackerData),
            (QualityCheck::TelemetryError, TelemetryLink::Malformed(_)) => Some(StatusFlag::TelemetryError),
            (QualityCheck::IgnitionOffWithSpeed, TelemetryLink::Matched(r)) => {
                let off = r.ignition.as_deref().map(str::trim) == Some("0");
                let moving = r.speed.is_some_and(|s| s > 0.0);
                (off && moving).then_some(StatusFlag::IgnitionOffWithSpeed)
            }
            (QualityCheck::MissingCoordinates, TelemetryLink::Matched(r)) => {
                missing_coordinates(r).then_some(StatusFlag::MissingCoordinates)
            }
            (QualityCheck::EngineHoursBelowRegistry, TelemetryLink::Matched(r)) => {
                match (r.engine_hours, equipment.hour_meter) {
                    (Some(tracked), Some(registered)) if tracked < registered => {
                        Some(StatusFlag::EngineHoursBelowRegistry)
                    }
                    _ => None,
                }
            }
            (QualityCheck::StaleReading { max_age }, TelemetryLink::Matched(r)) => {
                // An unreadable timestamp is not evidence of staleness.
                let updated = r.last_update.as_deref().and_then(parse_timestamp)?;
                (now - updated > *max_age).then_some(StatusFlag::StaleReading)
            }
            _ => None,
        }
    }
}

fn missing_coordinates(record: &TelemetryRecord) -> bool {
    match (record.latitude, record.longitude) {
        (Some(lat), Some(lon)) => lat == 0.0 && lon == 0.0,
        _ => true,
    }
}
