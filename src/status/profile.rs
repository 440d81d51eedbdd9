// status/profile.rs
use crate::domain::TelemetryRecord;
use crate::status::QualityCheck;
use chrono::Duration;

/// The telemetry field whose presence means "this vehicle has a measurement".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryReading {
    /// Live tracker: every report carries an ignition value.
    Ignition,
    /// Measurement sheet: the current hour-meter column.
    EngineHours,
}

impl PrimaryReading {
    pub fn is_present(&self, record: &TelemetryRecord) -> bool {
        match self {
            PrimaryReading::Ignition => record.ignition.is_some(),
            PrimaryReading::EngineHours => record.engine_hours.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivationProfile {
    pub name: &'static str,
    pub primary_reading: PrimaryReading,
    pub derive_ignition: bool,
    pub checks: Vec<QualityCheck>,
}

impl DerivationProfile {
    pub fn live_feed() -> Self {
        Self {
            name: "live_feed",
            primary_reading: PrimaryReading::Ignition,
            derive_ignition: true,
            checks: vec![
                QualityCheck::MissingTelemetry,
                QualityCheck::TelemetryError,
                QualityCheck::IgnitionOffWithSpeed,
                QualityCheck::MissingCoordinates,
                QualityCheck::EngineHoursBelowRegistry,
            ],
        }
    }

    pub fn measurement_sheet() -> Self {
        Self {
            name: "measurement_sheet",
            primary_reading: PrimaryReading::EngineHours,
            derive_ignition: false,
            checks: vec![
                QualityCheck::MissingTelemetry,
                QualityCheck::EngineHoursBelowRegistry,
            ],
        }
    }

    /// Adds a stale-reading check; `max_age` is measured against the pass time.
    pub fn with_stale_after(mut self, max_age: Duration) -> Self {
        self.checks.retain(|c| !matches!(c, QualityCheck::StaleReading { .. }));
        self.checks.push(QualityCheck::StaleReading { max_age });
        self
    }
}
