// domain/merged.rs
use crate::domain::{EquipmentRecord, TelemetryRecord};
use crate::status::StatusFlag;
use serde::Serialize;

/// Label used when a row raised no quality flag.
pub const NORMAL_LABEL: &str = "Normal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeasurementStatus {
    HasMeasurement,
    NoMeasurement,
}

impl MeasurementStatus {
    pub fn code(&self) -> &'static str {
        match self {
            MeasurementStatus::HasMeasurement => "HAS_MEASUREMENT",
            MeasurementStatus::NoMeasurement => "NO_MEASUREMENT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MeasurementStatus::HasMeasurement => "COM MEDIÇÃO",
            MeasurementStatus::NoMeasurement => "SEM MEDIÇÃO",
        }
    }
}

/// Exactly these five; there is no implicit sixth state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IgnitionStatus {
    On,
    Off,
    Unknown,
    NotFound,
    Error,
}

impl IgnitionStatus {
    pub fn code(&self) -> &'static str {
        match self {
            IgnitionStatus::On => "ON",
            IgnitionStatus::Off => "OFF",
            IgnitionStatus::Unknown => "UNKNOWN",
            IgnitionStatus::NotFound => "NOT_FOUND",
            IgnitionStatus::Error => "ERROR",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IgnitionStatus::On => "Ligado",
            IgnitionStatus::Off => "Desligado",
            IgnitionStatus::Unknown => "Verificar",
            IgnitionStatus::NotFound => "Não encontrado",
            IgnitionStatus::Error => "Erro",
        }
    }
}

/// What the join found for one registry row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TelemetryLink<'a> {
    Matched(&'a TelemetryRecord),
    /// The key matched a feed entry that couldn't be decoded.
    Malformed(&'a str),
    Missing,
}

/// A registry row joined with at most one telemetry record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedRecord {
    pub equipment: EquipmentRecord,
    pub telemetry: Option<TelemetryRecord>,
    pub measurement_status: MeasurementStatus,
    /// `None` when the derivation profile doesn't track ignition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignition_status: Option<IgnitionStatus>,
    pub flags: Vec<StatusFlag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_error: Option<String>,
}

impl MergedRecord {
    pub fn has_measurement(&self) -> bool {
        self.measurement_status == MeasurementStatus::HasMeasurement
    }

    /// Flag labels joined for display, or "Normal".
    pub fn quality_summary(&self) -> String {
        if self.flags.is_empty() {
            return NORMAL_LABEL.to_string();
        }
        self.flags
            .iter()
            .map(StatusFlag::label)
            .collect::<Vec<_>>()
            .join("; ")
    }
}
