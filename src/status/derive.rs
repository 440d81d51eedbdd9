// status/derive.rs
use crate::domain::{EquipmentRecord, IgnitionStatus, MeasurementStatus, TelemetryLink};
use crate::status::{DerivationProfile, StatusFlag};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// A single row could not be derived. Shows up as `ERROR` in that row only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {row}: {reason}")]
pub struct RowError {
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedStatus {
    pub measurement_status: MeasurementStatus,
    pub ignition_status: Option<IgnitionStatus>,
    pub flags: Vec<StatusFlag>,
    pub row_error: Option<RowError>,
}

pub fn measurement_status(link: TelemetryLink<'_>, profile: &DerivationProfile) -> MeasurementStatus {
    match link {
        TelemetryLink::Matched(record) if profile.primary_reading.is_present(record) => {
            MeasurementStatus::HasMeasurement
        }
        _ => MeasurementStatus::NoMeasurement,
    }
}

/// "1" → ON, "0" → OFF, anything else → UNKNOWN; no link → NOT_FOUND.
///
/// A matched record with no ignition value at all is a row error, not UNKNOWN.
pub fn ignition_status(link: TelemetryLink<'_>) -> Result<IgnitionStatus, String> {
    match link {
        TelemetryLink::Missing => Ok(IgnitionStatus::NotFound),
        TelemetryLink::Malformed(reason) => Err(reason.to_string()),
        TelemetryLink::Matched(record) => match record.ignition.as_deref().map(str::trim) {
            Some("1") => Ok(IgnitionStatus::On),
            Some("0") => Ok(IgnitionStatus::Off),
            Some(_) => Ok(IgnitionStatus::Unknown),
            None => Err("ignition value missing".to_string()),
        },
    }
}

pub fn derive(
    equipment: &EquipmentRecord,
    link: TelemetryLink<'_>,
    profile: &DerivationProfile,
    now: DateTime<Utc>,
) -> DerivedStatus {
    let mut row_error = match link {
        TelemetryLink::Malformed(reason) => Some(RowError {
            row: equipment.row,
            reason: reason.to_string(),
        }),
        _ => None,
    };

    let ignition_status = if profile.derive_ignition {
        match ignition_status(link) {
            Ok(status) => Some(status),
            Err(reason) => {
                row_error.get_or_insert(RowError {
                    row: equipment.row,
                    reason,
                });
                Some(IgnitionStatus::Error)
            }
        }
    } else {
        None
    };

    let flags = profile
        .checks
        .iter()
        .filter_map(|check| check.evaluate(equipment, link, now))
        .collect();

    DerivedStatus {
        measurement_status: measurement_status(link, profile),
        ignition_status,
        flags,
        row_error,
    }
}
