// identity/vehicle.rs
use crate::identity::{normalize_identifier, normalize_plate, CanonicalKey};
use serde::Serialize;

/// Which registry field produced the plate key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlateSource {
    PlateField,
    Nickname,
    Absent,
}

/// Join keys of one registry row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleIdentity {
    pub plate: CanonicalKey,
    pub chassis: CanonicalKey,
    pub plate_source: PlateSource,
}

impl VehicleIdentity {
    /// The plate field is trusted first; the nickname only fills in when the
    /// plate normalizes to nothing.
    pub fn from_fields(plate: Option<&str>, nickname: Option<&str>, chassis: Option<&str>) -> Self {
        let chassis = normalize_identifier(chassis);

        let from_plate = normalize_plate(plate);
        if !from_plate.is_empty() {
            return Self {
                plate: from_plate,
                chassis,
                plate_source: PlateSource::PlateField,
            };
        }

        let from_nickname = normalize_plate(nickname);
        if !from_nickname.is_empty() {
            return Self {
                plate: from_nickname,
                chassis,
                plate_source: PlateSource::Nickname,
            };
        }

        Self {
            plate: CanonicalKey::default(),
            chassis,
            plate_source: PlateSource::Absent,
        }
    }

    pub fn is_matchable(&self) -> bool {
        !self.plate.is_empty() || !self.chassis.is_empty()
    }
}
