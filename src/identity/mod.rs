mod plate;
mod vehicle;

pub use plate::{normalize_identifier, normalize_plate, CanonicalKey, PLATE_SEPARATOR};
pub use vehicle::{PlateSource, VehicleIdentity};
