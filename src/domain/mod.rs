pub mod equipment;
pub mod measurement;
mod merged;
pub mod reading;
mod telemetry;

pub use equipment::{EquipmentRecord, Registry};
pub use measurement::load_measurements;
pub use merged::{IgnitionStatus, MeasurementStatus, MergedRecord, TelemetryLink, NORMAL_LABEL};
pub use telemetry::{TelemetryEntry, TelemetryRecord};
