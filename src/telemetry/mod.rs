mod cache;
mod client;
pub mod models;
mod telemetry_error;

pub use cache::{SnapshotCache, SnapshotStatus, TelemetrySnapshot, DEFAULT_TTL_SECS};
pub use client::{TrackerClient, TrackerConfig};
pub use telemetry_error::TelemetryError;

use crate::domain::TelemetryEntry;

/// Source of one telemetry snapshot. The HTTP tracker in production, fixed
/// entries in tests.
pub trait TelemetryFeed: Send + Sync {
    fn fetch(&self) -> Result<Vec<TelemetryEntry>, TelemetryError>;
}
