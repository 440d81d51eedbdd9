mod engine;
mod index;

pub use engine::{reconcile, reconcile_with_stats, ReconcileStats, Reconciliation};
pub use index::TelemetryIndex;
