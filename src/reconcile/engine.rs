// reconcile/engine.rs
use crate::domain::{EquipmentRecord, MergedRecord, TelemetryEntry, TelemetryLink};
use crate::reconcile::TelemetryIndex;
use crate::status::{self, DerivationProfile};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

/// Counters for one pass. Only used for logs and the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    pub registry_rows: usize,
    pub telemetry_entries: usize,
    pub matched: usize,
    pub row_errors: usize,
    pub unmatchable_registry_rows: usize,
    /// Feed entries no registry row asked for. Dropped from the output.
    pub orphan_telemetry: usize,
    pub duplicate_keys: usize,
    pub unkeyed_telemetry: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub rows: Vec<MergedRecord>,
    pub stats: ReconcileStats,
}

/// Left join of the registry against one telemetry snapshot.
///
/// Exactly one output row per registry row, in registry order. A malformed
/// telemetry entry only affects the row it matched.
pub fn reconcile(
    registry: &[EquipmentRecord],
    telemetry: &[TelemetryEntry],
    profile: &DerivationProfile,
    now: DateTime<Utc>,
) -> Vec<MergedRecord> {
    reconcile_with_stats(registry, telemetry, profile, now).rows
}

pub fn reconcile_with_stats(
    registry: &[EquipmentRecord],
    telemetry: &[TelemetryEntry],
    profile: &DerivationProfile,
    now: DateTime<Utc>,
) -> Reconciliation {
    let index = TelemetryIndex::build(telemetry);
    let mut used = HashSet::new();
    let mut stats = ReconcileStats {
        registry_rows: registry.len(),
        telemetry_entries: telemetry.len(),
        duplicate_keys: index.duplicates,
        unkeyed_telemetry: index.unkeyed,
        ..ReconcileStats::default()
    };

    let rows: Vec<MergedRecord> = registry
        .iter()
        .map(|equipment| {
            let identity = equipment.identity();
            if !identity.is_matchable() {
                stats.unmatchable_registry_rows += 1;
            }

            let hit = index.lookup(&identity);
            let link = match hit {
                Some((pos, entry)) => {
                    used.insert(pos);
                    match entry {
                        TelemetryEntry::Valid(record) => TelemetryLink::Matched(record),
                        TelemetryEntry::Malformed { reason, .. } => TelemetryLink::Malformed(reason),
                    }
                }
                None => TelemetryLink::Missing,
            };

            let derived = status::derive(equipment, link, profile, now);

            if let Some(err) = &derived.row_error {
                stats.row_errors += 1;
                warn!(row = equipment.row, plate = %identity.plate, error = %err, "row downgraded to ERROR");
            }
            if matches!(link, TelemetryLink::Matched(_)) {
                stats.matched += 1;
            }

            MergedRecord {
                equipment: equipment.clone(),
                telemetry: match link {
                    TelemetryLink::Matched(record) => Some(record.clone()),
                    _ => None,
                },
                measurement_status: derived.measurement_status,
                ignition_status: derived.ignition_status,
                flags: derived.flags,
                row_error: derived.row_error.map(|e| e.reason),
            }
        })
        .collect();

    stats.orphan_telemetry = index.indexed().saturating_sub(used.len());

    info!(
        profile = profile.name,
        registry = stats.registry_rows,
        telemetry = stats.telemetry_entries,
        matched = stats.matched,
        row_errors = stats.row_errors,
        orphans = stats.orphan_telemetry,
        "reconciliation pass complete"
    );

    Reconciliation { rows, stats }
}
