// reconcile/index.rs
use crate::domain::TelemetryEntry;
use crate::identity::{CanonicalKey, VehicleIdentity};
use std::collections::HashMap;
use tracing::debug;

/// Canonical key → position in the feed. Later entries overwrite earlier
/// ones, so duplicates resolve to the last occurrence in feed order.
pub struct TelemetryIndex<'a> {
    entries: &'a [TelemetryEntry],
    by_plate: HashMap<CanonicalKey, usize>,
    by_chassis: HashMap<CanonicalKey, usize>,
    pub unkeyed: usize,
    pub duplicates: usize,
}

impl<'a> TelemetryIndex<'a> {
    pub fn build(entries: &'a [TelemetryEntry]) -> Self {
        let mut by_plate = HashMap::new();
        let mut by_chassis = HashMap::new();
        let mut unkeyed = 0;
        let mut duplicates = 0;

        for (pos, entry) in entries.iter().enumerate() {
            let plate = entry.plate_key();
            let chassis = entry.chassis_key();

            if plate.is_empty() && chassis.is_empty() {
                unkeyed += 1;
                continue;
            }

            if !plate.is_empty() {
                if let Some(prev) = by_plate.insert(plate.clone(), pos) {
                    duplicates += 1;
                    debug!(key = %plate, replaced = prev, by = pos, "duplicate telemetry plate, keeping latest");
                }
            }
            if !chassis.is_empty() {
                by_chassis.insert(chassis, pos);
            }
        }

        Self {
            entries,
            by_plate,
            by_chassis,
            unkeyed,
            duplicates,
        }
    }

    /// Plate first, chassis only when the plate finds nothing. A chassis hit
    /// whose entry carries a different plate is not a match.
    pub fn lookup(&self, identity: &VehicleIdentity) -> Option<(usize, &'a TelemetryEntry)> {
        let by_plate = (!identity.plate.is_empty())
            .then(|| self.by_plate.get(&identity.plate))
            .flatten();

        let pos = by_plate.or_else(|| {
            (!identity.chassis.is_empty())
                .then(|| self.by_chassis.get(&identity.chassis))
                .flatten()
                .filter(|&&pos| {
                    let plate = self.entries[pos].plate_key();
                    plate.is_empty() || identity.plate.is_empty() || plate == identity.plate
                })
        })?;

        Some((*pos, &self.entries[*pos]))
    }

    /// Number of distinct entries reachable through at least one key.
    pub fn indexed(&self) -> usize {
        let mut positions: Vec<usize> = self.by_plate.values().chain(self.by_chassis.values()).copied().collect();
        positions.sort_unstable();
        positions.dedup();
        positions.len()
    }
}
