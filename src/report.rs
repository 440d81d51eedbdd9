// report.rs
use crate::domain::MergedRecord;
use crate::export::{display_columns, headers, row_values, CellValue};
use crate::query::{filter, summarize, Predicates, Summary};
use crate::reconcile::ReconcileStats;
use crate::state::Pass;
use crate::status::DerivationProfile;
use crate::telemetry::SnapshotStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotInfo {
    pub taken_at: DateTime<Utc>,
    pub entries: usize,
    pub status: SnapshotStatus,
}

/// What the dashboard shows: summary counts over the filtered rows, the
/// rows themselves in display order, and where the telemetry came from.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub profile: &'static str,
    pub summary: Summary,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<CellValue>>,
    pub telemetry: SnapshotInfo,
    pub stats: ReconcileStats,
}

impl Pass {
    /// Rows passing `predicates`, in registry order.
    pub fn select(&self, predicates: &Predicates) -> Vec<&MergedRecord> {
        filter(&self.rows, predicates)
    }
}

pub fn build_report(pass: &Pass, predicates: &Predicates, profile: &DerivationProfile) -> Report {
    let selected = pass.select(predicates);
    let columns = display_columns(profile);

    Report {
        profile: profile.name,
        summary: summarize(selected.iter().copied()),
        columns: headers(&columns),
        rows: selected.iter().map(|row| row_values(row, &columns)).collect(),
        telemetry: SnapshotInfo {
            taken_at: pass.snapshot.taken_at,
            entries: pass.snapshot.entries.len(),
            status: pass.snapshot.status.clone(),
        },
        stats: pass.stats.clone(),
    }
}
