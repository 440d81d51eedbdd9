// telemetry/cache.rs
use crate::domain::TelemetryEntry;
use crate::telemetry::TelemetryFeed;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_TTL_SECS: i64 = 5 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum SnapshotStatus {
    Live,
    /// The fetch failed; the snapshot is empty and every row goes unmatched.
    Unavailable(String),
}

/// Telemetry as of one fetch (or one measurement-sheet upload).
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySnapshot {
    pub taken_at: DateTime<Utc>,
    pub entries: Arc<Vec<TelemetryEntry>>,
    pub status: SnapshotStatus,
}

impl TelemetrySnapshot {
    pub fn live(taken_at: DateTime<Utc>, entries: Vec<TelemetryEntry>) -> Self {
        Self {
            taken_at,
            entries: Arc::new(entries),
            status: SnapshotStatus::Live,
        }
    }

    pub fn unavailable(taken_at: DateTime<Utc>, reason: impl Into<String>) -> Self {
        Self {
            taken_at,
            entries: Arc::new(Vec::new()),
            status: SnapshotStatus::Unavailable(reason.into()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == SnapshotStatus::Live
    }
}

/// Holds the last snapshot for a fixed window of wall-clock time.
///
/// A hit returns the held snapshot without touching the feed; a miss fetches
/// exactly once and replaces it. Failed fetches are held too, so an outage
/// costs one request per window.
pub struct SnapshotCache {
    ttl: Duration,
    current: Option<TelemetrySnapshot>,
    fetches: u64,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            current: None,
            fetches: 0,
        }
    }

    pub fn get_or_fetch(&mut self, now: DateTime<Utc>, feed: &dyn TelemetryFeed) -> TelemetrySnapshot {
        if let Some(snapshot) = self.current.as_ref().filter(|s| self.is_fresh(s, now)) {
            debug!(age_secs = (now - snapshot.taken_at).num_seconds(), "telemetry cache hit");
            return snapshot.clone();
        }

        self.fetches += 1;
        let snapshot = match feed.fetch() {
            Ok(entries) => TelemetrySnapshot::live(now, entries),
            Err(e) => TelemetrySnapshot::unavailable(now, e.to_string()),
        };

        self.current = Some(snapshot.clone());
        snapshot
    }

    /// Drop the held snapshot; the next read fetches.
    pub fn invalidate(&mut self) {
        self.current = None;
    }

    pub fn fetch_count(&self) -> u64 {
        self.fetches
    }

    fn is_fresh(&self, snapshot: &TelemetrySnapshot, now: DateTime<Utc>) -> bool {
        let age = now - snapshot.taken_at;
        age >= Duration::zero() && age < self.ttl
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }
}
