// state.rs
use crate::domain::{MergedRecord, Registry, TelemetryEntry};
use crate::errors::ServerError;
use crate::export::DEFAULT_DELIMITER;
use crate::reconcile::{reconcile_with_stats, ReconcileStats};
use crate::status::DerivationProfile;
use crate::telemetry::{SnapshotCache, TelemetryFeed, TelemetrySnapshot};
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex, RwLock};
use tracing::info;

const NO_SHEET: &str = "no measurement sheet loaded";

pub enum TelemetrySource {
    Feed {
        feed: Box<dyn TelemetryFeed>,
        /// Held across the fetch, so concurrent misses cost one request.
        cache: Mutex<SnapshotCache>,
    },
    Sheet {
        snapshot: RwLock<TelemetrySnapshot>,
    },
}

/// Everything a request needs. Shared by reference across astra workers.
pub struct AppState {
    registry: RwLock<Arc<Registry>>,
    telemetry: TelemetrySource,
    profile: DerivationProfile,
    pub delimiter: char,
}

/// One reconciliation pass and the snapshot it ran against.
#[derive(Debug, Clone)]
pub struct Pass {
    pub rows: Vec<MergedRecord>,
    pub stats: ReconcileStats,
    pub snapshot: TelemetrySnapshot,
}

impl AppState {
    pub fn with_feed(
        registry: Registry,
        feed: Box<dyn TelemetryFeed>,
        ttl: Duration,
        profile: DerivationProfile,
    ) -> Self {
        Self {
            registry: RwLock::new(Arc::new(registry)),
            telemetry: TelemetrySource::Feed {
                feed,
                cache: Mutex::new(SnapshotCache::new(ttl)),
            },
            profile,
            delimiter: DEFAULT_DELIMITER,
        }
    }

    /// `measurements` is `None` until a sheet is uploaded; every row reads
    /// as unmatched meanwhile.
    pub fn with_sheet(
        registry: Registry,
        measurements: Option<Vec<TelemetryEntry>>,
        profile: DerivationProfile,
        now: DateTime<Utc>,
    ) -> Self {
        let snapshot = match measurements {
            Some(entries) => TelemetrySnapshot::live(now, entries),
            None => TelemetrySnapshot::unavailable(now, NO_SHEET),
        };

        Self {
            registry: RwLock::new(Arc::new(registry)),
            telemetry: TelemetrySource::Sheet {
                snapshot: RwLock::new(snapshot),
            },
            profile,
            delimiter: DEFAULT_DELIMITER,
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn profile(&self) -> &DerivationProfile {
        &self.profile
    }

    pub fn registry(&self) -> Result<Arc<Registry>, ServerError> {
        let guard = self.registry.read().map_err(|_| poisoned("registry"))?;
        Ok(Arc::clone(&guard))
    }

    /// Starts a new session: passes already running keep the old registry.
    pub fn replace_registry(&self, registry: Registry) -> Result<(), ServerError> {
        let rows = registry.len();
        *self.registry.write().map_err(|_| poisoned("registry"))? = Arc::new(registry);
        info!(rows, "registry replaced");
        Ok(())
    }

    pub fn accepts_measurements(&self) -> bool {
        matches!(self.telemetry, TelemetrySource::Sheet { .. })
    }

    pub fn replace_measurements(
        &self,
        entries: Vec<TelemetryEntry>,
        now: DateTime<Utc>,
    ) -> Result<usize, ServerError> {
        match &self.telemetry {
            TelemetrySource::Sheet { snapshot } => {
                let count = entries.len();
                *snapshot.write().map_err(|_| poisoned("measurements"))? =
                    TelemetrySnapshot::live(now, entries);
                info!(entries = count, "measurement sheet replaced");
                Ok(count)
            }
            TelemetrySource::Feed { .. } => Err(feed_conflict()),
        }
    }

    /// Drops the cached feed snapshot. A no-op for the sheet source.
    pub fn refresh(&self) -> Result<(), ServerError> {
        if let TelemetrySource::Feed { cache, .. } = &self.telemetry {
            cache.lock().map_err(|_| poisoned("telemetry cache"))?.invalidate();
            info!("telemetry cache invalidated");
        }
        Ok(())
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> Result<TelemetrySnapshot, ServerError> {
        match &self.telemetry {
            TelemetrySource::Feed { feed, cache } => {
                let mut cache = cache.lock().map_err(|_| poisoned("telemetry cache"))?;
                Ok(cache.get_or_fetch(now, &**feed))
            }
            TelemetrySource::Sheet { snapshot } => {
                let guard = snapshot.read().map_err(|_| poisoned("measurements"))?;
                Ok(guard.clone())
            }
        }
    }

    pub fn run_pass(&self, now: DateTime<Utc>) -> Result<Pass, ServerError> {
        let registry = self.registry()?;
        let snapshot = self.snapshot(now)?;

        let result = reconcile_with_stats(&registry.records, &snapshot.entries, &self.profile, now);

        Ok(Pass {
            rows: result.rows,
            stats: result.stats,
            snapshot,
        })
    }

    /// Feed fetches made so far; `None` for the sheet source.
    pub fn fetch_count(&self) -> Option<u64> {
        match &self.telemetry {
            TelemetrySource::Feed { cache, .. } => cache.lock().ok().map(|c| c.fetch_count()),
            TelemetrySource::Sheet { .. } => None,
        }
    }
}

pub fn feed_conflict() -> ServerError {
    ServerError::Conflict("telemetry comes from the live feed; measurement uploads are disabled".into())
}

fn poisoned(what: &str) -> ServerError {
    ServerError::Internal(format!("{what} lock poisoned"))
}
