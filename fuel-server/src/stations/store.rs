//! Shared station snapshot.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::Station;
use crate::minetur::{LoadScope, MineturClient, MineturError, RawStation, convert_stations};

use super::cache::StationCache;

/// One complete load of the station set.
///
/// Never modified after construction; a reload builds a new snapshot and
/// swaps it in, so readers holding the old one are unaffected.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub stations: Vec<Station>,
    /// What was requested from upstream to build this snapshot.
    pub scope: LoadScope,
    /// `None` until the first successful load.
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn new(stations: Vec<Station>, scope: LoadScope) -> Self {
        Self {
            stations,
            scope,
            loaded_at: Some(Utc::now()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }

    pub fn brands(&self) -> Vec<String> {
        unique_brands(&self.stations)
    }
}

/// Distinct non-blank brand names, sorted ascending.
pub fn unique_brands(stations: &[Station]) -> Vec<String> {
    stations
        .iter()
        .map(|s| s.brand.trim())
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Thread-safe holder of the current [`Snapshot`] with reload support.
#[derive(Clone)]
pub struct StationStore {
    inner: Arc<RwLock<Arc<Snapshot>>>,
    client: MineturClient,
    cache: Option<StationCache>,
    /// Zone the opening hours are written in.
    timezone: Tz,
}

/// Wall-clock time at the stations when the UTC clock reads `at`.
pub fn station_clock(timezone: Tz, at: DateTime<Utc>) -> NaiveDateTime {
    at.with_timezone(&timezone).naive_local()
}

impl StationStore {
    /// Create a store with an empty, not-yet-loaded snapshot.
    ///
    /// Opening hours are evaluated in Europe/Madrid unless
    /// [`StationStore::with_timezone`] says otherwise.
    pub fn new(client: MineturClient, cache: Option<StationCache>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(Snapshot::default()))),
            client,
            cache,
            timezone: chrono_tz::Europe::Madrid,
        }
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// The current snapshot.
    pub async fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.read().await.clone()
    }

    /// Initial full load, served from the disk cache when it is fresh.
    pub async fn load(&self) -> Result<usize, MineturError> {
        if let Some(raw) = self.cache.as_ref().and_then(StationCache::load) {
            info!(count = raw.len(), "loaded stations from disk cache");
            return Ok(self.install(&raw, LoadScope::all()).await);
        }

        self.refresh().await
    }

    /// Download the full station list and replace the snapshot.
    ///
    /// On failure the existing snapshot is preserved and the error is
    /// returned.
    pub async fn refresh(&self) -> Result<usize, MineturError> {
        let raw = self.client.fetch_all().await?;

        if let Some(cache) = &self.cache
            && let Err(e) = cache.save(&raw)
        {
            warn!(error = %e, path = %cache.path().display(), "failed to write station cache");
        }

        Ok(self.install(&raw, LoadScope::all()).await)
    }

    /// Reload whatever the current snapshot was built from.
    ///
    /// Historical snapshots never change upstream, so they are kept as they
    /// are. A store that has never loaded fetches the full list.
    pub async fn refresh_current(&self) -> Result<usize, MineturError> {
        let snapshot = self.snapshot().await;
        if snapshot.is_loaded() && snapshot.scope.date.is_some() {
            debug!(path = %snapshot.scope.path(), "historical snapshot, refresh skipped");
            return Ok(snapshot.stations.len());
        }

        self.load_scoped(snapshot.scope.clone()).await
    }

    /// Load a filtered or historical subset and replace the snapshot with it.
    pub async fn load_scoped(&self, scope: LoadScope) -> Result<usize, MineturError> {
        if scope.is_full() {
            return self.refresh().await;
        }

        let raw = self.client.fetch_scoped(&scope).await?;
        Ok(self.install(&raw, scope).await)
    }

    /// Swap in an already-normalized station set.
    pub async fn replace(&self, stations: Vec<Station>, scope: LoadScope) -> usize {
        let count = stations.len();
        *self.inner.write().await = Arc::new(Snapshot::new(stations, scope));
        count
    }

    async fn install(&self, raw: &[RawStation], scope: LoadScope) -> usize {
        let stations = convert_stations(raw, station_clock(self.timezone, Utc::now()));
        info!(count = stations.len(), path = %scope.path(), "station snapshot replaced");
        self.replace(stations, scope).await
    }
}
