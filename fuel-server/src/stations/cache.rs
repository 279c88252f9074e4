//! Disk-based cache of the last full price download.
//!
//! Stores the raw upstream records so a restart within the TTL does not
//! have to download the whole country again. Opening hours are evaluated
//! again on every load, so caching raw data keeps `is_open` current.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::minetur::{MineturError, RawStation};

/// Default cache TTL: 30 minutes, the upstream publishing cadence.
const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Cached station data with metadata.
#[derive(Debug, Serialize, Deserialize)]
struct CachedStations {
    /// Unix timestamp when the cache was written.
    cached_at_secs: u64,
    stations: Vec<RawStation>,
}

/// Configuration for the station disk cache.
#[derive(Debug, Clone)]
pub struct StationCacheConfig {
    /// Path to the cache file.
    pub path: PathBuf,
    /// How long the cache remains valid.
    pub ttl: Duration,
}

impl StationCacheConfig {
    /// Create a new cache config with the given path and default TTL.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Set a custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Disk cache for raw station records.
#[derive(Debug, Clone)]
pub struct StationCache {
    config: StationCacheConfig,
}

impl StationCache {
    pub fn new(config: StationCacheConfig) -> Self {
        Self { config }
    }

    /// Try to load stations from the cache.
    ///
    /// Returns `None` if the cache doesn't exist, is invalid, or has expired.
    pub fn load(&self) -> Option<Vec<RawStation>> {
        let contents = std::fs::read_to_string(&self.config.path).ok()?;
        let cached: CachedStations = serde_json::from_str(&contents).ok()?;

        let age_secs = unix_now().ok()?.saturating_sub(cached.cached_at_secs);
        if age_secs >= self.config.ttl.as_secs() {
            return None;
        }

        Some(cached.stations)
    }

    /// Save stations to the cache, creating parent directories as needed.
    pub fn save(&self, stations: &[RawStation]) -> Result<(), MineturError> {
        let cached = CachedStations {
            cached_at_secs: unix_now()?,
            stations: stations.to_vec(),
        };

        if let Some(parent) = self.config.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| MineturError::Cache {
                message: format!("failed to create cache directory: {}", e),
            })?;
        }

        // Compact: a full download is tens of megabytes pretty-printed.
        let json = serde_json::to_string(&cached).map_err(|e| MineturError::Cache {
            message: format!("failed to serialize cache: {}", e),
        })?;

        std::fs::write(&self.config.path, json).map_err(|e| MineturError::Cache {
            message: format!("failed to write cache file: {}", e),
        })
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }
}

fn unix_now() -> Result<u64, MineturError> {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| MineturError::Cache {
            message: "system time before unix epoch".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn raw(id: &str, brand: &str) -> RawStation {
        RawStation {
            id: id.to_string(),
            brand: brand.to_string(),
            price_gasoleo_a: "1,459".to_string(),
            ..RawStation::default()
        }
    }

    #[test]
    fn save_and_load_cache() {
        let dir = tempdir().unwrap();
        let cache = StationCache::new(StationCacheConfig::new(dir.path().join("stations.json")));

        cache.save(&[raw("1", "REPSOL"), raw("2", "CEPSA")]).unwrap();

        let loaded = cache.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].brand, "REPSOL");
        assert_eq!(loaded[1].price_gasoleo_a, "1,459");
    }

    #[test]
    fn expired_cache_returns_none() {
        let dir = tempdir().unwrap();
        let config = StationCacheConfig::new(dir.path().join("stations.json"))
            .with_ttl(Duration::from_secs(0));
        let cache = StationCache::new(config);

        cache.save(&[raw("1", "REPSOL")]).unwrap();

        assert!(cache.load().is_none());
    }

    #[test]
    fn missing_cache_returns_none() {
        let cache = StationCache::new(StationCacheConfig::new("/nonexistent/path/stations.json"));
        assert!(cache.load().is_none());
    }

    #[test]
    fn corrupt_cache_returns_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stations.json");
        std::fs::write(&path, "{not json").unwrap();

        let cache = StationCache::new(StationCacheConfig::new(&path));
        assert!(cache.load().is_none());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("stations.json");
        let cache = StationCache::new(StationCacheConfig::new(&path));

        cache.save(&[raw("1", "REPSOL")]).unwrap();
        assert!(path.exists());
        assert_eq!(cache.path(), path.as_path());
    }
}
