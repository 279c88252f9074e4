//! Memoized reference listings.
//!
//! Regions, provinces, municipalities and products change a few times a
//! year at most, so each listing is fetched once per process and kept.
//! Failed lookups are not cached: the next request tries again.

use std::future::Future;
use std::sync::Arc;

use moka::future::Cache as MokaCache;
use tracing::{debug, warn};

use crate::domain::{Municipality, Product, Province, Region};
use crate::minetur::{MineturClient, MineturError};

/// Request parameters identifying one listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceKey {
    Regions,
    Provinces,
    ProvincesByRegion(String),
    Municipalities,
    MunicipalitiesByProvince(String),
    Products,
}

type Listing<T> = Arc<Vec<T>>;

/// Maximum number of memoized listings per kind.
const MAX_CAPACITY: u64 = 1000;

fn build<T: Send + Sync + 'static>() -> MokaCache<ReferenceKey, Listing<T>> {
    MokaCache::builder().max_capacity(MAX_CAPACITY).build()
}

/// Ministry client with memoized reference listings.
///
/// Lookups never fail from the caller's point of view: an upstream error
/// is logged and surfaces as an empty list.
#[derive(Clone)]
pub struct ReferenceCache {
    client: MineturClient,
    regions: MokaCache<ReferenceKey, Listing<Region>>,
    provinces: MokaCache<ReferenceKey, Listing<Province>>,
    municipalities: MokaCache<ReferenceKey, Listing<Municipality>>,
    products: MokaCache<ReferenceKey, Listing<Product>>,
}

impl ReferenceCache {
    pub fn new(client: MineturClient) -> Self {
        Self {
            client,
            regions: build(),
            provinces: build(),
            municipalities: build(),
            products: build(),
        }
    }

    pub async fn regions(&self) -> Listing<Region> {
        memoize(&self.regions, ReferenceKey::Regions, || self.client.regions()).await
    }

    pub async fn provinces(&self) -> Listing<Province> {
        memoize(&self.provinces, ReferenceKey::Provinces, || {
            self.client.provinces()
        })
        .await
    }

    pub async fn provinces_by_region(&self, region_id: &str) -> Listing<Province> {
        let key = ReferenceKey::ProvincesByRegion(region_id.to_string());
        memoize(&self.provinces, key, || {
            self.client.provinces_by_region(region_id)
        })
        .await
    }

    pub async fn municipalities(&self) -> Listing<Municipality> {
        memoize(&self.municipalities, ReferenceKey::Municipalities, || {
            self.client.municipalities()
        })
        .await
    }

    pub async fn municipalities_by_province(&self, province_id: &str) -> Listing<Municipality> {
        let key = ReferenceKey::MunicipalitiesByProvince(province_id.to_string());
        memoize(&self.municipalities, key, || {
            self.client.municipalities_by_province(province_id)
        })
        .await
    }

    pub async fn products(&self) -> Listing<Product> {
        memoize(&self.products, ReferenceKey::Products, || {
            self.client.products()
        })
        .await
    }

    /// Whether a listing is currently memoized.
    pub fn is_cached(&self, key: &ReferenceKey) -> bool {
        match key {
            ReferenceKey::Regions => self.regions.contains_key(key),
            ReferenceKey::Provinces | ReferenceKey::ProvincesByRegion(_) => {
                self.provinces.contains_key(key)
            }
            ReferenceKey::Municipalities | ReferenceKey::MunicipalitiesByProvince(_) => {
                self.municipalities.contains_key(key)
            }
            ReferenceKey::Products => self.products.contains_key(key),
        }
    }
}

async fn memoize<T, F, Fut>(
    cache: &MokaCache<ReferenceKey, Listing<T>>,
    key: ReferenceKey,
    fetch: F,
) -> Listing<T>
where
    T: Send + Sync + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>, MineturError>>,
{
    if let Some(hit) = cache.get(&key).await {
        return hit;
    }

    match fetch().await {
        Ok(items) => {
            debug!(?key, count = items.len(), "reference listing fetched");
            let entry = Arc::new(items);
            cache.insert(key, entry.clone()).await;
            entry
        }
        Err(e) => {
            warn!(?key, error = %e, "reference listing unavailable");
            Arc::new(Vec::new())
        }
    }
}
