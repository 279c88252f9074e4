//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::ReferenceCache;
use crate::geolocation::{IpLocator, ReverseGeocoder};
use crate::query::QueryDefaults;
use crate::stations::StationStore;

/// Shared application state.
///
/// Every field is cheap to clone; handlers get their own copy.
#[derive(Clone)]
pub struct AppState {
    /// Current station snapshot
    pub stations: StationStore,

    /// Memoized region/province/product listings
    pub reference: ReferenceCache,

    pub ip_locator: IpLocator,

    pub geocoder: ReverseGeocoder,

    /// Search form defaults
    pub defaults: Arc<QueryDefaults>,
}

impl AppState {
    pub fn new(
        stations: StationStore,
        reference: ReferenceCache,
        ip_locator: IpLocator,
        geocoder: ReverseGeocoder,
        defaults: QueryDefaults,
    ) -> Self {
        Self {
            stations,
            reference,
            ip_locator,
            geocoder,
            defaults: Arc::new(defaults),
        }
    }
}
