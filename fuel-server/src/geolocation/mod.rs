//! Where is the user?
//!
//! Device fixes come from the browser; this module adds an IP-based
//! locator, reverse geocoding, and the fallback chain that combines them.

mod error;
mod geocode;
mod ip;

pub use error::LocationError;
pub use geocode::{Address, DEFAULT_GEOCODER_URL, ReverseGeocoder};
pub use ip::{DEFAULT_IP_LOCATOR_URL, IpLocator, IpLocatorConfig};

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::UserLocation;

/// Nominatim rejects requests without an identifying agent.
const USER_AGENT: &str = concat!("fuel-server/", env!("CARGO_PKG_VERSION"));

/// Resolve the user's location: the device fix if there is one, otherwise
/// an IP lookup.
pub async fn resolve_with_fallback(
    device: Result<UserLocation, LocationError>,
    ip_locator: &IpLocator,
) -> Result<UserLocation, LocationError> {
    let device_error = match device {
        Ok(location) => return Ok(location),
        Err(e) => e,
    };
    debug!(error = %device_error, "no device fix, trying IP lookup");

    ip_locator.locate(None).await.map_err(|e| {
        warn!(device = %device_error, ip = %e, "automatic location failed");
        LocationError::Exhausted
    })
}

async fn get_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, LocationError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(LocationError::Lookup(format!("HTTP {}", status.as_u16())));
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| LocationError::Lookup(e.to_string()))
}
