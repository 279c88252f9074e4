//! IP-based location lookup.

use serde::Deserialize;

use crate::domain::{Coordinate, LocationSource, UserLocation};

use super::{LocationError, USER_AGENT, get_json};

/// Default IP geolocation service.
pub const DEFAULT_IP_LOCATOR_URL: &str = "https://ipapi.co";

/// Subset of the ipapi.co response we use.
#[derive(Debug, Clone, Deserialize)]
struct IpLocationResponse {
    #[serde(alias = "lat")]
    latitude: Option<f64>,
    #[serde(alias = "lon")]
    longitude: Option<f64>,
    city: Option<String>,
    region: Option<String>,
    country_name: Option<String>,
    /// Set on rate limiting and reserved addresses.
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

/// Configuration for the IP locator.
#[derive(Debug, Clone)]
pub struct IpLocatorConfig {
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl IpLocatorConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_IP_LOCATOR_URL.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for IpLocatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Approximate location from an IP address.
#[derive(Debug, Clone)]
pub struct IpLocator {
    http: reqwest::Client,
    base_url: String,
}

impl IpLocator {
    pub fn new(config: IpLocatorConfig) -> Result<Self, LocationError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Locate an address, or the caller's own public address when `ip` is
    /// `None`.
    pub async fn locate(&self, ip: Option<&str>) -> Result<UserLocation, LocationError> {
        let url = match ip {
            Some(ip) => format!("{}/{}/json/", self.base_url, ip),
            None => format!("{}/json/", self.base_url),
        };

        let response: IpLocationResponse = get_json(self.http.get(&url)).await?;
        to_location(response)
    }
}

fn to_location(response: IpLocationResponse) -> Result<UserLocation, LocationError> {
    if response.error {
        let reason = response.reason.unwrap_or_else(|| "unknown".to_string());
        return Err(LocationError::Lookup(reason));
    }

    let (Some(latitude), Some(longitude)) = (response.latitude, response.longitude) else {
        return Err(LocationError::Lookup(
            "response carried no coordinates".to_string(),
        ));
    };

    let coordinate = Coordinate::new(latitude, longitude);
    if !coordinate.is_valid() {
        return Err(LocationError::Lookup(format!(
            "coordinates out of range: {coordinate}"
        )));
    }

    let city = response.city.unwrap_or_default();
    let region = response.region.unwrap_or_default();
    let country = response.country_name.unwrap_or_default();

    Ok(UserLocation {
        address: Some(format!("{city}, {region}, {country}")),
        city: Some(city),
        region: Some(region),
        country: Some(country),
        ..UserLocation::new(coordinate, LocationSource::Ip)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<UserLocation, LocationError> {
        to_location(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn full_response() {
        let loc = parse(
            r#"{"ip": "1.2.3.4", "city": "Madrid", "region": "Madrid",
                "country": "ES", "country_name": "Spain",
                "latitude": 40.4165, "longitude": -3.7026}"#,
        )
        .unwrap();
        assert_eq!(loc.source, LocationSource::Ip);
        assert_eq!(loc.coordinate, Coordinate::new(40.4165, -3.7026));
        assert_eq!(loc.address.as_deref(), Some("Madrid, Madrid, Spain"));
        assert_eq!(loc.country.as_deref(), Some("Spain"));
    }

    #[test]
    fn short_coordinate_names() {
        let loc = parse(r#"{"lat": 41.38, "lon": 2.17, "city": "Barcelona"}"#).unwrap();
        assert_eq!(loc.coordinate.latitude, 41.38);
        assert_eq!(loc.city.as_deref(), Some("Barcelona"));
    }

    #[test]
    fn missing_coordinates_is_lookup_failure() {
        let err = parse(r#"{"city": "Madrid"}"#).unwrap_err();
        assert!(matches!(err, LocationError::Lookup(_)));
    }

    #[test]
    fn error_flag_is_lookup_failure() {
        let err = parse(r#"{"error": true, "reason": "RateLimited"}"#).unwrap_err();
        assert_eq!(err, LocationError::Lookup("RateLimited".into()));
    }
}
