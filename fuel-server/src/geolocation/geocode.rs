//! Reverse geocoding through a Nominatim-compatible service.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::Coordinate;

use super::{LocationError, USER_AGENT, get_json};

/// Default reverse geocoder (OpenStreetMap Nominatim).
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

const UNKNOWN: &str = "Desconocida";
const DEFAULT_COUNTRY: &str = "España";

/// Human-readable description of a point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address: String,
    pub city: String,
    pub region: String,
    pub country: String,
}

impl Address {
    /// Placeholder used when the point could not be described.
    pub fn fallback(coordinate: Coordinate) -> Self {
        Self {
            address: format!("{}, {}", coordinate.latitude, coordinate.longitude),
            city: UNKNOWN.to_string(),
            region: UNKNOWN.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
    #[serde(default)]
    address: AddressDetails,
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AddressDetails {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    region: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReverseGeocoder {
    http: reqwest::Client,
    base_url: String,
}

impl ReverseGeocoder {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, LocationError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Describe a point, degrading to [`Address::fallback`] on any failure.
    pub async fn reverse(&self, coordinate: Coordinate) -> Address {
        match self.try_reverse(coordinate).await {
            Ok(address) => address,
            Err(e) => {
                warn!(%coordinate, error = %e, "reverse geocoding failed");
                Address::fallback(coordinate)
            }
        }
    }

    /// Describe a point, reporting failures.
    pub async fn try_reverse(&self, coordinate: Coordinate) -> Result<Address, LocationError> {
        let url = format!("{}/reverse", self.base_url);
        let request = self.http.get(&url).query(&[
            ("format", "json".to_string()),
            ("lat", coordinate.latitude.to_string()),
            ("lon", coordinate.longitude.to_string()),
            ("addressdetails", "1".to_string()),
        ]);

        let response: ReverseResponse = get_json(request).await?;
        to_address(response, coordinate)
    }
}

fn to_address(response: ReverseResponse, coordinate: Coordinate) -> Result<Address, LocationError> {
    if let Some(error) = response.error {
        return Err(LocationError::Lookup(error));
    }

    let fallback = Address::fallback(coordinate);
    let details = response.address;

    Ok(Address {
        address: response.display_name.unwrap_or(fallback.address),
        city: details
            .city
            .or(details.town)
            .or(details.village)
            .unwrap_or(fallback.city),
        region: details.state.or(details.region).unwrap_or(fallback.region),
        country: details.country.unwrap_or(fallback.country),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn madrid() -> Coordinate {
        Coordinate::new(40.4168, -3.7038)
    }

    #[test]
    fn fallback_values() {
        let a = Address::fallback(madrid());
        assert_eq!(a.address, "40.4168, -3.7038");
        assert_eq!(a.city, "Desconocida");
        assert_eq!(a.region, "Desconocida");
        assert_eq!(a.country, "España");
    }

    #[test]
    fn town_used_when_city_missing() {
        let response: ReverseResponse = serde_json::from_str(
            r#"{"display_name": "Calle Mayor, Tres Cantos",
                "address": {"town": "Tres Cantos", "state": "Comunidad de Madrid",
                            "country": "España"}}"#,
        )
        .unwrap();
        let a = to_address(response, madrid()).unwrap();
        assert_eq!(a.city, "Tres Cantos");
        assert_eq!(a.region, "Comunidad de Madrid");
        assert_eq!(a.address, "Calle Mayor, Tres Cantos");
    }

    #[test]
    fn sparse_response_fills_defaults() {
        let response: ReverseResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(to_address(response, madrid()).unwrap(), Address::fallback(madrid()));
    }

    #[test]
    fn error_body_is_failure() {
        let response: ReverseResponse =
            serde_json::from_str(r#"{"error": "Unable to geocode"}"#).unwrap();
        assert!(to_address(response, madrid()).is_err());
    }
}
