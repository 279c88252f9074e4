//! User locations and route requests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::geo::Coordinate;

/// Approximate bounding box of mainland Spain and the Balearic Islands.
const SPAIN_NORTH: f64 = 43.9;
const SPAIN_SOUTH: f64 = 35.2;
const SPAIN_WEST: f64 = -9.5;
const SPAIN_EAST: f64 = 4.5;

/// Where a user location came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    Gps,
    Manual,
    Ip,
}

impl LocationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationSource::Gps => "gps",
            LocationSource::Manual => "manual",
            LocationSource::Ip => "ip",
        }
    }
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gps" => Ok(LocationSource::Gps),
            "manual" => Ok(LocationSource::Manual),
            "ip" => Ok(LocationSource::Ip),
            other => Err(format!("unknown location source: {other}")),
        }
    }
}

/// The user's position. Replaced wholesale whenever the user re-locates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub coordinate: Coordinate,
    /// Accuracy radius in metres, when the device reports one.
    pub accuracy: Option<f64>,
    pub source: LocationSource,
    pub address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

impl UserLocation {
    /// A bare location with no descriptive fields.
    pub fn new(coordinate: Coordinate, source: LocationSource) -> Self {
        Self {
            coordinate,
            accuracy: None,
            source,
            address: None,
            city: None,
            region: None,
            country: None,
        }
    }

    /// A location typed in by the user.
    pub fn manual(latitude: f64, longitude: f64) -> Self {
        Self::new(Coordinate::new(latitude, longitude), LocationSource::Manual)
    }

    /// Midpoint between two locations, tagged as manual.
    pub fn midpoint(&self, other: &UserLocation) -> Self {
        Self::new(
            self.coordinate.midpoint(&other.coordinate),
            LocationSource::Manual,
        )
    }

    /// Rough check against the Spanish bounding box.
    pub fn is_in_spain(&self) -> bool {
        let c = &self.coordinate;
        (SPAIN_SOUTH..=SPAIN_NORTH).contains(&c.latitude)
            && (SPAIN_WEST..=SPAIN_EAST).contains(&c.longitude)
    }

    /// Short label: `"city, region"` when known, otherwise the coordinate.
    pub fn label(&self) -> String {
        match (&self.city, &self.region) {
            (Some(city), Some(region)) => format!("{city}, {region}"),
            _ => self.coordinate.to_string(),
        }
    }
}

/// Well-known city centres, handy for demos and manual testing.
pub fn test_locations() -> Vec<UserLocation> {
    [
        (40.4168, -3.7038, "Madrid"),
        (41.3851, 2.1734, "Barcelona"),
        (39.4699, -0.3763, "Valencia"),
        (37.3891, -5.9845, "Sevilla"),
    ]
    .into_iter()
    .map(|(lat, lon, city)| UserLocation {
        city: Some(city.to_string()),
        country: Some("España".to_string()),
        ..UserLocation::manual(lat, lon)
    })
    .collect()
}

/// A trip for which stations along the way are wanted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteQuery {
    pub start: Coordinate,
    pub end: Coordinate,
    /// Largest acceptable extra distance, in kilometres.
    pub max_detour_km: f64,
}

impl RouteQuery {
    pub fn new(start: Coordinate, end: Coordinate, max_detour_km: f64) -> Self {
        Self {
            start,
            end,
            max_detour_km,
        }
    }

    /// Straight-line length of the trip.
    pub fn direct_distance(&self) -> f64 {
        self.start.distance_to(&self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_parse_and_display() {
        assert_eq!("GPS".parse::<LocationSource>(), Ok(LocationSource::Gps));
        assert_eq!(" ip ".parse::<LocationSource>(), Ok(LocationSource::Ip));
        assert!("satellite".parse::<LocationSource>().is_err());
        assert_eq!(LocationSource::Manual.to_string(), "manual");
    }

    #[test]
    fn spain_bounds() {
        assert!(UserLocation::manual(40.4168, -3.7038).is_in_spain());
        assert!(UserLocation::manual(39.57, 2.65).is_in_spain()); // Palma
        assert!(!UserLocation::manual(48.8566, 2.3522).is_in_spain()); // Paris
        assert!(!UserLocation::manual(28.1, -15.4).is_in_spain()); // Canarias, outside the box
    }

    #[test]
    fn midpoint_is_manual() {
        let mut a = UserLocation::manual(40.0, -4.0);
        a.source = LocationSource::Gps;
        let b = UserLocation::manual(42.0, -2.0);
        let mid = a.midpoint(&b);
        assert_eq!(mid.source, LocationSource::Manual);
        assert_eq!(mid.coordinate, Coordinate::new(41.0, -3.0));
    }

    #[test]
    fn label_prefers_city_and_region() {
        let mut loc = UserLocation::manual(40.4168, -3.7038);
        assert_eq!(loc.label(), "40.4168, -3.7038");
        loc.city = Some("Madrid".into());
        loc.region = Some("Comunidad de Madrid".into());
        assert_eq!(loc.label(), "Madrid, Comunidad de Madrid");
    }

    #[test]
    fn test_locations_are_spanish_cities() {
        let locs = test_locations();
        assert_eq!(locs.len(), 4);
        assert!(locs.iter().all(UserLocation::is_in_spain));
        assert_eq!(locs[0].city.as_deref(), Some("Madrid"));
    }

    #[test]
    fn route_direct_distance() {
        let route = RouteQuery::new(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 10.0), 5.0);
        assert!((route.direct_distance() - 1111.95).abs() < 0.1);
    }
}
