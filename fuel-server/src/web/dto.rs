//! Data transfer objects for web requests and responses.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    CheapestFuel, Coordinate, FuelKind, LocationSource, RouteQuery, Station, UserLocation,
};
use crate::geolocation::{Address, LocationError};
use crate::query::{
    PriceStats, QueryDefaults, QueryState, ResultSummary, SortKey, StationMatch, parse_brand_list,
};

/// Search form state, as sent in the query string.
///
/// Numeric fields arrive as strings because HTML forms submit empty inputs
/// as `field=`. A parameter that is absent takes the form default; one that
/// is present but empty or non-positive switches the setting off.
#[derive(Debug, Default, Deserialize)]
pub struct StationSearchRequest {
    pub search: Option<String>,

    /// User location; both or neither.
    pub lat: Option<String>,
    pub lon: Option<String>,
    /// How the location was obtained (`gps`, `manual`, `ip`).
    pub source: Option<String>,

    /// Radius in km
    pub radius: Option<String>,
    /// Comma-separated brand fragments to keep
    pub whitelist: Option<String>,
    /// Comma-separated brand fragments to drop
    pub blacklist: Option<String>,
    pub brand: Option<String>,
    /// Fuel slug, e.g. `gasoilA`
    pub fuel: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    /// Checkbox: present and not `false` means on.
    pub open_only: Option<String>,
    pub sort: Option<String>,
    pub max_results: Option<String>,
}

impl StationSearchRequest {
    /// Build the query state, filling absent fields from `defaults`.
    pub fn to_query(&self, defaults: &QueryDefaults) -> Result<QueryState, String> {
        let radius_km = match &self.radius {
            None => Some(defaults.radius_km),
            Some(raw) => positive("radius", raw)?,
        };

        let max_results = match &self.max_results {
            None => Some(defaults.max_results),
            Some(raw) => positive("max_results", raw)?.map(|n| n as usize),
        };

        Ok(QueryState {
            search: self.search.clone().unwrap_or_default(),
            radius_km,
            whitelist: self.whitelist.as_deref().map(parse_brand_list).unwrap_or_default(),
            blacklist: self.blacklist.as_deref().map(parse_brand_list).unwrap_or_default(),
            brand: non_blank(&self.brand),
            fuel: parse_fuel(&self.fuel)?,
            min_price: optional_positive("min_price", &self.min_price)?,
            max_price: optional_positive("max_price", &self.max_price)?,
            open_only: self
                .open_only
                .as_deref()
                .is_some_and(|v| !v.trim().eq_ignore_ascii_case("false")),
            sort: match non_blank(&self.sort) {
                Some(s) => s.parse::<SortKey>()?,
                None => SortKey::default(),
            },
            max_results,
        })
    }

    /// The user location carried by the request, if any.
    pub fn location(&self) -> Result<Option<UserLocation>, String> {
        let (lat, lon) = match (non_blank(&self.lat), non_blank(&self.lon)) {
            (None, None) => return Ok(None),
            (Some(lat), Some(lon)) => (lat, lon),
            _ => return Err("lat and lon must be given together".to_string()),
        };

        let coordinate = Coordinate::new(number("lat", &lat)?, number("lon", &lon)?);
        if !coordinate.is_valid() {
            return Err(format!("coordinates out of range: {lat}, {lon}"));
        }

        let source = match non_blank(&self.source) {
            Some(s) => s.parse::<LocationSource>()?,
            None => LocationSource::Manual,
        };

        Ok(Some(UserLocation::new(coordinate, source)))
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn number(field: &str, raw: &str) -> Result<f64, String> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("invalid number for {field}: {raw}"))
}

/// Empty or non-positive means "off".
fn positive(field: &str, raw: &str) -> Result<Option<f64>, String> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let value = number(field, raw)?;
    Ok((value > 0.0).then_some(value))
}

fn optional_positive(field: &str, raw: &Option<String>) -> Result<Option<f64>, String> {
    match raw {
        Some(raw) => positive(field, raw),
        None => Ok(None),
    }
}

fn parse_fuel(raw: &Option<String>) -> Result<Option<FuelKind>, String> {
    non_blank(raw)
        .map(|s| s.parse::<FuelKind>().map_err(|e| e.to_string()))
        .transpose()
}

/// Route search parameters.
#[derive(Debug, Deserialize)]
pub struct RouteSearchRequest {
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat: f64,
    pub end_lon: f64,
    /// Largest acceptable detour in km (defaults to the form default)
    pub max_detour: Option<f64>,
    /// Only stations selling this fuel
    pub fuel: Option<String>,
    pub max_results: Option<usize>,
}

impl RouteSearchRequest {
    pub fn to_route(&self, defaults: &QueryDefaults) -> Result<RouteQuery, String> {
        let start = Coordinate::new(self.start_lat, self.start_lon);
        let end = Coordinate::new(self.end_lat, self.end_lon);
        if !start.is_valid() || !end.is_valid() {
            return Err("route coordinates out of range".to_string());
        }
        let max_detour = self.max_detour.unwrap_or(defaults.max_detour_km);
        Ok(RouteQuery::new(start, end, max_detour))
    }

    pub fn fuel(&self) -> Result<Option<FuelKind>, String> {
        parse_fuel(&self.fuel)
    }
}

/// A station in JSON results.
#[derive(Debug, Clone, Serialize)]
pub struct StationResult {
    pub id: String,
    pub brand: String,
    pub address: String,
    pub postal_code: String,
    pub locality: String,
    pub municipality: String,
    pub province: String,
    pub schedule: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_open: bool,
    /// Valid prices keyed by fuel slug
    pub prices: BTreeMap<FuelKind, f64>,
    pub cheapest: Option<CheapestFuel>,
    /// Kilometres from the user or route start; absent when unknown
    pub distance_km: Option<f64>,
    /// Extra kilometres over the direct route
    pub detour_km: Option<f64>,
}

impl StationResult {
    pub fn from_match(m: &StationMatch<'_>) -> Self {
        let mut result = Self::from_station(m.station);
        result.distance_km = m.distance.filter(|d| d.is_finite());
        result.detour_km = m.detour;
        result
    }

    pub fn from_station(s: &Station) -> Self {
        Self {
            id: s.id.clone(),
            brand: s.brand.clone(),
            address: s.address.clone(),
            postal_code: s.postal_code.clone(),
            locality: s.locality.clone(),
            municipality: s.municipality.clone(),
            province: s.province.clone(),
            schedule: s.schedule.clone(),
            latitude: s.coordinate.map(|c| c.latitude),
            longitude: s.coordinate.map(|c| c.longitude),
            is_open: s.is_open,
            prices: s.prices.clone(),
            cheapest: s.cheapest,
            distance_km: None,
            detour_km: None,
        }
    }
}

/// Aggregates over the returned set.
#[derive(Debug, Serialize)]
pub struct StatsResult {
    pub total: usize,
    pub nearest: Option<StationResult>,
    pub cheapest_in_radius: Option<StationResult>,
    pub price_stats: Option<PriceStats>,
    /// Fuel the price statistics describe
    pub stats_fuel: FuelKind,
}

impl From<&ResultSummary<'_>> for StatsResult {
    fn from(summary: &ResultSummary<'_>) -> Self {
        Self {
            total: summary.total,
            nearest: summary.nearest.as_ref().map(StationResult::from_match),
            cheapest_in_radius: summary
                .cheapest_in_radius
                .as_ref()
                .map(StationResult::from_match),
            price_stats: summary.price_stats,
            stats_fuel: summary.stats_fuel,
        }
    }
}

/// Response for station search.
#[derive(Debug, Serialize)]
pub struct StationSearchResponse {
    pub stations: Vec<StationResult>,
    pub stats: StatsResult,
    /// When the station snapshot was loaded
    pub loaded_at: Option<DateTime<Utc>>,
}

/// Response for route search.
#[derive(Debug, Serialize)]
pub struct RouteSearchResponse {
    pub direct_distance_km: f64,
    pub max_detour_km: f64,
    pub stations: Vec<StationResult>,
    pub stats: StatsResult,
}

#[derive(Debug, Serialize)]
pub struct BrandsResponse {
    pub brands: Vec<String>,
}

/// Result of a (re)load.
#[derive(Debug, Serialize)]
pub struct LoadResponse {
    pub count: usize,
    /// Upstream path that was loaded
    pub source: String,
    pub loaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct IpLocationRequest {
    /// Address to look up; the server's own public address when absent
    pub ip: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReverseGeocodeRequest {
    pub lat: f64,
    pub lon: f64,
}

/// A described point, with its DMS form and whether it lies in Spain.
#[derive(Debug, Serialize)]
pub struct ReverseGeocodeResponse {
    #[serde(flatten)]
    pub address: Address,
    pub dms: String,
    pub in_spain: bool,
}

impl ReverseGeocodeResponse {
    pub fn new(coordinate: Coordinate, address: Address) -> Self {
        Self {
            address,
            dms: coordinate.to_dms(),
            in_spain: UserLocation::new(coordinate, LocationSource::Manual).is_in_spain(),
        }
    }
}

/// Two points to meet halfway between.
#[derive(Debug, Deserialize)]
pub struct MidpointRequest {
    pub lat1: f64,
    pub lon1: f64,
    pub lat2: f64,
    pub lon2: f64,
}

impl MidpointRequest {
    pub fn midpoint(&self) -> Result<UserLocation, String> {
        let a = UserLocation::manual(self.lat1, self.lon1);
        let b = UserLocation::manual(self.lat2, self.lon2);
        for point in [&a, &b] {
            if !point.coordinate.is_valid() {
                return Err(format!("coordinates out of range: {}", point.coordinate));
            }
        }
        Ok(a.midpoint(&b))
    }
}

/// Outcome of the browser's geolocation attempt.
///
/// Either a fix (`latitude` + `longitude`) or the browser's error code.
#[derive(Debug, Default, Deserialize)]
pub struct ResolveLocationRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub accuracy: Option<f64>,
    /// `GeolocationPositionError.code`; 0 or absent means unsupported
    pub error_code: Option<u16>,
}

impl ResolveLocationRequest {
    pub fn device_result(&self) -> Result<UserLocation, LocationError> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if Coordinate::new(lat, lon).is_valid() => {
                Ok(UserLocation {
                    accuracy: self.accuracy,
                    ..UserLocation::new(Coordinate::new(lat, lon), LocationSource::Gps)
                })
            }
            _ => Err(LocationError::from_device_code(self.error_code.unwrap_or(0))),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(pairs: &[(&str, &str)]) -> StationSearchRequest {
        let encoded = pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        from_query_string(&encoded)
    }

    fn from_query_string(query: &str) -> StationSearchRequest {
        let uri: axum::http::Uri = format!("/api/stations?{query}").parse().unwrap();
        axum::extract::Query::<StationSearchRequest>::try_from_uri(&uri)
            .unwrap()
            .0
    }

    #[test]
    fn absent_fields_take_defaults() {
        let q = request(&[]).to_query(&QueryDefaults::default()).unwrap();
        assert_eq!(q.radius_km, Some(10.0));
        assert_eq!(q.max_results, Some(50));
        assert_eq!(q.sort, SortKey::Distance);
        assert!(!q.open_only);
    }

    #[test]
    fn empty_and_non_positive_fields_switch_off() {
        let q = request(&[("radius", ""), ("max_results", "0"), ("min_price", "-1")])
            .to_query(&QueryDefaults::default())
            .unwrap();
        assert_eq!(q.radius_km, None);
        assert_eq!(q.max_results, None);
        assert_eq!(q.min_price, None);
    }

    #[test]
    fn full_form() {
        let q = request(&[
            ("search", "madrid"),
            ("radius", "25"),
            ("whitelist", "repsol,cepsa"),
            ("blacklist", "bp"),
            ("fuel", "gasoilA"),
            ("max_price", "1,5"),
            ("open_only", "on"),
            ("sort", "price"),
        ])
        .to_query(&QueryDefaults::default())
        .unwrap();
        assert_eq!(q.search, "madrid");
        assert_eq!(q.radius_km, Some(25.0));
        assert_eq!(q.whitelist, vec!["repsol", "cepsa"]);
        assert_eq!(q.blacklist, vec!["bp"]);
        assert_eq!(q.fuel, Some(FuelKind::GasoilA));
        assert_eq!(q.max_price, Some(1.5));
        assert!(q.open_only);
        assert_eq!(q.sort, SortKey::Price);
    }

    #[test]
    fn bad_values_rejected() {
        let d = QueryDefaults::default();
        assert!(request(&[("radius", "far")]).to_query(&d).is_err());
        assert!(request(&[("fuel", "kerosene")]).to_query(&d).is_err());
        assert!(request(&[("sort", "rating")]).to_query(&d).is_err());
    }

    #[test]
    fn location_parsing() {
        assert_eq!(request(&[]).location().unwrap(), None);

        let loc = request(&[("lat", "40.4"), ("lon", "-3.7"), ("source", "gps")])
            .location()
            .unwrap()
            .unwrap();
        assert_eq!(loc.coordinate, Coordinate::new(40.4, -3.7));
        assert_eq!(loc.source, LocationSource::Gps);

        assert!(request(&[("lat", "40.4")]).location().is_err());
        assert!(request(&[("lat", "140"), ("lon", "0")]).location().is_err());
    }

    #[test]
    fn device_result_from_resolve_request() {
        let fix = ResolveLocationRequest {
            latitude: Some(40.0),
            longitude: Some(-3.0),
            accuracy: Some(25.0),
            error_code: None,
        };
        let loc = fix.device_result().unwrap();
        assert_eq!(loc.source, LocationSource::Gps);
        assert_eq!(loc.accuracy, Some(25.0));

        let denied = ResolveLocationRequest {
            error_code: Some(1),
            ..ResolveLocationRequest::default()
        };
        assert_eq!(denied.device_result(), Err(LocationError::PermissionDenied));
    }

    #[test]
    fn infinite_distance_is_omitted() {
        let station = Station::default();
        let m = StationMatch {
            station: &station,
            distance: Some(f64::INFINITY),
            detour: None,
        };
        assert!(StationResult::from_match(&m).distance_km.is_none());
    }

    #[test]
    fn midpoint_of_two_points() {
        let req = MidpointRequest {
            lat1: 40.5,
            lon1: -3.75,
            lat2: 41.5,
            lon2: -2.75,
        };
        let mid = req.midpoint().unwrap();
        assert_eq!(mid.coordinate, Coordinate::new(41.0, -3.25));
        assert_eq!(mid.source, LocationSource::Manual);

        let bad = MidpointRequest { lat1: 95.0, ..req };
        assert!(bad.midpoint().is_err());
    }

    #[test]
    fn reverse_response_flattens_address() {
        let inside = Coordinate::new(40.5, -3.75);
        let json = serde_json::to_value(ReverseGeocodeResponse::new(
            inside,
            Address::fallback(inside),
        ))
        .unwrap();
        assert_eq!(json["dms"], "40°30'0\"N, 3°45'0\"W");
        assert_eq!(json["in_spain"], true);
        assert!(json["city"].is_string());

        let paris = Coordinate::new(48.8566, 2.3522);
        let response = ReverseGeocodeResponse::new(paris, Address::fallback(paris));
        assert!(!response.in_spain);
    }
}
