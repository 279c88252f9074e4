//! The filter/sort pass.
//!
//! [`apply_filters`] runs the steps below in this exact order; price
//! bounds see the set after the radius cut and before sorting.
//!
//! 1. free-text search
//! 2. brand whitelist
//! 3. brand blacklist
//! 4. single brand
//! 5. fuel sold
//! 6. open now
//! 7. distance annotation and radius
//! 8. price bounds on the cheapest fuel
//! 9. sort
//! 10. result cap

use std::cmp::Ordering;

use serde::Serialize;

use crate::domain::{Station, UserLocation};

use super::state::{QueryState, SortKey};

/// A station selected by a query, with per-query annotations.
///
/// Stations are borrowed from the snapshot and never modified; the
/// distance and detour exist only for the lifetime of the result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StationMatch<'a> {
    pub station: &'a Station,
    /// Kilometres from the user (or route start). Infinite for stations
    /// without a coordinate; `None` when no reference point was given.
    pub distance: Option<f64>,
    /// Extra kilometres over the direct route, for corridor results.
    pub detour: Option<f64>,
}

impl<'a> StationMatch<'a> {
    pub fn new(station: &'a Station) -> Self {
        Self {
            station,
            distance: None,
            detour: None,
        }
    }

    /// Distance for ordering: unknown sorts last.
    pub fn distance_or_inf(&self) -> f64 {
        self.distance.unwrap_or(f64::INFINITY)
    }

    /// Cheapest price for ordering: unknown sorts last.
    pub fn price_or_inf(&self) -> f64 {
        self.station.cheapest_price().unwrap_or(f64::INFINITY)
    }
}

/// Run one full filter pass over `stations`.
pub fn apply_filters<'a>(
    stations: &'a [Station],
    query: &QueryState,
    location: Option<&UserLocation>,
) -> Vec<StationMatch<'a>> {
    let search = query.search.trim().to_lowercase();
    let brand = query
        .brand
        .as_deref()
        .map(|b| b.trim().to_lowercase())
        .filter(|b| !b.is_empty());

    let mut matches: Vec<StationMatch<'a>> = stations
        .iter()
        .filter(|s| search.is_empty() || matches_search(s, &search))
        .filter(|s| query.whitelist.is_empty() || brand_contains_any(s, &query.whitelist))
        .filter(|s| !brand_contains_any(s, &query.blacklist))
        .filter(|s| brand.as_ref().is_none_or(|b| s.brand.to_lowercase().contains(b)))
        .filter(|s| query.fuel.is_none_or(|fuel| s.sells(fuel)))
        .filter(|s| !query.open_only || s.is_open)
        .map(StationMatch::new)
        .collect();

    if let Some(location) = location {
        for m in &mut matches {
            m.distance = Some(
                m.station
                    .distance_from(&location.coordinate)
                    .unwrap_or(f64::INFINITY),
            );
        }
        if let Some(radius) = query.radius_km {
            matches.retain(|m| m.distance_or_inf() <= radius);
        }
    }

    if query.has_price_bounds() {
        matches.retain(|m| within_price_bounds(m.station, query.min_price, query.max_price));
    }

    sort_matches(&mut matches, query.sort, location.is_some());

    if let Some(cap) = query.max_results.filter(|n| *n > 0) {
        matches.truncate(cap);
    }

    matches
}

fn matches_search(station: &Station, term: &str) -> bool {
    [
        &station.brand,
        &station.address,
        &station.municipality,
        &station.province,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(term))
}

fn brand_contains_any(station: &Station, fragments: &[String]) -> bool {
    let brand = station.brand.to_lowercase();
    fragments
        .iter()
        .map(|f| f.trim().to_lowercase())
        .any(|f| !f.is_empty() && brand.contains(&f))
}

/// Stations without a cheapest fuel never satisfy a price bound.
fn within_price_bounds(station: &Station, min: Option<f64>, max: Option<f64>) -> bool {
    let Some(price) = station.cheapest_price() else {
        return false;
    };
    min.is_none_or(|min| price >= min) && max.is_none_or(|max| price <= max)
}

/// Stable sort by the requested key.
fn sort_matches(matches: &mut [StationMatch<'_>], key: SortKey, has_location: bool) {
    match key {
        SortKey::Distance if has_location => {
            matches.sort_by(|a, b| a.distance_or_inf().total_cmp(&b.distance_or_inf()))
        }
        SortKey::Distance => {}
        SortKey::Price => matches.sort_by(|a, b| a.price_or_inf().total_cmp(&b.price_or_inf())),
        SortKey::Name => matches.sort_by(|a, b| compare_names(&a.station.brand, &b.station.brand)),
    }
}

/// Alphabetical comparison that ignores case and Spanish accents, falling
/// back to the raw text so the order is total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

fn fold(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CheapestFuel, Coordinate, FuelKind};
    use std::collections::BTreeMap;

    fn station(id: &str, brand: &str, lat: f64, lon: f64, diesel: Option<f64>) -> Station {
        let prices: BTreeMap<FuelKind, f64> = diesel
            .map(|p| (FuelKind::GasoilA, p))
            .into_iter()
            .collect();
        Station {
            id: id.to_string(),
            brand: brand.to_string(),
            coordinate: Some(Coordinate::new(lat, lon)),
            cheapest: diesel.map(|price| CheapestFuel {
                fuel: FuelKind::GasoilA,
                price,
            }),
            prices,
            is_open: true,
            ..Station::default()
        }
    }

    fn ids(matches: &[StationMatch<'_>]) -> Vec<String> {
        matches.iter().map(|m| m.station.id.clone()).collect()
    }

    fn at(lat: f64, lon: f64) -> UserLocation {
        UserLocation::manual(lat, lon)
    }

    #[test]
    fn radius_keeps_nearby_and_drops_far() {
        // 0.45 degrees of latitude is about 50 km.
        let stations = vec![
            station("here", "REPSOL", 40.0, -3.0, Some(1.5)),
            station("far", "CEPSA", 40.45, -3.0, Some(1.4)),
        ];
        let query = QueryState {
            radius_km: Some(10.0),
            ..QueryState::default()
        };

        let result = apply_filters(&stations, &query, Some(&at(40.0, -3.0)));
        assert_eq!(ids(&result), vec!["here"]);
        assert!(result[0].distance.unwrap() < 1e-9);
    }

    #[test]
    fn missing_coordinate_is_infinitely_far() {
        let mut lost = station("lost", "BP", 0.0, 0.0, Some(1.5));
        lost.coordinate = None;
        let stations = vec![lost, station("near", "BP", 40.0, -3.0, None)];

        let unbounded = apply_filters(&stations, &QueryState::default(), Some(&at(40.0, -3.0)));
        assert_eq!(ids(&unbounded), vec!["near", "lost"]);
        assert_eq!(unbounded[1].distance, Some(f64::INFINITY));

        let bounded = QueryState {
            radius_km: Some(1000.0),
            ..QueryState::default()
        };
        let result = apply_filters(&stations, &bounded, Some(&at(40.0, -3.0)));
        assert_eq!(ids(&result), vec!["near"]);
    }

    #[test]
    fn no_location_means_no_distance_and_no_radius() {
        let stations = vec![
            station("b", "B", 41.0, 2.0, None),
            station("a", "A", 40.0, -3.0, None),
        ];
        let query = QueryState {
            radius_km: Some(1.0),
            ..QueryState::default()
        };
        let result = apply_filters(&stations, &query, None);
        assert_eq!(ids(&result), vec!["b", "a"]);
        assert!(result.iter().all(|m| m.distance.is_none()));
    }

    #[test]
    fn search_matches_any_text_field() {
        let mut s1 = station("1", "REPSOL", 40.0, -3.0, None);
        s1.address = "AVENIDA DE ANDALUCIA".into();
        let mut s2 = station("2", "CEPSA", 40.0, -3.0, None);
        s2.province = "SEVILLA".into();
        let s3 = station("3", "BP", 40.0, -3.0, None);
        let stations = vec![s1, s2, s3];

        let q = |term: &str| QueryState {
            search: term.to_string(),
            ..QueryState::default()
        };
        assert_eq!(ids(&apply_filters(&stations, &q("andalucia"), None)), vec!["1"]);
        assert_eq!(ids(&apply_filters(&stations, &q("Sevilla"), None)), vec!["2"]);
        assert_eq!(ids(&apply_filters(&stations, &q("bp"), None)), vec!["3"]);
    }

    #[test]
    fn whitelist_blacklist_and_brand() {
        let stations = vec![
            station("1", "REPSOL", 40.0, -3.0, None),
            station("2", "CEPSA", 40.0, -3.0, None),
            station("3", "BP OIL", 40.0, -3.0, None),
            station("4", "PETRONOR", 40.0, -3.0, None),
        ];

        let white = QueryState {
            whitelist: vec!["repsol".into(), "bp".into()],
            ..QueryState::default()
        };
        assert_eq!(ids(&apply_filters(&stations, &white, None)), vec!["1", "3"]);

        let black = QueryState {
            blacklist: vec!["cepsa".into(), "oil".into()],
            ..QueryState::default()
        };
        assert_eq!(ids(&apply_filters(&stations, &black, None)), vec!["1", "4"]);

        let brand = QueryState {
            brand: Some("Petro".into()),
            ..QueryState::default()
        };
        assert_eq!(ids(&apply_filters(&stations, &brand, None)), vec!["4"]);
    }

    #[test]
    fn brand_lists_ignore_fragment_case() {
        let stations = vec![
            station("1", "REPSOL", 40.0, -3.0, None),
            station("2", "Cepsa", 40.0, -3.0, None),
        ];

        let white = QueryState {
            whitelist: vec!["Repsol".into()],
            ..QueryState::default()
        };
        assert_eq!(ids(&apply_filters(&stations, &white, None)), vec!["1"]);

        let black = QueryState {
            blacklist: vec![" CEPSA ".into()],
            ..QueryState::default()
        };
        assert_eq!(ids(&apply_filters(&stations, &black, None)), vec!["1"]);
    }

    #[test]
    fn fuel_and_open_filters() {
        let mut closed = station("closed", "A", 40.0, -3.0, Some(1.3));
        closed.is_open = false;
        let stations = vec![
            closed,
            station("dry", "B", 40.0, -3.0, None),
            station("ok", "C", 40.0, -3.0, Some(1.4)),
        ];

        let fuel = QueryState {
            fuel: Some(FuelKind::GasoilA),
            ..QueryState::default()
        };
        assert_eq!(ids(&apply_filters(&stations, &fuel, None)), vec!["closed", "ok"]);

        let open = QueryState {
            open_only: true,
            ..QueryState::default()
        };
        assert_eq!(ids(&apply_filters(&stations, &open, None)), vec!["dry", "ok"]);
    }

    #[test]
    fn price_bounds_drop_stations_without_prices() {
        let stations = vec![
            station("cheap", "A", 40.0, -3.0, Some(1.20)),
            station("mid", "B", 40.0, -3.0, Some(1.50)),
            station("dear", "C", 40.0, -3.0, Some(1.90)),
            station("none", "D", 40.0, -3.0, None),
        ];

        let both = QueryState {
            min_price: Some(1.3),
            max_price: Some(1.8),
            ..QueryState::default()
        };
        assert_eq!(ids(&apply_filters(&stations, &both, None)), vec!["mid"]);

        let max_only = QueryState {
            max_price: Some(1.5),
            ..QueryState::default()
        };
        assert_eq!(ids(&apply_filters(&stations, &max_only, None)), vec!["cheap", "mid"]);
    }

    #[test]
    fn price_bounds_apply_after_radius() {
        let stations = vec![
            station("near-dear", "A", 40.0, -3.0, Some(1.9)),
            station("far-cheap", "B", 41.0, -3.0, Some(1.1)),
        ];
        let query = QueryState {
            radius_km: Some(10.0),
            max_price: Some(1.5),
            ..QueryState::default()
        };
        assert!(apply_filters(&stations, &query, Some(&at(40.0, -3.0))).is_empty());
    }

    #[test]
    fn sort_by_distance_and_price() {
        let stations = vec![
            station("far", "A", 40.2, -3.0, Some(1.2)),
            station("none", "B", 40.0, -3.0, None),
            station("near", "C", 40.1, -3.0, Some(1.6)),
        ];
        let loc = at(40.0, -3.0);

        let by_distance = apply_filters(&stations, &QueryState::default(), Some(&loc));
        assert_eq!(ids(&by_distance), vec!["none", "near", "far"]);

        let by_price = QueryState {
            sort: SortKey::Price,
            ..QueryState::default()
        };
        assert_eq!(
            ids(&apply_filters(&stations, &by_price, Some(&loc))),
            vec!["far", "near", "none"]
        );
    }

    #[test]
    fn sort_by_name_alphabetical() {
        let stations = vec![
            station("1", "Repsol", 40.0, -3.0, None),
            station("2", "Cepsa", 40.0, -3.0, None),
            station("3", "BP", 40.0, -3.0, None),
        ];
        let query = QueryState {
            sort: SortKey::Name,
            ..QueryState::default()
        };
        let brands: Vec<&str> = apply_filters(&stations, &query, None)
            .iter()
            .map(|m| m.station.brand.as_str())
            .collect();
        assert_eq!(brands, vec!["BP", "Cepsa", "Repsol"]);
    }

    #[test]
    fn name_comparison_ignores_case_and_accents() {
        assert_eq!(compare_names("Álvarez", "alonso"), Ordering::Greater);
        assert_eq!(compare_names("ángel", "Azul"), Ordering::Less);
        assert_eq!(compare_names("bp", "BP"), Ordering::Greater);
    }

    #[test]
    fn cap_truncates_after_sort() {
        let stations: Vec<Station> = (0..5)
            .map(|i| station(&i.to_string(), "X", 40.0 + i as f64 * 0.01, -3.0, None))
            .rev()
            .collect();
        let query = QueryState {
            max_results: Some(2),
            ..QueryState::default()
        };
        assert_eq!(
            ids(&apply_filters(&stations, &query, Some(&at(40.0, -3.0)))),
            vec!["0", "1"]
        );

        let zero = QueryState {
            max_results: Some(0),
            ..QueryState::default()
        };
        assert_eq!(apply_filters(&stations, &zero, None).len(), 5);
    }

    #[test]
    fn input_is_not_modified() {
        let stations = vec![station("1", "A", 40.0, -3.0, Some(1.2))];
        let before = stations.clone();
        let _ = apply_filters(&stations, &QueryState::default(), Some(&at(41.0, -3.0)));
        assert_eq!(stations, before);
    }

    #[test]
    fn empty_input() {
        assert!(apply_filters(&[], &QueryState::default(), None).is_empty());
    }
}
