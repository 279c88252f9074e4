//! Stations along a trip.
//!
//! Detour is the great-circle cost of the side trip:
//! `d(start, s) + d(s, end) - d(start, end)`. There is no road graph.

use crate::domain::{RouteQuery, Station};

use super::filter::StationMatch;

/// Slack absorbing floating-point error, so a station exactly on the
/// path passes a zero detour limit.
pub const DETOUR_EPSILON_KM: f64 = 1e-9;

/// Extra kilometres needed to visit `station` on the way, or `None`
/// without a coordinate.
pub fn detour_km(route: &RouteQuery, station: &Station) -> Option<f64> {
    let point = station.coordinate?;
    let direct = route.direct_distance();
    Some(route.start.distance_to(&point) + point.distance_to(&route.end) - direct)
}

/// Stations within `route.max_detour_km` of the direct path, smallest
/// detour first.
///
/// Each match carries `distance` from the start and its `detour`.
/// Stations without a coordinate are left out entirely. A negative detour
/// limit behaves like zero.
pub fn select_corridor<'a>(stations: &'a [Station], route: &RouteQuery) -> Vec<StationMatch<'a>> {
    let limit = route.max_detour_km.max(0.0) + DETOUR_EPSILON_KM;

    let mut matches: Vec<StationMatch<'a>> = stations
        .iter()
        .filter_map(|station| {
            let point = station.coordinate?;
            let detour = detour_km(route, station)?;
            (detour <= limit).then(|| StationMatch {
                station,
                distance: Some(route.start.distance_to(&point)),
                detour: Some(detour),
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        let a = a.detour.unwrap_or(f64::INFINITY);
        let b = b.detour.unwrap_or(f64::INFINITY);
        a.total_cmp(&b)
    });

    matches
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::Coordinate;
    use proptest::prelude::*;

    fn coord() -> impl Strategy<Value = Coordinate> {
        (-80.0f64..80.0, -179.0f64..179.0).prop_map(|(lat, lon)| Coordinate::new(lat, lon))
    }

    proptest! {
        #[test]
        fn detour_is_never_meaningfully_negative(start in coord(), end in coord(), point in coord()) {
            let route = RouteQuery::new(start, end, 0.0);
            let station = Station { coordinate: Some(point), ..Station::default() };
            let detour = detour_km(&route, &station).unwrap();
            prop_assert!(detour >= -1e-6, "detour {} below zero", detour);
        }

        #[test]
        fn corridor_respects_limit(start in coord(), end in coord(), point in coord(), limit in 0.0f64..2000.0) {
            let route = RouteQuery::new(start, end, limit);
            let stations = vec![Station { coordinate: Some(point), ..Station::default() }];
            for m in select_corridor(&stations, &route) {
                prop_assert!(m.detour.unwrap() <= limit + DETOUR_EPSILON_KM);
            }
        }
    }
}
