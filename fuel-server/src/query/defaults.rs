//! Default form values for the search page.

use crate::domain::FuelKind;

/// Values the search form starts with, and fallbacks for statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDefaults {
    /// Search radius around the user (km).
    pub radius_km: f64,

    /// Maximum number of results to return.
    pub max_results: usize,

    /// Radius for "cheapest nearby" when the query has none (km).
    pub stats_radius_km: f64,

    /// Fuel summarized by price statistics when the query names none.
    pub stats_fuel: FuelKind,

    /// Largest detour offered by the route search (km).
    pub max_detour_km: f64,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            radius_km: 10.0,
            max_results: 50,
            stats_radius_km: 50.0,
            stats_fuel: FuelKind::Gasolina95,
            max_detour_km: 5.0,
        }
    }
}
