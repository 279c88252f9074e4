//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::{FuelKind, Region, UserLocation};
use crate::query::{
    PriceStats, ResultSummary, StationMatch, cheapest_summary, format_distance, format_price,
};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Search page.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub fuels: Vec<FuelOption>,
    pub brands: Vec<String>,
    pub regions: Vec<Region>,
    pub test_locations: Vec<LocationOption>,
    pub radius_km: f64,
    pub max_results: usize,
    pub max_detour_km: f64,
    pub station_count: usize,
    /// `None` until the first load finishes
    pub loaded_at: Option<String>,
}

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// Search results fragment.
#[derive(Template)]
#[template(path = "station_list.html")]
pub struct StationListTemplate {
    pub stations: Vec<StationView>,
    pub stats: StatsView,
    pub location: String,
}

/// Route search results fragment.
#[derive(Template)]
#[template(path = "route_results.html")]
pub struct RouteResultsTemplate {
    pub stations: Vec<StationView>,
    pub stats: StatsView,
    pub direct_distance: String,
    pub max_detour: String,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

#[derive(Debug, Clone)]
pub struct FuelOption {
    pub slug: &'static str,
    pub label: &'static str,
}

impl FuelOption {
    pub fn all() -> Vec<Self> {
        FuelKind::ALL
            .into_iter()
            .map(|f| Self {
                slug: f.slug(),
                label: f.label(),
            })
            .collect()
    }
}

/// A preset location offered on the search page.
#[derive(Debug, Clone)]
pub struct LocationOption {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&UserLocation> for LocationOption {
    fn from(location: &UserLocation) -> Self {
        Self {
            name: location.label(),
            latitude: location.coordinate.latitude,
            longitude: location.coordinate.longitude,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PriceView {
    pub label: &'static str,
    pub price: String,
}

/// Station row view model.
#[derive(Debug, Clone)]
pub struct StationView {
    pub id: String,
    pub brand: String,
    pub address: String,
    pub locality: String,
    pub province: String,
    pub schedule: String,
    pub is_open: bool,
    pub distance: String,
    pub detour: Option<String>,
    pub cheapest: String,
    pub prices: Vec<PriceView>,
}

impl StationView {
    pub fn from_match(m: &StationMatch<'_>) -> Self {
        let s = m.station;
        Self {
            id: s.id.clone(),
            brand: s.brand.clone(),
            address: s.address.clone(),
            locality: s.locality.clone(),
            province: s.province.clone(),
            schedule: s.schedule.clone(),
            is_open: s.is_open,
            distance: format_distance(m.distance),
            detour: m.detour.map(|d| format_distance(Some(d.max(0.0)))),
            cheapest: cheapest_summary(s.cheapest.as_ref()),
            prices: s
                .prices
                .iter()
                .map(|(fuel, price)| PriceView {
                    label: fuel.label(),
                    price: format_price(Some(*price)),
                })
                .collect(),
        }
    }

    /// Text for the open/closed badge.
    pub fn status(&self) -> &'static str {
        if self.is_open { "Abierto" } else { "Cerrado" }
    }
}

#[derive(Debug, Clone)]
pub struct PriceStatsView {
    pub min: String,
    pub max: String,
    pub avg: String,
    pub count: usize,
}

impl From<PriceStats> for PriceStatsView {
    fn from(stats: PriceStats) -> Self {
        Self {
            min: format_price(Some(stats.min)),
            max: format_price(Some(stats.max)),
            avg: format_price(Some(stats.avg)),
            count: stats.count,
        }
    }
}

/// Summary block above a result list.
#[derive(Debug, Clone)]
pub struct StatsView {
    pub total: usize,
    /// "BRAND (1.2 km)"
    pub nearest: Option<String>,
    /// "BRAND: Gasóleo A: 1.399 €/L"
    pub cheapest: Option<String>,
    pub price_stats: Option<PriceStatsView>,
    pub fuel_label: &'static str,
}

impl StatsView {
    pub fn from_summary(summary: &ResultSummary<'_>) -> Self {
        Self {
            total: summary.total,
            nearest: summary
                .nearest
                .as_ref()
                .filter(|m| m.distance.is_some_and(f64::is_finite))
                .map(|m| format!("{} ({})", m.station.brand, format_distance(m.distance))),
            cheapest: summary.cheapest_in_radius.as_ref().map(|m| {
                format!(
                    "{}: {}",
                    m.station.brand,
                    cheapest_summary(m.station.cheapest.as_ref())
                )
            }),
            price_stats: summary.price_stats.map(PriceStatsView::from),
            fuel_label: summary.stats_fuel.label(),
        }
    }
}

/// Format a defaults value for a number input.
pub fn input_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

impl IndexTemplate {
    pub fn radius_value(&self) -> String {
        input_value(self.radius_km)
    }

    pub fn detour_value(&self) -> String {
        input_value(self.max_detour_km)
    }
}
