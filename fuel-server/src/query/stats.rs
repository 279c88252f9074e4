//! Aggregates over a result set.

use serde::Serialize;

use crate::domain::FuelKind;

use super::filter::StationMatch;

/// Price spread for one fuel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    /// Number of stations with a price for the fuel.
    pub count: usize,
}

/// The match with the smallest distance; the first one on ties.
pub fn nearest<'a, 'b>(matches: &'b [StationMatch<'a>]) -> Option<&'b StationMatch<'a>> {
    matches
        .iter()
        .reduce(|best, m| if m.distance_or_inf() < best.distance_or_inf() { m } else { best })
}

/// The cheapest match within `radius_km`.
///
/// Matches without a known distance are never within a radius.
pub fn cheapest_in_radius<'a, 'b>(
    matches: &'b [StationMatch<'a>],
    radius_km: f64,
) -> Option<&'b StationMatch<'a>> {
    matches
        .iter()
        .filter(|m| m.distance_or_inf() <= radius_km)
        .reduce(|best, m| if m.price_or_inf() < best.price_or_inf() { m } else { best })
}

/// Min, max and mean price of `fuel` over the matches that sell it.
pub fn price_stats(matches: &[StationMatch<'_>], fuel: FuelKind) -> Option<PriceStats> {
    let prices: Vec<f64> = matches
        .iter()
        .filter_map(|m| m.station.price(fuel))
        .filter(|p| p.is_finite() && *p > 0.0)
        .collect();

    if prices.is_empty() {
        return None;
    }

    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = prices.iter().sum::<f64>() / prices.len() as f64;

    Some(PriceStats {
        min,
        max,
        avg,
        count: prices.len(),
    })
}

/// Everything the result page shows above the list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResultSummary<'a> {
    pub total: usize,
    pub nearest: Option<StationMatch<'a>>,
    pub cheapest_in_radius: Option<StationMatch<'a>>,
    pub price_stats: Option<PriceStats>,
    pub stats_fuel: FuelKind,
}

impl<'a> ResultSummary<'a> {
    pub fn compute(matches: &[StationMatch<'a>], radius_km: f64, fuel: FuelKind) -> Self {
        Self {
            total: matches.len(),
            nearest: nearest(matches).copied(),
            cheapest_in_radius: cheapest_in_radius(matches, radius_km).copied(),
            price_stats: price_stats(matches, fuel),
            stats_fuel: fuel,
        }
    }
}
