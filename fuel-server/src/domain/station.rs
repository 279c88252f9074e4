//! Normalized fuel station record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::fuel::{CheapestFuel, FuelKind};
use super::geo::Coordinate;

/// Administrative identifiers attached to a station by the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaIds {
    pub municipality: Option<String>,
    pub province: Option<String>,
    pub region: Option<String>,
}

/// A fuel station after ingestion.
///
/// Prices only hold valid positive values; anything the feed sent that did
/// not parse is simply missing. A station without a usable coordinate is
/// still a station: it passes every non-location filter and is treated as
/// infinitely far away by the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Upstream station identifier (`IDEESS`).
    pub id: String,
    /// Brand shown on the forecourt sign.
    pub brand: String,
    pub address: String,
    pub postal_code: String,
    pub locality: String,
    pub municipality: String,
    pub province: String,
    /// Road side (`D`, `I`, `N`).
    pub margin: String,
    /// `P` (public) or `R` (restricted).
    pub sale_type: String,
    pub remission: String,
    /// Free-text weekly schedule.
    pub schedule: String,
    pub coordinate: Option<Coordinate>,
    pub prices: BTreeMap<FuelKind, f64>,
    pub area: AreaIds,
    /// Derived from `schedule` at load time.
    pub is_open: bool,
    /// Derived from `prices` at load time.
    pub cheapest: Option<CheapestFuel>,
}

impl Station {
    /// Price for a fuel, if the station posts a valid one.
    pub fn price(&self, fuel: FuelKind) -> Option<f64> {
        self.prices.get(&fuel).copied()
    }

    /// Whether the station sells the fuel at a valid price.
    pub fn sells(&self, fuel: FuelKind) -> bool {
        self.price(fuel).is_some()
    }

    /// Price of the cheapest fuel, if any.
    pub fn cheapest_price(&self) -> Option<f64> {
        self.cheapest.map(|c| c.price)
    }

    /// Distance from a point, or `None` without a coordinate.
    pub fn distance_from(&self, point: &Coordinate) -> Option<f64> {
        self.coordinate.map(|c| point.distance_to(&c))
    }
}

/// Lowest price among the cheapest-fuel candidates.
///
/// Candidates are visited in [`FuelKind::CHEAPEST_ORDER`]; only a strictly
/// lower price replaces the current pick, so ties keep the earlier fuel.
pub fn cheapest_fuel(prices: &BTreeMap<FuelKind, f64>) -> Option<CheapestFuel> {
    FuelKind::CHEAPEST_ORDER
        .iter()
        .filter_map(|fuel| {
            prices
                .get(fuel)
                .filter(|p| **p > 0.0)
                .map(|price| CheapestFuel {
                    fuel: *fuel,
                    price: *price,
                })
        })
        .fold(None, |best: Option<CheapestFuel>, candidate| match best {
            Some(b) if b.price <= candidate.price => Some(b),
            _ => Some(candidate),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices(entries: &[(FuelKind, f64)]) -> BTreeMap<FuelKind, f64> {
        entries.iter().copied().collect()
    }

    #[test]
    fn picks_lowest_price() {
        let p = prices(&[(FuelKind::Gasolina95, 1.55), (FuelKind::GasoilA, 1.40)]);
        let cheapest = cheapest_fuel(&p).unwrap();
        assert_eq!(cheapest.fuel, FuelKind::GasoilA);
        assert_eq!(cheapest.price, 1.40);
    }

    #[test]
    fn tie_goes_to_first_listed() {
        let p = prices(&[(FuelKind::Glp, 0.95), (FuelKind::GasoilB, 0.95)]);
        assert_eq!(cheapest_fuel(&p).unwrap().fuel, FuelKind::GasoilB);
    }

    #[test]
    fn ignores_fuels_outside_candidate_list() {
        let p = prices(&[(FuelKind::Gasolina95, 1.60), (FuelKind::Gasolina95E10, 1.10)]);
        assert_eq!(cheapest_fuel(&p).unwrap().fuel, FuelKind::Gasolina95);

        let only_e10 = prices(&[(FuelKind::Gasolina95E10, 1.10)]);
        assert!(cheapest_fuel(&only_e10).is_none());
    }

    #[test]
    fn no_prices_no_cheapest() {
        assert!(cheapest_fuel(&BTreeMap::new()).is_none());
    }

    #[test]
    fn non_positive_prices_skipped() {
        let p = prices(&[(FuelKind::Gasolina95, 0.0), (FuelKind::GasoilA, 1.3)]);
        assert_eq!(cheapest_fuel(&p).unwrap().fuel, FuelKind::GasoilA);
    }
}
