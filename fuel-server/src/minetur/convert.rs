//! Conversion from Ministry DTOs to domain types.
//!
//! This is the station normalizer: it parses comma-decimal prices and
//! coordinates, drops anything that does not parse, and derives the
//! open-now flag and cheapest fuel. Malformed input never fails a load;
//! it just turns into a missing value.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::{
    AreaIds, Coordinate, FuelKind, Municipality, Product, Province, Region, Station,
    cheapest_fuel, is_open_now, parse_decimal, parse_price,
};

use super::types::{RawMunicipality, RawProduct, RawProvince, RawRegion, RawStation};

/// Normalize a batch of raw stations.
///
/// `now` is the local time used to evaluate opening hours.
pub fn convert_stations(raw: &[RawStation], now: NaiveDateTime) -> Vec<Station> {
    let stations: Vec<Station> = raw.iter().map(|r| convert_station(r, now)).collect();

    let without_coordinates = stations.iter().filter(|s| s.coordinate.is_none()).count();
    if without_coordinates > 0 {
        debug!(
            without_coordinates,
            total = stations.len(),
            "stations without usable coordinates"
        );
    }

    stations
}

/// Normalize a single raw station.
pub fn convert_station(raw: &RawStation, now: NaiveDateTime) -> Station {
    let prices = parse_prices(raw);
    let cheapest = cheapest_fuel(&prices);

    Station {
        id: raw.id.clone(),
        brand: raw.brand.trim().to_string(),
        address: raw.address.clone(),
        postal_code: raw.postal_code.clone(),
        locality: raw.locality.clone(),
        municipality: raw.municipality.clone(),
        province: raw.province.clone(),
        margin: raw.margin.clone(),
        sale_type: raw.sale_type.clone(),
        remission: raw.remission.clone(),
        schedule: raw.schedule.clone(),
        coordinate: parse_coordinate(&raw.latitude, &raw.longitude),
        prices,
        area: AreaIds {
            municipality: non_empty(&raw.municipality_id),
            province: non_empty(&raw.province_id),
            region: non_empty(&raw.region_id),
        },
        is_open: is_open_now(&raw.schedule, now),
        cheapest,
    }
}

/// Parse a comma-decimal coordinate pair; both halves must be valid.
pub fn parse_coordinate(latitude: &str, longitude: &str) -> Option<Coordinate> {
    let coordinate = Coordinate::new(parse_decimal(latitude)?, parse_decimal(longitude)?);
    coordinate.is_valid().then_some(coordinate)
}

fn parse_prices(raw: &RawStation) -> BTreeMap<FuelKind, f64> {
    FuelKind::ALL
        .into_iter()
        .filter_map(|fuel| parse_price(raw_price(raw, fuel)).map(|price| (fuel, price)))
        .collect()
}

/// The raw price column for a fuel.
fn raw_price(raw: &RawStation, fuel: FuelKind) -> &str {
    match fuel {
        FuelKind::Gasolina95 => &raw.price_gasolina_95_e5,
        FuelKind::Gasolina98 => &raw.price_gasolina_98_e5,
        FuelKind::GasoilA => &raw.price_gasoleo_a,
        FuelKind::GasoilB => &raw.price_gasoleo_b,
        FuelKind::Glp => &raw.price_glp,
        FuelKind::Gnc => &raw.price_gnc,
        FuelKind::Gasolina95E10 => &raw.price_gasolina_95_e10,
        FuelKind::Gasolina98E10 => &raw.price_gasolina_98_e10,
        FuelKind::Biodiesel => &raw.price_biodiesel,
        FuelKind::Gnl => &raw.price_gnl,
        FuelKind::Hidrogeno => &raw.price_hidrogeno,
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn convert_region(raw: RawRegion) -> Region {
    Region {
        id: raw.id,
        name: raw.name,
    }
}

pub fn convert_province(raw: RawProvince) -> Province {
    Province {
        region_id: non_empty(&raw.region_id),
        id: raw.id,
        name: raw.name,
    }
}

pub fn convert_municipality(raw: RawMunicipality) -> Municipality {
    Municipality {
        province_id: non_empty(&raw.province_id),
        region_id: non_empty(&raw.region_id),
        id: raw.id,
        name: raw.name,
    }
}

pub fn convert_product(raw: RawProduct) -> Product {
    Product {
        id: raw.id,
        name: raw.name,
        short_name: raw.short_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// Tuesday 2024-03-12 at 12:00.
    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 12)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn raw() -> RawStation {
        RawStation {
            id: "4375".into(),
            brand: " REPSOL ".into(),
            address: "CALLE SERRANO, 10".into(),
            municipality: "Madrid".into(),
            province: "MADRID".into(),
            schedule: "L-D: 06:00-22:00".into(),
            latitude: "40,425000".into(),
            longitude: "-3,688000".into(),
            price_gasolina_95_e5: "1,629".into(),
            price_gasoleo_a: "1,459".into(),
            price_gasoleo_b: "0,000".into(),
            price_glp: "".into(),
            municipality_id: "4354".into(),
            province_id: "28".into(),
            region_id: "13".into(),
            ..RawStation::default()
        }
    }

    #[test]
    fn converts_core_fields() {
        let s = convert_station(&raw(), noon());
        assert_eq!(s.id, "4375");
        assert_eq!(s.brand, "REPSOL");
        assert_eq!(s.coordinate, Some(Coordinate::new(40.425, -3.688)));
        assert_eq!(s.area.province.as_deref(), Some("28"));
        assert!(s.is_open);
    }

    #[test]
    fn keeps_only_valid_prices() {
        let s = convert_station(&raw(), noon());
        assert_eq!(s.price(FuelKind::Gasolina95), Some(1.629));
        assert_eq!(s.price(FuelKind::GasoilA), Some(1.459));
        assert_eq!(s.price(FuelKind::GasoilB), None);
        assert_eq!(s.price(FuelKind::Glp), None);
        assert_eq!(s.prices.len(), 2);
    }

    #[test]
    fn derives_cheapest_fuel() {
        let s = convert_station(&raw(), noon());
        let cheapest = s.cheapest.unwrap();
        assert_eq!(cheapest.fuel, FuelKind::GasoilA);
        assert_eq!(cheapest.price, 1.459);
    }

    #[test]
    fn closed_outside_hours() {
        let late = NaiveDate::from_ymd_opt(2024, 3, 12)
            .unwrap()
            .and_hms_opt(23, 30, 0)
            .unwrap();
        assert!(!convert_station(&raw(), late).is_open);
    }

    #[test]
    fn unparseable_coordinate_is_none() {
        let mut r = raw();
        r.latitude = "".into();
        assert!(convert_station(&r, noon()).coordinate.is_none());

        let mut r = raw();
        r.longitude = "abc".into();
        assert!(convert_station(&r, noon()).coordinate.is_none());
    }

    #[test]
    fn out_of_range_coordinate_is_none() {
        assert!(parse_coordinate("91,0", "0,0").is_none());
        assert!(parse_coordinate("40,0", "-181,0").is_none());
        assert_eq!(
            parse_coordinate("0,0", "0,0"),
            Some(Coordinate::new(0.0, 0.0))
        );
    }

    #[test]
    fn empty_area_ids_are_none() {
        let mut r = raw();
        r.region_id = " ".into();
        assert!(convert_station(&r, noon()).area.region.is_none());
    }

    #[test]
    fn batch_preserves_order() {
        let mut second = raw();
        second.id = "9999".into();
        let stations = convert_stations(&[raw(), second], noon());
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[1].id, "9999");
    }

    #[test]
    fn province_listing_maps_region() {
        let p = convert_province(RawProvince {
            id: "28".into(),
            name: "MADRID".into(),
            region_id: "13".into(),
        });
        assert_eq!(p.region_id.as_deref(), Some("13"));

        let p = convert_province(RawProvince {
            id: "08".into(),
            name: "BARCELONA".into(),
            region_id: "".into(),
        });
        assert!(p.region_id.is_none());
    }
}
