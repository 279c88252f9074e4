//! Fuel products and price parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a fuel slug is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown fuel type: {0}")]
pub struct UnknownFuel(pub String);

/// A fuel product with a published per-litre price.
///
/// The variant order is the column order of the upstream feed. Only the
/// first six take part in cheapest-fuel selection, see [`FuelKind::CHEAPEST_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FuelKind {
    Gasolina95,
    Gasolina98,
    GasoilA,
    GasoilB,
    Glp,
    Gnc,
    Gasolina95E10,
    Gasolina98E10,
    Biodiesel,
    Gnl,
    Hidrogeno,
}

impl FuelKind {
    /// Every product the feed can carry.
    pub const ALL: [FuelKind; 11] = [
        FuelKind::Gasolina95,
        FuelKind::Gasolina98,
        FuelKind::GasoilA,
        FuelKind::GasoilB,
        FuelKind::Glp,
        FuelKind::Gnc,
        FuelKind::Gasolina95E10,
        FuelKind::Gasolina98E10,
        FuelKind::Biodiesel,
        FuelKind::Gnl,
        FuelKind::Hidrogeno,
    ];

    /// Candidates for cheapest-fuel selection. Ties go to the earlier entry.
    pub const CHEAPEST_ORDER: [FuelKind; 6] = [
        FuelKind::Gasolina95,
        FuelKind::Gasolina98,
        FuelKind::GasoilA,
        FuelKind::GasoilB,
        FuelKind::Glp,
        FuelKind::Gnc,
    ];

    /// Short identifier used in query strings and JSON (`gasolina95`, `gasoilA`, ...).
    pub fn slug(&self) -> &'static str {
        match self {
            FuelKind::Gasolina95 => "gasolina95",
            FuelKind::Gasolina98 => "gasolina98",
            FuelKind::GasoilA => "gasoilA",
            FuelKind::GasoilB => "gasoilB",
            FuelKind::Glp => "glp",
            FuelKind::Gnc => "gnc",
            FuelKind::Gasolina95E10 => "gasolina95E10",
            FuelKind::Gasolina98E10 => "gasolina98E10",
            FuelKind::Biodiesel => "biodiesel",
            FuelKind::Gnl => "gnl",
            FuelKind::Hidrogeno => "hidrogeno",
        }
    }

    /// Human-readable product name.
    pub fn label(&self) -> &'static str {
        match self {
            FuelKind::Gasolina95 => "Gasolina 95",
            FuelKind::Gasolina98 => "Gasolina 98",
            FuelKind::GasoilA => "Gasóleo A",
            FuelKind::GasoilB => "Gasóleo B",
            FuelKind::Glp => "GLP",
            FuelKind::Gnc => "GNC",
            FuelKind::Gasolina95E10 => "Gasolina 95 E10",
            FuelKind::Gasolina98E10 => "Gasolina 98 E10",
            FuelKind::Biodiesel => "Biodiésel",
            FuelKind::Gnl => "GNL",
            FuelKind::Hidrogeno => "Hidrógeno",
        }
    }
}

impl fmt::Display for FuelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FuelKind {
    type Err = UnknownFuel;

    /// Parse a slug, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        FuelKind::ALL
            .into_iter()
            .find(|kind| kind.slug().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownFuel(trimmed.to_string()))
    }
}

/// Parse a locale-formatted price such as `"1,529"`.
///
/// Returns `None` for empty, unparseable, non-finite, or non-positive input,
/// all of which mean "no price".
pub fn parse_price(raw: &str) -> Option<f64> {
    let value = parse_decimal(raw)?;
    (value > 0.0).then_some(value)
}

/// Parse a decimal using comma as the decimal separator.
///
/// Dots are also accepted so already-normalised values round-trip.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: f64 = trimmed.replace(',', ".").parse().ok()?;
    value.is_finite().then_some(value)
}

/// The lowest valid price a station posts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheapestFuel {
    pub fuel: FuelKind,
    pub price: f64,
}

impl CheapestFuel {
    /// Display summary, e.g. `"Gasóleo A: 1.399 €/L"`.
    pub fn summary(&self) -> String {
        format!("{}: {:.3} €/L", self.fuel.label(), self.price)
    }
}
