//! Query state: everything the user can set on the search form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::FuelKind;

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Nearest first. Leaves the order unchanged when no location is known.
    #[default]
    Distance,
    /// Cheapest fuel price first; stations without prices last.
    Price,
    /// Brand name, alphabetically.
    Name,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Distance => "distance",
            SortKey::Price => "price",
            SortKey::Name => "name",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance" => Ok(SortKey::Distance),
            "price" => Ok(SortKey::Price),
            "name" => Ok(SortKey::Name),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

/// A complete set of filter and sort settings.
///
/// The default applies no filter at all and sorts by distance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    /// Free text matched against brand, address, municipality and province.
    pub search: String,
    pub radius_km: Option<f64>,
    /// Lowercase brand fragments; a station must match one.
    pub whitelist: Vec<String>,
    /// Lowercase brand fragments; a station matching any is dropped.
    pub blacklist: Vec<String>,
    /// Single brand, matched as a case-insensitive substring.
    pub brand: Option<String>,
    pub fuel: Option<FuelKind>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub open_only: bool,
    pub sort: SortKey,
    /// Result cap; `None` returns everything.
    pub max_results: Option<usize>,
}

impl QueryState {
    /// Whether either price bound is set.
    pub fn has_price_bounds(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some()
    }
}

/// Split a comma-separated brand list into lowercase fragments.
///
/// Blank fragments are dropped, so `"repsol, ,bp"` yields two entries and
/// an all-blank list means no list at all.
pub fn parse_brand_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brand_list_parsing() {
        assert_eq!(parse_brand_list("Repsol, CEPSA ,bp"), vec!["repsol", "cepsa", "bp"]);
        assert_eq!(parse_brand_list("repsol, ,"), vec!["repsol"]);
        assert!(parse_brand_list("").is_empty());
        assert!(parse_brand_list(" , ").is_empty());
    }

    #[test]
    fn sort_key_parsing() {
        assert_eq!("PRICE".parse::<SortKey>(), Ok(SortKey::Price));
        assert_eq!(" name ".parse::<SortKey>(), Ok(SortKey::Name));
        assert!("rating".parse::<SortKey>().is_err());
        assert_eq!(SortKey::default(), SortKey::Distance);
    }

    #[test]
    fn default_state_is_unfiltered() {
        let q = QueryState::default();
        assert!(q.search.is_empty());
        assert!(q.radius_km.is_none());
        assert!(!q.has_price_bounds());
        assert!(q.max_results.is_none());
    }
}
