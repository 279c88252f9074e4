//! Which slice of the price feed to download.

use chrono::NaiveDate;
use serde::Deserialize;

use super::MineturError;

/// Upstream filter for a station load.
///
/// When several area identifiers are set, the broadest wins: region, then
/// province, then municipality. A product identifier narrows any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoadScope {
    pub region_id: Option<String>,
    pub province_id: Option<String>,
    pub municipality_id: Option<String>,
    pub product_id: Option<String>,
    /// Load the historical snapshot for this day instead of current prices.
    pub date: Option<NaiveDate>,
}

impl LoadScope {
    /// The whole country, current prices.
    pub fn all() -> Self {
        Self::default()
    }

    /// Whether this is the unfiltered, current-price load.
    pub fn is_full(&self) -> bool {
        self.area().is_none() && self.product().is_none() && self.date.is_none()
    }

    /// Relative path (below the service base URL) serving this scope.
    ///
    /// Historical paths put the date right after the endpoint name:
    /// `EstacionesTerrestresHist/FiltroCCAA/05-03-2024/13`.
    pub fn path(&self) -> String {
        let (endpoint, ids): (Option<String>, Vec<&str>) = match (self.area(), self.product()) {
            (Some((kind, id)), Some(p)) => (Some(format!("Filtro{kind}Producto")), vec![id, p]),
            (Some((kind, id)), None) => (Some(format!("Filtro{kind}")), vec![id]),
            (None, Some(p)) => (Some("FiltroProducto".to_string()), vec![p]),
            (None, None) => (None, Vec::new()),
        };

        let root = if self.date.is_some() {
            "EstacionesTerrestresHist"
        } else {
            "EstacionesTerrestres"
        };

        let mut parts = vec![root.to_string()];
        parts.extend(endpoint);
        parts.extend(self.date.map(format_date));
        parts.extend(ids.into_iter().map(str::to_string));

        if parts.len() == 1 {
            format!("{root}/")
        } else {
            parts.join("/")
        }
    }

    /// Reject identifiers that are not plain digits.
    pub fn validate(&self) -> Result<(), MineturError> {
        [
            &self.region_id,
            &self.province_id,
            &self.municipality_id,
            &self.product_id,
        ]
        .into_iter()
        .filter_map(non_blank)
        .try_for_each(|id| check_id(id).map(|_| ()))
    }

    /// Broadest area filter present, as (endpoint name, id).
    fn area(&self) -> Option<(&'static str, &str)> {
        non_blank(&self.region_id)
            .map(|id| ("CCAA", id))
            .or_else(|| non_blank(&self.province_id).map(|id| ("Provincia", id)))
            .or_else(|| non_blank(&self.municipality_id).map(|id| ("Municipio", id)))
    }

    fn product(&self) -> Option<&str> {
        non_blank(&self.product_id)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Upstream identifiers are numeric codes such as `13` or `07`.
pub fn check_id(id: &str) -> Result<&str, MineturError> {
    if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
        Ok(id)
    } else {
        Err(MineturError::InvalidId { id: id.to_string() })
    }
}

/// Historical endpoints take `dd-mm-yyyy`.
fn format_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}
