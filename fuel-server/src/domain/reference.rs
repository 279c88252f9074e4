//! Static reference listings used to populate filter options.

use serde::{Deserialize, Serialize};

/// Autonomous community (`CCAA`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
    pub id: String,
    pub name: String,
    pub region_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Municipality {
    pub id: String,
    pub name: String,
    pub province_id: Option<String>,
    pub region_id: Option<String>,
}

/// Petroleum product as listed by the API (identifiers differ from [`super::FuelKind`] slugs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub short_name: String,
}
