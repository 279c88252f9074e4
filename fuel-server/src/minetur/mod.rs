//! Ministry of Industry fuel price API.
//!
//! This module owns everything that knows about the upstream wire format.
//! Callers get raw station records (for caching) and a converter to
//! domain [`Station`](crate::domain::Station)s.

mod client;
mod convert;
mod error;
mod scope;
mod types;

pub use client::{DEFAULT_BASE_URL, MineturClient, MineturConfig};
pub use convert::{convert_station, convert_stations, parse_coordinate};
pub use error::MineturError;
pub use scope::{LoadScope, check_id};
pub use types::{PriceListResponse, RawStation};
