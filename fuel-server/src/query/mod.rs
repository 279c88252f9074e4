//! Location-aware filtering, ranking and route search.
//!
//! Everything here is a pure function over a borrowed station slice: no
//! I/O, no shared state, nothing mutated. Callers run a full pass whenever
//! the station set or the query changes.

mod defaults;
mod filter;
mod format;
mod route;
mod state;
mod stats;

pub use defaults::QueryDefaults;
pub use filter::{StationMatch, apply_filters, compare_names};
pub use format::{NOT_AVAILABLE, cheapest_summary, format_distance, format_price, location_label};
pub use route::{DETOUR_EPSILON_KM, detour_km, select_corridor};
pub use state::{QueryState, SortKey, parse_brand_list};
pub use stats::{PriceStats, ResultSummary, cheapest_in_radius, nearest, price_stats};
