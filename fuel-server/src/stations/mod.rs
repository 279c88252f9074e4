//! Station snapshot and its disk cache.
//!
//! The whole station set is downloaded at startup and on a fixed interval,
//! normalized once, and shared read-only with every request.

mod cache;
mod store;

pub use cache::{StationCache, StationCacheConfig};
pub use store::{Snapshot, StationStore, station_clock, unique_brands};
