//! Domain types for the fuel price explorer.
//!
//! Everything here is plain in-memory data with the upstream feed's
//! quirks already removed: prices are numbers, coordinates are optional
//! points, and field names say what they hold.

mod fuel;
mod geo;
mod location;
mod reference;
mod schedule;
mod station;

pub use fuel::{CheapestFuel, FuelKind, UnknownFuel, parse_decimal, parse_price};
pub use geo::{Coordinate, EARTH_RADIUS_KM, distance_km, dms};
pub use location::{LocationSource, RouteQuery, UserLocation, test_locations};
pub use reference::{Municipality, Product, Province, Region};
pub use schedule::{is_open_at, is_open_now};
pub use station::{AreaIds, Station, cheapest_fuel};
