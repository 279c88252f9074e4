//! Spanish fuel price explorer.
//!
//! Downloads the Ministry's station price feed, normalizes it, and
//! answers "which station should I fill up at?" by distance, price,
//! brand, opening hours, or detour from a planned trip.

pub mod cache;
pub mod config;
pub mod domain;
pub mod geolocation;
pub mod minetur;
pub mod query;
pub mod stations;
pub mod web;
