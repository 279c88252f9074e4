//! Text shown for distances, prices and locations.

use crate::domain::{CheapestFuel, LocationSource, UserLocation};

pub const NOT_AVAILABLE: &str = "N/A";

/// `"350 m"` below one kilometre, `"12.3 km"` above, `"N/A"` when unknown.
pub fn format_distance(km: Option<f64>) -> String {
    match km {
        Some(d) if d.is_finite() && d < 1.0 => format!("{} m", (d * 1000.0).round()),
        Some(d) if d.is_finite() => format!("{d:.1} km"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// `"1.529 €/L"`, or `"N/A"` when the station posts no price.
pub fn format_price(price: Option<f64>) -> String {
    price
        .map(|p| format!("{p:.3} €/L"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn cheapest_summary(cheapest: Option<&CheapestFuel>) -> String {
    cheapest
        .map(CheapestFuel::summary)
        .unwrap_or_else(|| "Sin precios".to_string())
}

/// Header label for the current location, marked with its source.
pub fn location_label(location: Option<&UserLocation>) -> String {
    let Some(location) = location else {
        return "No establecida".to_string();
    };
    let marker = match location.source {
        LocationSource::Gps => "📍",
        LocationSource::Ip => "🌐",
        LocationSource::Manual => "📝",
    };
    format!("{marker} {}", location.label())
}
