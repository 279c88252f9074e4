//! Location failure types.

/// Why a location could not be obtained.
///
/// The first four mirror the failures a browser reports for a device fix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location information unavailable")]
    Unavailable,

    #[error("timed out waiting for a location fix")]
    Timeout,

    #[error("geolocation is not supported by this client")]
    Unsupported,

    /// An IP location or geocoding service failed
    #[error("location lookup failed: {0}")]
    Lookup(String),

    /// Every source in the fallback chain failed
    #[error("could not determine location automatically")]
    Exhausted,
}

impl LocationError {
    /// Map a browser `GeolocationPositionError.code` onto a device failure.
    ///
    /// Codes are 1 (permission denied), 2 (position unavailable) and
    /// 3 (timeout); anything else means the browser has no geolocation.
    pub fn from_device_code(code: u16) -> Self {
        match code {
            1 => LocationError::PermissionDenied,
            2 => LocationError::Unavailable,
            3 => LocationError::Timeout,
            _ => LocationError::Unsupported,
        }
    }
}

impl From<reqwest::Error> for LocationError {
    fn from(e: reqwest::Error) -> Self {
        LocationError::Lookup(e.to_string())
    }
}
