//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;

use crate::geolocation::{DEFAULT_GEOCODER_URL, DEFAULT_IP_LOCATOR_URL};
use crate::minetur::DEFAULT_BASE_URL;

/// Errors building a [`ServerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is set but empty")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Ministry price service base URL.
    pub api_base_url: String,
    pub ip_locator_url: String,
    pub geocoder_url: String,
    /// Timeout for every outbound HTTP request.
    pub http_timeout_secs: u64,
    /// Seconds between background reloads; 0 disables them.
    pub refresh_interval_secs: u64,
    /// Disk cache for the full station download, if any.
    pub cache_path: Option<PathBuf>,
    pub cache_ttl_secs: u64,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    /// Zone the station opening hours are written in.
    pub timezone: Tz,
    /// Fallback log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl ServerConfig {
    /// Load from the process environment, after reading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        build_server_config(|key| std::env::var(key))
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_interval_secs > 0).then(|| Duration::from_secs(self.refresh_interval_secs))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            api_base_url: DEFAULT_BASE_URL.to_string(),
            ip_locator_url: DEFAULT_IP_LOCATOR_URL.to_string(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            http_timeout_secs: 30,
            refresh_interval_secs: 30 * 60,
            cache_path: None,
            cache_ttl_secs: 30 * 60,
            static_dir: PathBuf::from("static"),
            timezone: chrono_tz::Europe::Madrid,
            log_level: "info".to_string(),
        }
    }
}

/// Build a configuration using the provided env-var lookup function.
///
/// Every variable is optional; unset ones take the [`Default`] value.
fn build_server_config<F>(lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = ServerConfig::default();

    let optional = |var: &str| -> Result<Option<String>, ConfigError> {
        match lookup(var) {
            Ok(value) if value.trim().is_empty() => Err(ConfigError::MissingEnvVar(var.to_string())),
            Ok(value) => Ok(Some(value.trim().to_string())),
            Err(_) => Ok(None),
        }
    };

    let string_or = |var: &str, default: String| -> Result<String, ConfigError> {
        Ok(optional(var)?.unwrap_or(default))
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match optional(var)? {
            Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    };

    let bind_addr = match optional("FUEL_BIND_ADDR")? {
        Some(raw) => raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: "FUEL_BIND_ADDR".to_string(),
                reason: e.to_string(),
            })?,
        None => defaults.bind_addr,
    };

    let http_timeout_secs = parse_u64("FUEL_HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?;
    if http_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "FUEL_HTTP_TIMEOUT_SECS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let timezone = match optional("FUEL_TIMEZONE")? {
        Some(raw) => raw.parse::<Tz>().map_err(|e| ConfigError::InvalidEnvVar {
            var: "FUEL_TIMEZONE".to_string(),
            reason: e.to_string(),
        })?,
        None => defaults.timezone,
    };

    Ok(ServerConfig {
        bind_addr,
        api_base_url: string_or("FUEL_API_BASE_URL", defaults.api_base_url)?,
        ip_locator_url: string_or("FUEL_IP_LOCATOR_URL", defaults.ip_locator_url)?,
        geocoder_url: string_or("FUEL_GEOCODER_URL", defaults.geocoder_url)?,
        http_timeout_secs,
        refresh_interval_secs: parse_u64(
            "FUEL_REFRESH_INTERVAL_SECS",
            defaults.refresh_interval_secs,
        )?,
        cache_path: optional("FUEL_CACHE_PATH")?.map(PathBuf::from),
        cache_ttl_secs: parse_u64("FUEL_CACHE_TTL_SECS", defaults.cache_ttl_secs)?,
        static_dir: optional("FUEL_STATIC_DIR")?
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir),
        timezone,
        log_level: string_or("FUEL_LOG_LEVEL", defaults.log_level)?,
    })
}
