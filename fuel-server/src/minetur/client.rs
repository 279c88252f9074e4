//! Ministry fuel price REST client.
//!
//! Wraps the public `ServiciosRESTCarburantes` service: station price
//! lists (current and historical, optionally filtered) and the reference
//! listings of regions, provinces, municipalities and products.

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{Municipality, Product, Province, Region};

use super::convert::{convert_municipality, convert_product, convert_province, convert_region};
use super::error::MineturError;
use super::scope::{LoadScope, check_id};
use super::types::{
    PriceListResponse, RawMunicipality, RawProduct, RawProvince, RawRegion, RawStation,
};

/// Default base URL of the Ministry price service.
pub const DEFAULT_BASE_URL: &str =
    "https://sedeaplicaciones.minetur.gob.es/ServiciosRESTCarburantes/PreciosCarburantes";

/// Configuration for the Ministry client.
#[derive(Debug, Clone)]
pub struct MineturConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl MineturConfig {
    /// Create a config pointing at the production service.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for MineturConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the Ministry price service.
#[derive(Debug, Clone)]
pub struct MineturClient {
    http: reqwest::Client,
    base_url: String,
}

impl MineturClient {
    /// Create a new client with the given configuration.
    pub fn new(config: MineturConfig) -> Result<Self, MineturError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch every station in the country with current prices.
    ///
    /// A response without a station list is an error here: the full
    /// listing is never legitimately empty.
    pub async fn fetch_all(&self) -> Result<Vec<RawStation>, MineturError> {
        let response: PriceListResponse = self.get_json(&LoadScope::all().path()).await?;

        let result = response.result;
        response
            .stations
            .ok_or(MineturError::MissingData { result })
    }

    /// Fetch the stations matching a scope.
    ///
    /// Filtered queries can legitimately match nothing, in which case the
    /// upstream omits the list and this returns an empty vector.
    pub async fn fetch_scoped(&self, scope: &LoadScope) -> Result<Vec<RawStation>, MineturError> {
        scope.validate()?;
        if scope.is_full() {
            return self.fetch_all().await;
        }

        let response: PriceListResponse = self.get_json(&scope.path()).await?;
        let stations = response.stations.unwrap_or_default();
        debug!(path = %scope.path(), count = stations.len(), "fetched scoped stations");
        Ok(stations)
    }

    /// Autonomous communities.
    pub async fn regions(&self) -> Result<Vec<Region>, MineturError> {
        let raw: Vec<RawRegion> = self.get_json("Listados/ComunidadesAutonomas/").await?;
        Ok(raw.into_iter().map(convert_region).collect())
    }

    /// Every province.
    pub async fn provinces(&self) -> Result<Vec<Province>, MineturError> {
        let raw: Vec<RawProvince> = self.get_json("Listados/Provincias/").await?;
        Ok(raw.into_iter().map(convert_province).collect())
    }

    /// Provinces of one autonomous community.
    pub async fn provinces_by_region(&self, region_id: &str) -> Result<Vec<Province>, MineturError> {
        let path = format!("Listados/ProvinciasPorComunidad/{}", check_id(region_id)?);
        let raw: Vec<RawProvince> = self.get_json(&path).await?;
        Ok(raw.into_iter().map(convert_province).collect())
    }

    /// Every municipality.
    pub async fn municipalities(&self) -> Result<Vec<Municipality>, MineturError> {
        let raw: Vec<RawMunicipality> = self.get_json("Listados/Municipios/").await?;
        Ok(raw.into_iter().map(convert_municipality).collect())
    }

    /// Municipalities of one province.
    pub async fn municipalities_by_province(
        &self,
        province_id: &str,
    ) -> Result<Vec<Municipality>, MineturError> {
        let path = format!("Listados/MunicipiosPorProvincia/{}", check_id(province_id)?);
        let raw: Vec<RawMunicipality> = self.get_json(&path).await?;
        Ok(raw.into_iter().map(convert_municipality).collect())
    }

    /// Petroleum products.
    pub async fn products(&self) -> Result<Vec<Product>, MineturError> {
        let raw: Vec<RawProduct> = self.get_json("Listados/ProductosPetroliferos/").await?;
        Ok(raw.into_iter().map(convert_product).collect())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, MineturError> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(MineturError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MineturError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        // The service prefixes some responses with a UTF-8 byte order mark.
        let json = body.trim_start_matches('\u{feff}');

        serde_json::from_str(json).map_err(|e| MineturError::Json {
            message: e.to_string(),
            body: Some(json.chars().take(500).collect()),
        })
    }
}
