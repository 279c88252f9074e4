//! Ministry price API response DTOs.
//!
//! These types carry the upstream field names verbatim (Spanish, with
//! accents and punctuation) and keep every value as the string the API
//! sent. Nothing outside `minetur` should see them; [`super::convert`]
//! turns them into domain types.

use serde::{Deserialize, Serialize};

/// Envelope of every `EstacionesTerrestres` response.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceListResponse {
    /// Timestamp of the price snapshot, `dd/mm/yyyy hh:mm:ss`.
    #[serde(rename = "Fecha", default)]
    pub date: String,

    /// Stations. Absent when the query matched nothing or failed upstream.
    #[serde(rename = "ListaEESSPrecio")]
    pub stations: Option<Vec<RawStation>>,

    #[serde(rename = "Nota", default)]
    pub note: String,

    /// `"OK"` on success.
    #[serde(rename = "ResultadoConsulta", default)]
    pub result: String,
}

/// One station as published by the API.
///
/// Decimal values use a comma separator (`"40,416775"`, `"1,529"`).
/// Missing price columns arrive as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawStation {
    #[serde(rename = "IDEESS")]
    pub id: String,
    #[serde(rename = "C.P.")]
    pub postal_code: String,
    #[serde(rename = "Dirección")]
    pub address: String,
    #[serde(rename = "Horario")]
    pub schedule: String,
    #[serde(rename = "Latitud")]
    pub latitude: String,
    #[serde(rename = "Localidad")]
    pub locality: String,
    #[serde(rename = "Longitud (WGS84)")]
    pub longitude: String,
    #[serde(rename = "Margen")]
    pub margin: String,
    #[serde(rename = "Municipio")]
    pub municipality: String,
    #[serde(rename = "Provincia")]
    pub province: String,
    #[serde(rename = "Remisión")]
    pub remission: String,
    #[serde(rename = "Rótulo")]
    pub brand: String,
    #[serde(rename = "Tipo Venta")]
    pub sale_type: String,

    #[serde(rename = "Precio Gasolina 95 E5")]
    pub price_gasolina_95_e5: String,
    #[serde(rename = "Precio Gasolina 98 E5")]
    pub price_gasolina_98_e5: String,
    #[serde(rename = "Precio Gasoleo A")]
    pub price_gasoleo_a: String,
    #[serde(rename = "Precio Gasoleo B")]
    pub price_gasoleo_b: String,
    #[serde(rename = "Precio Gases licuados del petróleo", alias = "Precio GLP")]
    pub price_glp: String,
    #[serde(rename = "Precio Gas Natural Comprimido", alias = "Precio GNC")]
    pub price_gnc: String,
    #[serde(rename = "Precio Gasolina 95 E10")]
    pub price_gasolina_95_e10: String,
    #[serde(rename = "Precio Gasolina 98 E10")]
    pub price_gasolina_98_e10: String,
    #[serde(rename = "Precio Biodiesel")]
    pub price_biodiesel: String,
    #[serde(rename = "Precio Gas Natural Licuado", alias = "Precio GNL")]
    pub price_gnl: String,
    #[serde(rename = "Precio Hidrogeno")]
    pub price_hidrogeno: String,

    #[serde(rename = "IDMunicipio", alias = "IDMUNICIPIO")]
    pub municipality_id: String,
    #[serde(rename = "IDProvincia", alias = "IDPROVINCIA")]
    pub province_id: String,
    #[serde(rename = "IDCCAA")]
    pub region_id: String,
}

/// Entry of `Listados/ComunidadesAutonomas`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRegion {
    #[serde(rename = "IDCCAA")]
    pub id: String,
    #[serde(rename = "CCAA")]
    pub name: String,
}

/// Entry of `Listados/Provincias` and `Listados/ProvinciasPorComunidad`.
///
/// The live API spells the identifier `IDPovincia`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProvince {
    #[serde(rename = "IDPovincia", alias = "IDProvincia")]
    pub id: String,
    #[serde(rename = "Provincia")]
    pub name: String,
    #[serde(rename = "IDCCAA", default)]
    pub region_id: String,
}

/// Entry of `Listados/Municipios` and `Listados/MunicipiosPorProvincia`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMunicipality {
    #[serde(rename = "IDMunicipio")]
    pub id: String,
    #[serde(rename = "Municipio")]
    pub name: String,
    #[serde(rename = "IDProvincia", default)]
    pub province_id: String,
    #[serde(rename = "IDCCAA", default)]
    pub region_id: String,
}

/// Entry of `Listados/ProductosPetroliferos`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProduct {
    #[serde(rename = "IDProducto")]
    pub id: String,
    #[serde(rename = "NombreProducto")]
    pub name: String,
    #[serde(rename = "NombreProductoAbreviatura", default)]
    pub short_name: String,
}
