//! HTTP route handlers.

use std::path::Path;

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path as UrlPath, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

use crate::domain::{Municipality, Product, Province, Region, test_locations};
use crate::geolocation::{LocationError, resolve_with_fallback};
use crate::minetur::{LoadScope, MineturError, check_id};
use crate::query::{ResultSummary, apply_filters, location_label, select_corridor};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/api/stations", get(search_stations))
        .route("/api/stations/load", post(load_stations))
        .route("/api/stations/reload", post(reload_stations))
        .route("/api/stations/:id", get(station_detail))
        .route("/api/route", get(search_route))
        .route("/api/brands", get(brands))
        .route("/api/reference/regions", get(regions))
        .route("/api/reference/regions/:id/provinces", get(provinces_by_region))
        .route("/api/reference/provinces", get(provinces))
        .route("/api/reference/municipalities", get(municipalities))
        .route(
            "/api/reference/provinces/:id/municipalities",
            get(municipalities_by_province),
        )
        .route("/api/reference/products", get(products))
        .route("/api/location/ip", get(locate_ip))
        .route("/api/location/reverse", get(reverse_geocode))
        .route("/api/location/midpoint", get(midpoint))
        .route("/api/location/resolve", post(resolve_location))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search page with the filter form.
async fn index_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let (snapshot, regions) =
        futures::future::join(state.stations.snapshot(), state.reference.regions()).await;

    let template = IndexTemplate {
        fuels: FuelOption::all(),
        brands: snapshot.brands(),
        regions: regions.to_vec(),
        test_locations: test_locations().iter().map(LocationOption::from).collect(),
        radius_km: state.defaults.radius_km,
        max_results: state.defaults.max_results,
        max_detour_km: state.defaults.max_detour_km,
        station_count: snapshot.stations.len(),
        loaded_at: snapshot
            .loaded_at
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string()),
    };

    render(&template)
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    template.render().map(Html).map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })
}

/// Filter the current snapshot with the search form state.
async fn search_stations(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<StationSearchRequest>,
) -> Result<Response, AppError> {
    let query = req.to_query(&state.defaults).map_err(AppError::bad_request)?;
    let location = req.location().map_err(AppError::bad_request)?;

    let snapshot = state.stations.snapshot().await;
    if !snapshot.is_loaded() {
        return Err(AppError::not_loaded());
    }

    let matches = apply_filters(&snapshot.stations, &query, location.as_ref());
    let summary = ResultSummary::compute(
        &matches,
        query.radius_km.unwrap_or(state.defaults.stats_radius_km),
        query.fuel.unwrap_or(state.defaults.stats_fuel),
    );

    if accepts_html(&headers) {
        let template = StationListTemplate {
            stations: matches.iter().map(StationView::from_match).collect(),
            stats: StatsView::from_summary(&summary),
            location: location_label(location.as_ref()),
        };
        Ok(render(&template)?.into_response())
    } else {
        Ok(Json(StationSearchResponse {
            stations: matches.iter().map(StationResult::from_match).collect(),
            stats: StatsResult::from(&summary),
            loaded_at: snapshot.loaded_at,
        })
        .into_response())
    }
}

/// One station from the current snapshot.
async fn station_detail(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Result<Json<StationResult>, AppError> {
    let snapshot = state.stations.snapshot().await;
    snapshot
        .stations
        .iter()
        .find(|s| s.id == id)
        .map(|s| Json(StationResult::from_station(s)))
        .ok_or_else(|| AppError::NotFound {
            message: format!("no station with id {id}"),
        })
}

/// Stations along a trip, smallest detour first.
async fn search_route(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<RouteSearchRequest>,
) -> Result<Response, AppError> {
    let route = req.to_route(&state.defaults).map_err(AppError::bad_request)?;
    let fuel = req.fuel().map_err(AppError::bad_request)?;

    let snapshot = state.stations.snapshot().await;
    if !snapshot.is_loaded() {
        return Err(AppError::not_loaded());
    }

    let mut matches = select_corridor(&snapshot.stations, &route);
    if let Some(fuel) = fuel {
        matches.retain(|m| m.station.sells(fuel));
    }
    if let Some(cap) = req.max_results.filter(|n| *n > 0) {
        matches.truncate(cap);
    }

    let summary = ResultSummary::compute(
        &matches,
        state.defaults.stats_radius_km,
        fuel.unwrap_or(state.defaults.stats_fuel),
    );

    if accepts_html(&headers) {
        let template = RouteResultsTemplate {
            stations: matches.iter().map(StationView::from_match).collect(),
            stats: StatsView::from_summary(&summary),
            direct_distance: format!("{:.1} km", route.direct_distance()),
            max_detour: format!("{:.1} km", route.max_detour_km.max(0.0)),
        };
        Ok(render(&template)?.into_response())
    } else {
        Ok(Json(RouteSearchResponse {
            direct_distance_km: route.direct_distance(),
            max_detour_km: route.max_detour_km.max(0.0),
            stations: matches.iter().map(StationResult::from_match).collect(),
            stats: StatsResult::from(&summary),
        })
        .into_response())
    }
}

/// Brand names in the current snapshot.
async fn brands(State(state): State<AppState>) -> Json<BrandsResponse> {
    let snapshot = state.stations.snapshot().await;
    Json(BrandsResponse {
        brands: snapshot.brands(),
    })
}

/// Replace the snapshot with a filtered or historical load.
async fn load_stations(
    State(state): State<AppState>,
    Json(scope): Json<LoadScope>,
) -> Result<Json<LoadResponse>, AppError> {
    let source = scope.path();
    let count = state.stations.load_scoped(scope).await?;
    info!(count, %source, "stations loaded on request");

    Ok(Json(LoadResponse {
        count,
        source,
        loaded_at: state.stations.snapshot().await.loaded_at,
    }))
}

/// Download the full station list again.
async fn reload_stations(State(state): State<AppState>) -> Result<Json<LoadResponse>, AppError> {
    let count = state.stations.refresh().await?;

    Ok(Json(LoadResponse {
        count,
        source: LoadScope::all().path(),
        loaded_at: state.stations.snapshot().await.loaded_at,
    }))
}

async fn regions(State(state): State<AppState>) -> Json<Vec<Region>> {
    Json(state.reference.regions().await.to_vec())
}

async fn provinces(State(state): State<AppState>) -> Json<Vec<Province>> {
    Json(state.reference.provinces().await.to_vec())
}

async fn provinces_by_region(
    State(state): State<AppState>,
    UrlPath(region_id): UrlPath<String>,
) -> Result<Json<Vec<Province>>, AppError> {
    let region_id = check_id(&region_id)?;
    Ok(Json(state.reference.provinces_by_region(region_id).await.to_vec()))
}

async fn municipalities(State(state): State<AppState>) -> Json<Vec<Municipality>> {
    Json(state.reference.municipalities().await.to_vec())
}

async fn municipalities_by_province(
    State(state): State<AppState>,
    UrlPath(province_id): UrlPath<String>,
) -> Result<Json<Vec<Municipality>>, AppError> {
    let province_id = check_id(&province_id)?;
    Ok(Json(
        state
            .reference
            .municipalities_by_province(province_id)
            .await
            .to_vec(),
    ))
}

async fn products(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.reference.products().await.to_vec())
}

/// Approximate location from an IP address.
async fn locate_ip(
    State(state): State<AppState>,
    Query(req): Query<IpLocationRequest>,
) -> Result<Json<crate::domain::UserLocation>, AppError> {
    let location = state.ip_locator.locate(req.ip.as_deref()).await?;
    Ok(Json(location))
}

/// Describe a point; never fails, unknown parts get placeholders.
async fn reverse_geocode(
    State(state): State<AppState>,
    Query(req): Query<ReverseGeocodeRequest>,
) -> Result<Json<ReverseGeocodeResponse>, AppError> {
    let coordinate = crate::domain::Coordinate::new(req.lat, req.lon);
    if !coordinate.is_valid() {
        return Err(AppError::bad_request(format!(
            "coordinates out of range: {}, {}",
            req.lat, req.lon
        )));
    }
    let address = state.geocoder.reverse(coordinate).await;
    Ok(Json(ReverseGeocodeResponse::new(coordinate, address)))
}

/// Manual location halfway between two points.
async fn midpoint(
    Query(req): Query<MidpointRequest>,
) -> Result<Json<crate::domain::UserLocation>, AppError> {
    let location = req.midpoint().map_err(AppError::bad_request)?;
    Ok(Json(location))
}

/// Combine the browser's geolocation outcome with the IP fallback.
async fn resolve_location(
    State(state): State<AppState>,
    Json(req): Json<ResolveLocationRequest>,
) -> Result<Json<crate::domain::UserLocation>, AppError> {
    let location = resolve_with_fallback(req.device_result(), &state.ip_locator).await?;
    Ok(Json(location))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl AppError {
    fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
        }
    }

    fn not_loaded() -> Self {
        AppError::Unavailable {
            message: "station data has not been loaded yet".to_string(),
        }
    }
}

impl From<MineturError> for AppError {
    fn from(e: MineturError) -> Self {
        match e {
            MineturError::InvalidId { .. } => AppError::BadRequest {
                message: e.to_string(),
            },
            _ => AppError::Unavailable {
                message: e.to_string(),
            },
        }
    }
}

impl From<LocationError> for AppError {
    fn from(e: LocationError) -> Self {
        match e {
            LocationError::Lookup(_) | LocationError::Exhausted => AppError::Unavailable {
                message: e.to_string(),
            },
            _ => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
