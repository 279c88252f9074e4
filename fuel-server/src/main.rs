use fuel_server::cache::ReferenceCache;
use fuel_server::config::ServerConfig;
use fuel_server::geolocation::{IpLocator, IpLocatorConfig, ReverseGeocoder};
use fuel_server::minetur::{MineturClient, MineturConfig};
use fuel_server::query::QueryDefaults;
use fuel_server::stations::{StationCache, StationCacheConfig, StationStore};
use fuel_server::web::{AppState, create_router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let minetur = MineturClient::new(
        MineturConfig::new()
            .with_base_url(&config.api_base_url)
            .with_timeout(config.http_timeout_secs),
    )?;

    let cache = config.cache_path.as_ref().map(|path| {
        StationCache::new(StationCacheConfig::new(path).with_ttl(config.cache_ttl()))
    });
    let stations = StationStore::new(minetur.clone(), cache).with_timezone(config.timezone);
    let reference = ReferenceCache::new(minetur);

    let ip_locator = IpLocator::new(
        IpLocatorConfig::new()
            .with_base_url(&config.ip_locator_url)
            .with_timeout(config.http_timeout_secs),
    )?;
    let geocoder = ReverseGeocoder::new(&config.geocoder_url, config.http_timeout_secs)?;

    // Searches answer 503 until a load succeeds; the server starts either way.
    tracing::info!("loading station prices");
    match stations.load().await {
        Ok(count) => tracing::info!(count, "station prices loaded"),
        Err(e) => tracing::error!(error = %e, "initial station load failed"),
    }

    if let Some(period) = config.refresh_interval() {
        let store = stations.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // First tick is immediate, skip it
            loop {
                interval.tick().await;
                match store.refresh_current().await {
                    Ok(count) => tracing::info!(count, "refreshed station prices"),
                    Err(e) => tracing::warn!(error = %e, "station refresh failed"),
                }
            }
        });
    }

    let state = AppState::new(
        stations,
        reference,
        ip_locator,
        geocoder,
        QueryDefaults::default(),
    );
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "fuel price explorer listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
