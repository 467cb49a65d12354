use axum::{Router, middleware, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};

use crate::{
    Res,
    api::{self, AppState},
    config::Config,
    error::Error,
    info,
    limiter::RateGate,
    oauth::OAuthBridge,
    spotify::{Catalog, SpotifyAuth, SpotifyCatalog, TokenExchange},
    views::Templates,
};

/// Wires the gate, bridge, catalog and templates around the given upstream
/// capabilities.
pub fn build_state(
    config: &Config,
    catalog: Arc<dyn Catalog>,
    exchange: Arc<dyn TokenExchange>,
) -> Result<AppState, Error> {
    Ok(AppState {
        gate: Arc::new(RateGate::new(config.rate_limit)?),
        bridge: Arc::new(OAuthBridge::new(config, exchange)?),
        catalog,
        templates: Arc::new(Templates::new(config.template_dir.clone())),
    })
}

/// State backed by the real Spotify services. Both clients share one
/// connection pool and the per-request deadline.
pub fn spotify_state(config: &Config) -> Result<AppState, Error> {
    let client = reqwest::Client::builder()
        .timeout(config.upstream_timeout)
        .build()
        .map_err(|e| Error::Config(format!("cannot build HTTP client: {}", e)))?;

    let catalog = Arc::new(SpotifyCatalog::new(client.clone(), config));
    let exchange = Arc::new(SpotifyAuth::new(client, config));
    build_state(config, catalog, exchange)
}

/// Routes plus middleware. The access log wraps the rate limit so rejected
/// requests are logged too.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/callback", get(api::callback))
        .route("/search", get(api::search).post(api::search_form))
        .route("/health", get(api::health))
        .fallback(api::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), api::limit))
        .layer(middleware::from_fn(api::log_access))
        .with_state(state)
}

/// Binds the configured address and serves until the process is killed.
pub async fn start_api_server(config: Config) -> Res<()> {
    let state = spotify_state(&config)?;
    let app = router(state);

    let addr = SocketAddr::from_str(&config.server_address)
        .map_err(|e| format!("Failed to parse server address '{}': {}", config.server_address, e))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
