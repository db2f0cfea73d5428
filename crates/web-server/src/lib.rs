use analytics::StatisticsEngine;
use anyhow::Context;
use api_client::{SeriesProvider, YahooClient};
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use configuration::{Config, ServerConfig};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
// Note: Tracing is initialised by the binary, not here.

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub provider: Arc<dyn SeriesProvider>,
    pub engine: StatisticsEngine,
    pub symbol: String,
    pub window_days: u32,
    pub max_window_days: u32,
}

impl AppState {
    pub fn new(provider: Arc<dyn SeriesProvider>, config: &Config) -> Self {
        Self {
            provider,
            engine: StatisticsEngine::new(),
            symbol: config.provider.symbol.clone(),
            window_days: config.statistics.window_days,
            max_window_days: config.statistics.max_window_days,
        }
    }
}

fn cors_layer(server: &ServerConfig) -> anyhow::Result<CorsLayer> {
    // tower-http refuses a wildcard inside an origin list.
    let any_origin = server.allowed_origins.is_empty()
        || server.allowed_origins.iter().any(|o| o.trim() == "*");
    let origins = if any_origin {
        AllowOrigin::any()
    } else {
        let origins = server
            .allowed_origins
            .iter()
            .map(|o| HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin '{}'", o)))
            .collect::<anyhow::Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(AllowHeaders::any()))
}

/// Builds the application router with CORS and request tracing attached.
pub fn build_router(state: Arc<AppState>, server: &ServerConfig) -> anyhow::Result<Router> {
    let cors = cors_layer(server)?;

    // --- DEFINE THE APPLICATION ROUTES ---
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/history", get(handlers::get_history))
        .route("/api/price", get(handlers::get_price_at))
        .route("/api/latest", get(handlers::get_latest))
        .route("/api/std", get(handlers::get_std))
        .route("/api/zscore", get(handlers::get_zscore))
        .route("/api/signal", get(handlers::get_signal))
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

/// The main function to configure and run the web server.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let provider = YahooClient::new(&config.provider).context("failed to build the price provider client")?;
    let app_state = Arc::new(AppState::new(Arc::new(provider), &config));
    let app = build_router(app_state, &config.server)?;

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(symbol = %config.provider.symbol, "Web server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
