use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{health_check, metrics, recent_pings, trigger_probe, uptime_data, AppState};
use crate::alerts::{AlertNotifier, Notifier};
use crate::config::MonitorConfig;
use crate::probe::{ProbeCycle, ProbeScheduler};
use crate::storage::open_store;

const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

// Embed UI files at compile time
const INDEX_HTML: &str = include_str!("../ui/index.html");
const APP_JS: &str = include_str!("../ui/app.js");

// UI file handlers
async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript")],
        APP_JS,
    )
        .into_response()
}

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Dashboard
        .route("/", get(serve_index))
        .route("/ui/app.js", get(serve_app_js))
        // Health check
        .route("/health", get(health_check))
        // Read API
        .route("/recent-pings", get(recent_pings))
        .route("/metrics", get(metrics))
        .route("/uptime-data", get(uptime_data))
        // On-demand check
        .route("/probe", post(trigger_probe))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(ALLOWED_METHODS)
                .allow_headers([header::CONTENT_TYPE]),
        )
        // CorsLayer only lists methods and headers on preflight responses
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .with_state(state)
}

/// Open the store and wire the probe cycle for `config`
pub fn build_state(config: &MonitorConfig) -> Result<Arc<AppState>, Box<dyn std::error::Error>> {
    let store = open_store(&config.store)?;
    let notifier: Arc<dyn AlertNotifier> = Arc::new(Notifier::new(config.notify.clone()));
    let cycle = ProbeCycle::new(
        config.probe.clone(),
        Arc::clone(&store),
        notifier,
        config.timeouts,
    )?;

    Ok(Arc::new(AppState {
        store,
        cycle: Arc::new(cycle),
        scan_timeout: config.timeouts.store,
    }))
}

/// Run the HTTP server and the probe scheduler until Ctrl-C
pub async fn run_server(config: MonitorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(&config)?;
    tracing::info!("Storing check records in {}", state.store.location());

    // Start background scheduler
    let scheduler = Arc::new(ProbeScheduler::new(
        Arc::clone(&state.cycle),
        config.check_interval,
    ));
    let scheduler_handle = Arc::clone(&scheduler).start();

    // Build router
    let app = build_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Starting uptime monitor on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(Arc::clone(&scheduler)))
        .await?;

    scheduler_handle.abort();

    tracing::info!("Uptime monitor stopped");
    Ok(())
}

async fn shutdown_signal(scheduler: Arc<ProbeScheduler>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C signal handler");
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutdown signal received, stopping scheduler...");
    scheduler.stop();
}
