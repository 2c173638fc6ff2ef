//! Uptime Monitor Server
//!
//! Run with: cargo run
//! Single check: cargo run -- probe
//!
//! Configuration is read from `UPTIME_*` environment variables, see
//! [`MonitorConfig`]. RUST_LOG sets the log level (default: info).

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uptime_monitor::api::{build_state, run_server};
use uptime_monitor::MonitorConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "uptime_monitor=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = MonitorConfig::from_env()?;

    tracing::info!("Uptime monitor configuration:");
    tracing::info!("  Target: {}", config.probe.url);
    tracing::info!("  Expected status: {}", config.probe.expected_status);
    if !config.probe.expected_keyword.is_empty() {
        tracing::info!("  Expected keyword: {:?}", config.probe.expected_keyword);
    }
    tracing::info!(
        "  Max response time: {} ms",
        config.probe.max_response_time_ms
    );
    tracing::info!("  Probe timeout: {:?}", config.probe.timeout);
    tracing::info!("  Check interval: {:?}", config.check_interval);
    tracing::info!("  Store: {:?}", config.store);
    tracing::info!("  Notify: {:?}", config.notify);

    match std::env::args().nth(1).as_deref() {
        Some("probe") => run_single_probe(&config).await,
        Some(other) => Err(format!("unknown command `{}` (expected `probe`)", other).into()),
        None => {
            println!(
                r#"
  _   _       _   _
 | | | |_ __ | |_(_)_ __ ___   ___
 | | | | '_ \| __| | '_ ` _ \ / _ \
 | |_| | |_) | |_| | | | | | |  __/
  \___/| .__/ \__|_|_| |_| |_|\___|
       |_|

 Website Uptime Monitor
 Version: {}
"#,
                env!("CARGO_PKG_VERSION")
            );

            tracing::info!("  Host: {}:{}", config.host, config.port);
            run_server(config).await
        }
    }
}

/// Run one cycle, print its summary, and fail if the record was not stored
async fn run_single_probe(config: &MonitorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(config)?;
    let summary = state.cycle.run_once().await;

    println!("{}", serde_json::to_string_pretty(&summary)?);

    match summary.persist_error {
        Some(e) => Err(format!("check record was not stored: {}", e).into()),
        None => Ok(()),
    }
}
