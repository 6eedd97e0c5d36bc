//! Country info service.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────────┐
//!                 │                   COUNTRY INFO SERVICE                    │
//!                 │                                                           │
//!  GET /info ─────┼─▶ http ─▶ aggregation::info ──┬─▶ upstream::countries ───┼──▶ REST Countries
//!                 │                               └─▶ upstream::cities ──────┼──▶ CountriesNow
//!                 │                                                           │
//!  GET /population┼─▶ http ─▶ aggregation::statistics ─▶ countries, population┼──▶ both
//!                 │                                                           │
//!  GET /status ───┼─▶ http ─▶ health::probe (GET + POST, 5s timeout) ────────┼──▶ both
//!                 │                                                           │
//!                 │  config · observability (tracing, metrics) · lifecycle    │
//!                 └──────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use countryinfo_service::config::{load_config, loader::PORT_ENV};
use countryinfo_service::observability::{logging, metrics};
use countryinfo_service::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "countryinfo-service")]
#[command(about = "Read-only API for country info, population statistics and upstream status")]
struct Args {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.observability);

    tracing::info!("countryinfo-service v{} starting", env!("CARGO_PKG_VERSION"));
    if std::env::var(PORT_ENV).is_err() {
        tracing::info!("${} not set, using configured bind address", PORT_ENV);
    }
    tracing::info!(
        bind_address = %config.listener.bind_address,
        countries = %config.upstreams.countries_base_url,
        cities = %config.upstreams.cities_base_url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let metrics_handle = if config.observability.metrics_enabled {
        match metrics::init_metrics() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install metrics recorder, continuing without metrics");
                None
            }
        }
    } else {
        None
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let _signal_task = shutdown.trigger_on_signal();

    let server = HttpServer::new(config, metrics_handle)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
