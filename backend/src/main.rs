//! Service entry-point: loads settings, wires REST endpoints and OpenAPI docs.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig as _;
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use isochrone_backend::inbound::http::health::HealthState;
use isochrone_backend::settings::IsochroneSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = IsochroneSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let config = ServerConfig::from_settings(&settings);

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(make_metrics());

    info!(
        bind_addr = %config.bind_addr(),
        seeded = settings.synthesis_seed.is_some(),
        "starting isochrone backend"
    );

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}

#[cfg(feature = "metrics")]
fn make_metrics() -> Option<PrometheusMetrics> {
    match PrometheusMetricsBuilder::new("isochrone")
        .endpoint("/metrics")
        .build()
    {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            warn!(%error, "failed to configure Prometheus metrics; continuing without them");
            None
        }
    }
}
