//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use std::sync::Arc;

use isochrone_backend::Trace;
#[cfg(debug_assertions)]
use isochrone_backend::doc::ApiDoc;
use isochrone_backend::domain::ports::{IsochroneCacheMetrics, NoOpIsochroneCacheMetrics};
use isochrone_backend::inbound::http::configure_api;
use isochrone_backend::inbound::http::health::{HealthState, live, ready};
use isochrone_backend::inbound::http::state::HttpState;
#[cfg(feature = "metrics")]
use isochrone_backend::outbound::metrics::PrometheusIsochroneCacheMetrics;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Select the cache metrics adapter.
///
/// Registers Prometheus counters on the middleware registry when one is
/// configured, otherwise records nothing.
///
/// # Errors
/// Returns [`std::io::Error`] if Prometheus metric registration fails.
#[cfg(feature = "metrics")]
fn build_cache_metrics(config: &ServerConfig) -> std::io::Result<Arc<dyn IsochroneCacheMetrics>> {
    match &config.prometheus {
        Some(prom) => {
            let metrics = PrometheusIsochroneCacheMetrics::new(&prom.registry).map_err(|e| {
                std::io::Error::other(format!("cache metrics registration failed: {e}"))
            })?;
            Ok(Arc::new(metrics))
        }
        None => Ok(Arc::new(NoOpIsochroneCacheMetrics)),
    }
}

#[cfg(not(feature = "metrics"))]
fn build_cache_metrics(_config: &ServerConfig) -> std::io::Result<Arc<dyn IsochroneCacheMetrics>> {
    Ok(Arc::new(NoOpIsochroneCacheMetrics))
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure_api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// The readiness probe flips to ready once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when metric registration, binding the
/// socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let metrics = build_cache_metrics(&config)?;
    let http_state = build_http_state(&config, metrics);
    let bind_addr = config.bind_addr;

    #[cfg(feature = "metrics")]
    let prometheus = config.prometheus;

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(actix_web::middleware::Condition::from_option(
            prometheus.clone(),
        ));

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
