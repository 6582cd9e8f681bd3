//! Builders wiring outbound adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use isochrone_backend::domain::ports::IsochroneCacheMetrics;
use isochrone_backend::domain::{IsochroneService, NoisyRingSynthesizer};
use isochrone_backend::inbound::http::state::HttpState;
use isochrone_backend::outbound::cache::InMemoryIsochroneCache;

use super::ServerConfig;

/// Build the noise-driven synthesiser, seeded when configured.
fn build_synthesizer(config: &ServerConfig) -> NoisyRingSynthesizer {
    match config.synthesis_seed {
        Some(seed) => NoisyRingSynthesizer::seeded(seed),
        None => NoisyRingSynthesizer::from_entropy(),
    }
}

/// Build shared HTTP state around a cache-backed isochrone service.
///
/// All workers share one cache and one noise source.
pub(super) fn build_http_state(
    config: &ServerConfig,
    metrics: Arc<dyn IsochroneCacheMetrics>,
) -> web::Data<HttpState> {
    let clock = Arc::new(DefaultClock);
    let cache = Arc::new(InMemoryIsochroneCache::new(
        config.cache_policy,
        clock.clone(),
    ));
    let service = IsochroneService::new(cache, Arc::new(build_synthesizer(config)), clock)
        .with_metrics(metrics);
    web::Data::new(HttpState::new(Arc::new(service)))
}
