//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` so they only depend on
//! domain ports and stay testable without real adapters.

use std::sync::Arc;

use crate::domain::OverlapCoordinator;
use crate::domain::ports::IsochroneQuery;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Isochrone computation port.
    pub isochrones: Arc<dyn IsochroneQuery>,
    /// Marker board settle and overlap driver.
    pub overlaps: OverlapCoordinator,
}

impl HttpState {
    /// Build state around a single isochrone query port; the overlap
    /// workflow fetches through the same port.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use isochrone_backend::domain::ports::DisabledIsochroneCache;
    /// use isochrone_backend::domain::{IsochroneService, NoisyRingSynthesizer};
    /// use isochrone_backend::inbound::http::state::HttpState;
    /// use mockable::DefaultClock;
    ///
    /// let service = IsochroneService::new(
    ///     Arc::new(DisabledIsochroneCache),
    ///     Arc::new(NoisyRingSynthesizer::seeded(1)),
    ///     Arc::new(DefaultClock),
    /// );
    /// let state = HttpState::new(Arc::new(service));
    /// let _query = state.isochrones.clone();
    /// ```
    pub fn new(isochrones: Arc<dyn IsochroneQuery>) -> Self {
        Self {
            overlaps: OverlapCoordinator::new(isochrones.clone()),
            isochrones,
        }
    }
}
