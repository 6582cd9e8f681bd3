//! Isochrone domain service.
//!
//! Resolves queries through the response cache and falls back to polygon
//! synthesis on a miss. Cache and metrics failures are logged and never fail
//! the query.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error, warn};

use crate::domain::ports::{
    IsochroneCache, IsochroneCacheKey, IsochroneCacheMetrics, IsochroneQuery,
    NoOpIsochroneCacheMetrics,
};
use crate::domain::synthesis::{PolygonSynthesizer, SynthesisError};
use crate::domain::{
    ATTRIBUTION, Coordinate, EngineInfo, Error, IsochroneFeature, IsochroneMetadata,
    IsochroneProperties, IsochroneRequest, IsochroneResponse, PolygonGeometry, QueryEcho,
    RangeMeters, SERVICE_NAME, WORLD_BBOX,
};

fn map_synthesis_error(center: Coordinate, range: RangeMeters, err: SynthesisError) -> Error {
    error!(
        lon = center.lon(),
        lat = center.lat(),
        range = range.get(),
        error = %err,
        "isochrone synthesis failed"
    );
    Error::from(err)
}

/// Cache-backed isochrone service implementing [`IsochroneQuery`].
#[derive(Clone)]
pub struct IsochroneService<C, S> {
    cache: Arc<C>,
    synthesizer: Arc<S>,
    metrics: Arc<dyn IsochroneCacheMetrics>,
    clock: Arc<dyn Clock>,
}

impl<C, S> IsochroneService<C, S> {
    /// Create a service with metrics disabled.
    pub fn new(cache: Arc<C>, synthesizer: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            cache,
            synthesizer,
            metrics: Arc::new(NoOpIsochroneCacheMetrics),
            clock,
        }
    }

    /// Replace the cache metrics recorder.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn IsochroneCacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }
}

impl<C, S> IsochroneService<C, S>
where
    C: IsochroneCache,
    S: PolygonSynthesizer,
{
    async fn cached(
        &self,
        request: &IsochroneRequest,
        key: &IsochroneCacheKey,
    ) -> Option<IsochroneResponse> {
        let transport = request.transport();
        match self.cache.get(key).await {
            Ok(Some(response)) => {
                debug!(%key, %transport, "isochrone cache hit");
                if let Err(err) = self.metrics.record_hit(transport).await {
                    warn!(error = %err, "failed to record isochrone cache hit");
                }
                Some(response)
            }
            Ok(None) => {
                if let Err(err) = self.metrics.record_miss(transport).await {
                    warn!(error = %err, "failed to record isochrone cache miss");
                }
                None
            }
            Err(err) => {
                warn!(%key, error = %err, "isochrone cache lookup failed; synthesising");
                if let Err(err) = self.metrics.record_miss(transport).await {
                    warn!(error = %err, "failed to record isochrone cache miss");
                }
                None
            }
        }
    }

    fn synthesize_features(
        &self,
        request: &IsochroneRequest,
    ) -> Result<Vec<IsochroneFeature>, Error> {
        let mut features = Vec::with_capacity(request.locations().len() * request.ranges().len());
        for (group_index, center) in request.locations().iter().copied().enumerate() {
            for range in request.ranges().iter().copied() {
                let ring = self
                    .synthesizer
                    .synthesize(center, range)
                    .map_err(|err| map_synthesis_error(center, range, err))?;
                features.push(IsochroneFeature {
                    geometry: PolygonGeometry {
                        coordinates: vec![ring],
                    },
                    properties: IsochroneProperties {
                        group_index,
                        value: range.get(),
                        center,
                    },
                });
            }
        }
        Ok(features)
    }
}

#[async_trait]
impl<C, S> IsochroneQuery for IsochroneService<C, S>
where
    C: IsochroneCache,
    S: PolygonSynthesizer,
{
    async fn compute(&self, request: &IsochroneRequest) -> Result<IsochroneResponse, Error> {
        let key =
            IsochroneCacheKey::derive(request.transport(), request.locations(), request.ranges());
        if let Some(response) = self.cached(request, &key).await {
            return Ok(response);
        }

        let features = self.synthesize_features(request)?;
        let response = IsochroneResponse {
            bbox: WORLD_BBOX,
            features,
            metadata: IsochroneMetadata {
                id: request.id().map(str::to_owned),
                attribution: ATTRIBUTION.to_owned(),
                service: SERVICE_NAME.to_owned(),
                timestamp: self.clock.utc().timestamp_millis(),
                query: QueryEcho::from(request),
                engine: EngineInfo::synthetic(),
            },
        };

        if let Err(err) = self.cache.put(&key, &response).await {
            warn!(%key, error = %err, "failed to store isochrone response");
        }
        Ok(response)
    }
}

#[cfg(test)]
#[path = "isochrone_service_tests.rs"]
mod tests;
