//! Domain port for recording isochrone cache outcomes.
//!
//! Adapters may export to Prometheus or discard the events. Failures are
//! reported back so callers can log them; they never fail a query.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::TransportMode;

define_port_error! {
    /// Errors exposed when recording cache metrics.
    pub enum IsochroneCacheMetricsError {
        /// Metric exporter rejected the write.
        Export { message: String } => "isochrone cache metrics exporter failed: {message}",
    }
}

/// Hit and miss counters labelled by transport mode.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IsochroneCacheMetrics: Send + Sync {
    /// Record a lookup served from the cache.
    async fn record_hit(&self, transport: TransportMode) -> Result<(), IsochroneCacheMetricsError>;

    /// Record a lookup that required synthesis.
    async fn record_miss(&self, transport: TransportMode)
    -> Result<(), IsochroneCacheMetricsError>;
}

/// No-op implementation used when metrics are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpIsochroneCacheMetrics;

#[async_trait]
impl IsochroneCacheMetrics for NoOpIsochroneCacheMetrics {
    async fn record_hit(
        &self,
        _transport: TransportMode,
    ) -> Result<(), IsochroneCacheMetricsError> {
        Ok(())
    }

    async fn record_miss(
        &self,
        _transport: TransportMode,
    ) -> Result<(), IsochroneCacheMetricsError> {
        Ok(())
    }
}
