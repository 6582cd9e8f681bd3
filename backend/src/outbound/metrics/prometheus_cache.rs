//! Prometheus adapter for isochrone cache outcomes.

use async_trait::async_trait;
use prometheus::{CounterVec, Opts, Registry};

use crate::domain::TransportMode;
use crate::domain::ports::{IsochroneCacheMetrics, IsochroneCacheMetricsError};

/// Counter of cache lookups.
///
/// - **Name**: `isochrone_cache_lookups_total`
/// - **Labels**: `outcome` (`hit` or `miss`), `transport` (profile name)
pub struct PrometheusIsochroneCacheMetrics {
    lookups_total: CounterVec,
}

impl PrometheusIsochroneCacheMetrics {
    /// Create and register the counter with `registry`.
    ///
    /// # Errors
    ///
    /// Fails when a metric with the same name is already registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let lookups_total = CounterVec::new(
            Opts::new(
                "isochrone_cache_lookups_total",
                "Isochrone cache lookups by outcome and transport mode",
            ),
            &["outcome", "transport"],
        )?;
        registry.register(Box::new(lookups_total.clone()))?;
        Ok(Self { lookups_total })
    }

    fn record(&self, outcome: &str, transport: TransportMode) {
        self.lookups_total
            .with_label_values(&[outcome, transport.as_str()])
            .inc();
    }
}

#[async_trait]
impl IsochroneCacheMetrics for PrometheusIsochroneCacheMetrics {
    async fn record_hit(&self, transport: TransportMode) -> Result<(), IsochroneCacheMetricsError> {
        self.record("hit", transport);
        Ok(())
    }

    async fn record_miss(
        &self,
        transport: TransportMode,
    ) -> Result<(), IsochroneCacheMetricsError> {
        self.record("miss", transport);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn registry() -> Registry {
        Registry::new()
    }

    #[rstest]
    fn registers_counter(registry: Registry) {
        let metrics = PrometheusIsochroneCacheMetrics::new(&registry).expect("register");
        metrics.record("miss", TransportMode::DrivingCar);

        assert!(
            registry
                .gather()
                .iter()
                .any(|family| family.name() == "isochrone_cache_lookups_total")
        );
    }

    #[rstest]
    fn duplicate_registration_fails(registry: Registry) {
        let _first = PrometheusIsochroneCacheMetrics::new(&registry).expect("register");
        assert!(PrometheusIsochroneCacheMetrics::new(&registry).is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn hits_and_misses_are_labelled_by_transport(registry: Registry) {
        let metrics = PrometheusIsochroneCacheMetrics::new(&registry).expect("register");
        metrics
            .record_hit(TransportMode::FootWalking)
            .await
            .expect("record hit");
        metrics
            .record_hit(TransportMode::FootWalking)
            .await
            .expect("record hit");
        metrics
            .record_miss(TransportMode::CyclingRegular)
            .await
            .expect("record miss");

        let hits = metrics
            .lookups_total
            .with_label_values(&["hit", "foot-walking"])
            .get();
        let misses = metrics
            .lookups_total
            .with_label_values(&["miss", "cycling-regular"])
            .get();
        assert_eq!(hits as u64, 2);
        assert_eq!(misses as u64, 1);
    }
}
