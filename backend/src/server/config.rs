//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;
use isochrone_backend::outbound::cache::CachePolicy;
use isochrone_backend::settings::IsochroneSettings;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cache_policy: CachePolicy,
    pub(crate) synthesis_seed: Option<u64>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a configuration with the default cache policy and an
    /// entropy-seeded noise source.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            cache_policy: CachePolicy::default(),
            synthesis_seed: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Construct a configuration from loaded settings.
    #[must_use]
    pub fn from_settings(settings: &IsochroneSettings) -> Self {
        let config = Self::new(settings.bind_addr()).with_cache_policy(settings.cache_policy());
        match settings.synthesis_seed {
            Some(seed) => config.with_synthesis_seed(seed),
            None => config,
        }
    }

    /// Replace the cache retention policy.
    #[must_use]
    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    /// Fix the noise seed so polygon shapes are reproducible across restarts.
    #[must_use]
    pub fn with_synthesis_seed(mut self, seed: u64) -> Self {
        self.synthesis_seed = Some(seed);
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use rstest::rstest;

    #[rstest]
    fn settings_flow_into_the_builder() {
        let settings = IsochroneSettings {
            host: Some([127, 0, 0, 1].into()),
            port: Some(9000),
            cache_ttl_seconds: Some(5),
            cache_max_entries: Some(3),
            synthesis_seed: Some(7),
        };

        let config = ServerConfig::from_settings(&settings);

        assert_eq!(config.bind_addr(), SocketAddr::from(([127, 0, 0, 1], 9000)));
        assert_eq!(config.cache_policy, CachePolicy::new(Duration::from_secs(5), 3));
        assert_eq!(config.synthesis_seed, Some(7));
    }

    #[rstest]
    fn new_uses_defaults() {
        let config = ServerConfig::new(SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(config.cache_policy, CachePolicy::default());
        assert!(config.synthesis_seed.is_none());
    }
}
