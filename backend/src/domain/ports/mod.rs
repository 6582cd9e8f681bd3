//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod cache_key;
mod cache_metrics;
mod isochrone_cache;
mod isochrone_query;

pub use cache_key::{CACHE_KEY_PREFIX, IsochroneCacheKey};
#[cfg(test)]
pub use cache_metrics::MockIsochroneCacheMetrics;
pub use cache_metrics::{
    IsochroneCacheMetrics, IsochroneCacheMetricsError, NoOpIsochroneCacheMetrics,
};
#[cfg(test)]
pub use isochrone_cache::MockIsochroneCache;
pub use isochrone_cache::{DisabledIsochroneCache, IsochroneCache, IsochroneCacheError};
#[cfg(test)]
pub use isochrone_query::MockIsochroneQuery;
pub use isochrone_query::IsochroneQuery;
