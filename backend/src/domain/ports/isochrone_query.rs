//! Driving port for isochrone computation.
//!
//! Inbound adapters and the marker overlap workflow call this port without
//! knowing how polygons are produced or cached.

use async_trait::async_trait;

use crate::domain::{Error, IsochroneRequest, IsochroneResponse};

/// Compute reachability polygons for a validated request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IsochroneQuery: Send + Sync {
    /// Return one feature per `(location, range)` pair, location-major.
    ///
    /// Identical requests inside the cache lifetime return the same
    /// polygons.
    async fn compute(&self, request: &IsochroneRequest) -> Result<IsochroneResponse, Error>;
}
