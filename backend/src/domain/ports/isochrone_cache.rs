//! Port interface for caching computed isochrone responses.
use async_trait::async_trait;

use super::{IsochroneCacheKey, define_port_error};
use crate::domain::IsochroneResponse;

define_port_error! {
    /// Errors surfaced by the caching adapter.
    pub enum IsochroneCacheError {
        /// Cache backend is unavailable or its state is unusable.
        Backend { message: String } => "isochrone cache backend failure: {message}",
    }
}

/// Response cache keyed by [`IsochroneCacheKey`].
///
/// Implementations decide retention. A `get` after expiry reports a miss.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IsochroneCache: Send + Sync {
    /// Read a cached response for the given key.
    async fn get(
        &self,
        key: &IsochroneCacheKey,
    ) -> Result<Option<IsochroneResponse>, IsochroneCacheError>;

    /// Store a response under the supplied key, replacing any previous entry.
    async fn put(
        &self,
        key: &IsochroneCacheKey,
        response: &IsochroneResponse,
    ) -> Result<(), IsochroneCacheError>;
}

/// Cache that never retains anything; every lookup is a miss.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledIsochroneCache;

#[async_trait]
impl IsochroneCache for DisabledIsochroneCache {
    async fn get(
        &self,
        _key: &IsochroneCacheKey,
    ) -> Result<Option<IsochroneResponse>, IsochroneCacheError> {
        Ok(None)
    }

    async fn put(
        &self,
        _key: &IsochroneCacheKey,
        _response: &IsochroneResponse,
    ) -> Result<(), IsochroneCacheError> {
        Ok(())
    }
}
