//! Service configuration loaded via OrthoConfig.
//!
//! Values layer from configuration files, `ISOCHRONE_*` environment variables
//! and command-line flags. Every field is optional; the accessors fall back to
//! the defaults the service ships with.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::cache::{CachePolicy, DEFAULT_MAX_ENTRIES, DEFAULT_TTL};

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8080;

/// Runtime settings for the isochrone service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ISOCHRONE")]
pub struct IsochroneSettings {
    /// Address the HTTP listener binds to.
    pub host: Option<IpAddr>,
    /// Port the HTTP listener binds to.
    pub port: Option<u16>,
    /// Lifetime of a cached isochrone response.
    pub cache_ttl_seconds: Option<u64>,
    /// Upper bound on cached responses before eviction.
    pub cache_max_entries: Option<usize>,
    /// Fixed seed for the polygon noise source.
    pub synthesis_seed: Option<u64>,
}

impl IsochroneSettings {
    /// Socket address built from `host` and `port`.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Cache policy built from the TTL and capacity settings.
    #[must_use]
    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy::new(
            self.cache_ttl_seconds
                .map_or(DEFAULT_TTL, Duration::from_secs),
            self.cache_max_entries.unwrap_or(DEFAULT_MAX_ENTRIES),
        )
    }
}
