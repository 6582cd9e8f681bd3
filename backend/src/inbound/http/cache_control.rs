//! Shared cache-control policies for HTTP handlers.

use actix_web::http::header;

/// Isochrone responses may be reused by shared caches for one hour, matching
/// the response cache lifetime.
pub const PUBLIC_ONE_HOUR: &str = "public, max-age=3600";

/// Probe responses must never be cached.
pub const NO_STORE: &str = "no-store";

/// Header tuple for cacheable isochrone responses.
pub fn public_one_hour_header() -> (header::HeaderName, &'static str) {
    (header::CACHE_CONTROL, PUBLIC_ONE_HOUR)
}

/// Header tuple for probe responses.
pub fn no_store_header() -> (header::HeaderName, &'static str) {
    (header::CACHE_CONTROL, NO_STORE)
}
