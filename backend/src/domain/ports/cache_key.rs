//! Content-addressed cache key for isochrone responses.
//!
//! Keys are derived from a canonical encoding of the transport mode, the
//! ordered locations, and the ordered ranges. Equal queries therefore hash
//! to the same key regardless of the caller correlation id.

use sha2::{Digest, Sha256};

use crate::domain::{Coordinate, RangeMeters, TransportMode};

/// Namespace prefix carried by every derived key.
pub const CACHE_KEY_PREFIX: &str = "isochrone:v1:";

/// Cache key used to store and retrieve isochrone responses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IsochroneCacheKey(String);

impl IsochroneCacheKey {
    /// Derive the key for a query.
    ///
    /// The canonical encoding writes floats with Rust's shortest round-trip
    /// formatting, so equal values always produce identical text. Negative
    /// zero is written as `0`.
    ///
    /// # Examples
    /// ```
    /// use isochrone_backend::domain::{Coordinate, RangeMeters, TransportMode};
    /// use isochrone_backend::domain::ports::IsochroneCacheKey;
    ///
    /// let locations = [Coordinate::wgs84(-0.1, 51.5)?];
    /// let ranges = [RangeMeters::new(500.0)?];
    /// let key = IsochroneCacheKey::derive(TransportMode::FootWalking, &locations, &ranges);
    /// assert!(key.as_str().starts_with("isochrone:v1:"));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[must_use]
    pub fn derive(
        transport: TransportMode,
        locations: &[Coordinate],
        ranges: &[RangeMeters],
    ) -> Self {
        let digest = Sha256::digest(canonical_encoding(transport, locations, ranges).as_bytes());
        Self(format!("{CACHE_KEY_PREFIX}{}", hex::encode(digest)))
    }

    /// Borrow the underlying key.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for IsochroneCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn canonical_encoding(
    transport: TransportMode,
    locations: &[Coordinate],
    ranges: &[RangeMeters],
) -> String {
    let locations = locations
        .iter()
        .map(|location| {
            format!(
                "{},{}",
                unsigned_zero(location.lon()),
                unsigned_zero(location.lat())
            )
        })
        .collect::<Vec<_>>()
        .join(";");
    let ranges = ranges
        .iter()
        .map(|range| range.get().to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("{transport}|{locations}|{ranges}")
}

/// `-0.0 == 0.0` but the two format differently.
fn unsigned_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn at(lon: f64, lat: f64) -> Coordinate {
        Coordinate::wgs84(lon, lat).expect("valid coordinate")
    }

    fn metres(value: f64) -> RangeMeters {
        RangeMeters::new(value).expect("valid range")
    }

    #[rstest]
    fn canonical_encoding_is_order_preserving_text() {
        let encoded = canonical_encoding(
            TransportMode::CyclingRegular,
            &[at(2.35, 48.85), at(-0.1, 51.5)],
            &[metres(300.0), metres(1_500.5)],
        );
        assert_eq!(encoded, "cycling-regular|2.35,48.85;-0.1,51.5|300,1500.5");
    }

    #[rstest]
    fn derived_key_is_prefixed_sha256_hex() {
        let key = IsochroneCacheKey::derive(TransportMode::DrivingCar, &[at(2.35, 48.85)], &[metres(1_000.0)]);
        let digest = key
            .as_str()
            .strip_prefix(CACHE_KEY_PREFIX)
            .expect("prefixed key");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[rstest]
    fn equal_queries_share_a_key() {
        let first = IsochroneCacheKey::derive(TransportMode::FootWalking, &[at(-0.1, 51.5)], &[metres(500.0), metres(1_000.0)]);
        let second = IsochroneCacheKey::derive(TransportMode::FootWalking, &[at(-0.1, 51.5)], &[metres(500.0), metres(1_000.0)]);
        assert_eq!(first, second);
    }

    #[rstest]
    #[case::transport(TransportMode::CyclingRegular, vec![at(-0.1, 51.5)], vec![metres(500.0), metres(1_000.0)])]
    #[case::location(TransportMode::FootWalking, vec![at(-0.2, 51.5)], vec![metres(500.0), metres(1_000.0)])]
    #[case::range(TransportMode::FootWalking, vec![at(-0.1, 51.5)], vec![metres(500.0), metres(1_100.0)])]
    #[case::range_order(TransportMode::FootWalking, vec![at(-0.1, 51.5)], vec![metres(1_000.0), metres(500.0)])]
    fn any_component_change_alters_the_key(
        #[case] transport: TransportMode,
        #[case] locations: Vec<Coordinate>,
        #[case] ranges: Vec<RangeMeters>,
    ) {
        let baseline = IsochroneCacheKey::derive(
            TransportMode::FootWalking,
            &[at(-0.1, 51.5)],
            &[metres(500.0), metres(1_000.0)],
        );
        assert_ne!(IsochroneCacheKey::derive(transport, &locations, &ranges), baseline);
    }

    #[rstest]
    fn signed_zero_components_share_a_key() {
        let positive = [at(0.0, 0.0)];
        let negative = [at(-0.0, -0.0)];
        let ranges = [metres(500.0)];
        assert_eq!(
            canonical_encoding(TransportMode::FootWalking, &negative, &ranges),
            "foot-walking|0,0|500"
        );
        assert_eq!(
            IsochroneCacheKey::derive(TransportMode::FootWalking, &positive, &ranges),
            IsochroneCacheKey::derive(TransportMode::FootWalking, &negative, &ranges)
        );
    }
}
