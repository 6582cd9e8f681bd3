//! Reachability polygon synthesis.
//!
//! Real isochrones come from a routing graph; this module only reproduces
//! their shape contract: a single closed ring around the centre whose size
//! follows the requested range. Each of the twelve vertices has its radius
//! perturbed by up to 15% so shapes are irregular.

use std::f64::consts::TAU;
use std::sync::Mutex;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use super::{Coordinate, GeometryError, RangeMeters, Ring};

/// Number of distinct vertices on a synthesised ring.
pub const VERTEX_COUNT: u32 = 12;

/// Maximum relative radius perturbation applied to each vertex.
pub const RADIUS_NOISE: f64 = 0.15;

/// Kilometres represented by one degree in the equirectangular approximation.
const KILOMETRES_PER_DEGREE: f64 = 50.0;

/// Errors raised while synthesising a polygon.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthesisError {
    /// A vertex left the representable range, usually near the poles.
    #[error("vertex {index} is not a finite coordinate")]
    NonFiniteVertex { index: u32 },
    /// The noise source lock was poisoned by a panicking holder.
    #[error("noise source is unavailable")]
    NoiseSourceUnavailable,
    /// The generated vertices did not form a valid ring.
    #[error("synthesised ring is invalid: {0}")]
    InvalidRing(#[from] GeometryError),
}

/// Produces a closed ring approximating the area reachable from a centre.
#[cfg_attr(test, mockall::automock)]
pub trait PolygonSynthesizer: Send + Sync {
    /// Synthesise a ring around `center` for `range`.
    fn synthesize(&self, center: Coordinate, range: RangeMeters) -> Result<Ring, SynthesisError>;
}

/// Radius of the approximating disk in degrees.
///
/// # Examples
/// ```
/// use isochrone_backend::domain::{RangeMeters, synthesis::radius_degrees};
///
/// let radius = radius_degrees(RangeMeters::new(5_000.0)?);
/// assert!((radius - 0.1).abs() < 1e-12);
/// # Ok::<(), isochrone_backend::domain::MarkerValidationError>(())
/// ```
#[must_use]
pub fn radius_degrees(range: RangeMeters) -> f64 {
    range.get() / 1000.0 / KILOMETRES_PER_DEGREE
}

/// Twelve-vertex ring generator with per-vertex multiplicative noise.
///
/// The random source is injected so tests can use a seeded generator and
/// obtain reproducible shapes.
///
/// # Examples
/// ```
/// use isochrone_backend::domain::{Coordinate, PolygonSynthesizer, RangeMeters};
/// use isochrone_backend::domain::synthesis::NoisyRingSynthesizer;
///
/// let synthesizer = NoisyRingSynthesizer::seeded(7);
/// let ring = synthesizer.synthesize(Coordinate::wgs84(-0.1, 51.5)?, RangeMeters::new(500.0)?)?;
/// assert_eq!(ring.positions().len(), 13);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct NoisyRingSynthesizer<R = SmallRng> {
    rng: Mutex<R>,
}

impl NoisyRingSynthesizer<SmallRng> {
    /// Seed the noise source from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Seed the noise source deterministically.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }
}

impl<R> NoisyRingSynthesizer<R>
where
    R: Rng + Send,
{
    /// Wrap an arbitrary random number generator.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl<R> PolygonSynthesizer for NoisyRingSynthesizer<R>
where
    R: Rng + Send,
{
    fn synthesize(&self, center: Coordinate, range: RangeMeters) -> Result<Ring, SynthesisError> {
        let radius = radius_degrees(range);
        let lon_scale = 1.0 / center.lat().to_radians().cos();
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| SynthesisError::NoiseSourceUnavailable)?;

        let vertices = (0..VERTEX_COUNT)
            .map(|index| {
                let angle = TAU * f64::from(index) / f64::from(VERTEX_COUNT);
                let noisy_radius = radius * (1.0 + rng.gen_range(-RADIUS_NOISE..=RADIUS_NOISE));
                let lon = center.lon() + noisy_radius * angle.cos() * lon_scale;
                let lat = center.lat() + noisy_radius * angle.sin();
                Coordinate::new(lon, lat).map_err(|_| SynthesisError::NonFiniteVertex { index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Ring::close(vertices)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MAX_RANGE_METERS;
    use rstest::{fixture, rstest};

    #[fixture]
    fn london() -> Coordinate {
        Coordinate::wgs84(-0.1, 51.5).expect("london")
    }

    fn range(value: f64) -> RangeMeters {
        RangeMeters::new(value).expect("positive range")
    }

    #[rstest]
    fn ring_has_thirteen_closed_positions(london: Coordinate) {
        let ring = NoisyRingSynthesizer::seeded(1)
            .synthesize(london, range(500.0))
            .expect("ring");
        let positions = ring.positions();
        assert_eq!(positions.len(), 13);
        assert_eq!(positions.first(), positions.last());
    }

    #[rstest]
    #[case(500.0)]
    #[case(2_500.0)]
    #[case(40_000.0)]
    fn vertex_radii_stay_within_noise_band(london: Coordinate, #[case] metres: f64) {
        let ring = NoisyRingSynthesizer::seeded(99)
            .synthesize(london, range(metres))
            .expect("ring");
        let radius = radius_degrees(range(metres));
        let lon_scale = 1.0 / london.lat().to_radians().cos();

        for position in ring.positions() {
            let dx = (position.lon() - london.lon()) / lon_scale;
            let dy = position.lat() - london.lat();
            let observed = dx.hypot(dy);
            assert!(
                observed >= radius * (1.0 - RADIUS_NOISE) - 1e-12
                    && observed <= radius * (1.0 + RADIUS_NOISE) + 1e-12,
                "vertex radius {observed} outside noise band around {radius}"
            );
        }
    }

    #[rstest]
    fn same_seed_reproduces_shape(london: Coordinate) {
        let first = NoisyRingSynthesizer::seeded(42)
            .synthesize(london, range(1_000.0))
            .expect("ring");
        let second = NoisyRingSynthesizer::seeded(42)
            .synthesize(london, range(1_000.0))
            .expect("ring");
        assert_eq!(first, second);
    }

    #[rstest]
    fn successive_calls_vary_the_shape(london: Coordinate) {
        let synthesizer = NoisyRingSynthesizer::seeded(42);
        let first = synthesizer.synthesize(london, range(1_000.0)).expect("ring");
        let second = synthesizer.synthesize(london, range(1_000.0)).expect("ring");
        assert_ne!(first, second);
    }

    #[rstest]
    fn polar_centre_at_the_range_cap_stays_finite() {
        let pole = Coordinate::wgs84(0.0, 90.0).expect("pole");
        let ring = NoisyRingSynthesizer::seeded(3)
            .synthesize(pole, range(MAX_RANGE_METERS))
            .expect("finite ring");
        assert!(ring.positions().iter().all(|position| position.lon().is_finite()));
        assert!(ring.positions().iter().any(|position| position.lon().abs() > 180.0));
    }
}
