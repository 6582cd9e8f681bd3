//! Geographic value objects shared by synthesis and overlap computation.
//!
//! Coordinates are WGS84 `(longitude, latitude)` pairs serialised as
//! two-element JSON arrays, matching GeoJSON positions.

use geo::{Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors raised when constructing a [`Coordinate`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateValidationError {
    /// Longitude or latitude is NaN or infinite.
    #[error("coordinate components must be finite numbers")]
    NonFinite,
    /// Longitude is outside [-180, 180].
    #[error("longitude {value} is outside [-180, 180]")]
    LongitudeOutOfRange { value: f64 },
    /// Latitude is outside [-90, 90].
    #[error("latitude {value} is outside [-90, 90]")]
    LatitudeOutOfRange { value: f64 },
}

/// Errors raised while building rings or clipping polygons.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A ring needs at least four positions to enclose an area.
    #[error("ring must contain at least {min} positions, got {len}")]
    RingTooShort { len: usize, min: usize },
    /// The first and last positions differ.
    #[error("ring is not closed: first and last positions differ")]
    RingNotClosed,
    /// A position could not be represented as a coordinate.
    #[error("ring position {index} is invalid: {source}")]
    InvalidPosition {
        index: usize,
        #[source]
        source: CoordinateValidationError,
    },
    /// The clipping algorithm rejected the input.
    #[error("polygon clipping failed: {message}")]
    ClippingFailed { message: String },
}

/// A finite `(longitude, latitude)` pair in WGS84 degrees.
///
/// [`Coordinate::new`] only requires finite components so synthesised
/// vertices near the antimeridian remain representable; request input goes
/// through [`Coordinate::wgs84`], which also enforces the WGS84 ranges.
///
/// # Examples
/// ```
/// use isochrone_backend::domain::Coordinate;
///
/// let london = Coordinate::wgs84(-0.1, 51.5)?;
/// assert_eq!(london.as_array(), [-0.1, 51.5]);
/// assert!(Coordinate::wgs84(200.0, 0.0).is_err());
/// # Ok::<(), isochrone_backend::domain::CoordinateValidationError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    lon: f64,
    lat: f64,
}

impl Coordinate {
    /// Build a coordinate from finite components.
    pub fn new(lon: f64, lat: f64) -> Result<Self, CoordinateValidationError> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(CoordinateValidationError::NonFinite);
        }
        Ok(Self { lon, lat })
    }

    /// Build a coordinate constrained to the WGS84 longitude/latitude ranges.
    pub fn wgs84(lon: f64, lat: f64) -> Result<Self, CoordinateValidationError> {
        let coordinate = Self::new(lon, lat)?;
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateValidationError::LongitudeOutOfRange { value: lon });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateValidationError::LatitudeOutOfRange { value: lat });
        }
        Ok(coordinate)
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lon(self) -> f64 {
        self.lon
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(self) -> f64 {
        self.lat
    }

    /// Position as `[lon, lat]`.
    #[must_use]
    pub const fn as_array(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl TryFrom<[f64; 2]> for Coordinate {
    type Error = CoordinateValidationError;

    fn try_from([lon, lat]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(lon, lat)
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(value: Coordinate) -> Self {
        value.as_array()
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(value: Coordinate) -> Self {
        Coord {
            x: value.lon,
            y: value.lat,
        }
    }
}

/// A closed linear ring: at least four positions, first equal to last.
///
/// # Examples
/// ```
/// use isochrone_backend::domain::{Coordinate, Ring};
///
/// let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
///     .into_iter()
///     .map(|(lon, lat)| Coordinate::new(lon, lat))
///     .collect::<Result<Vec<_>, _>>()?;
/// let ring = Ring::close(corners)?;
/// assert_eq!(ring.positions().len(), 5);
/// assert_eq!(ring.positions().first(), ring.positions().last());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coordinate>", into = "Vec<Coordinate>")]
pub struct Ring(Vec<Coordinate>);

impl Ring {
    /// Smallest number of positions a closed ring can hold.
    pub const MIN_POSITIONS: usize = 4;

    /// Validate an already closed sequence of positions.
    pub fn new(positions: Vec<Coordinate>) -> Result<Self, GeometryError> {
        if positions.len() < Self::MIN_POSITIONS {
            return Err(GeometryError::RingTooShort {
                len: positions.len(),
                min: Self::MIN_POSITIONS,
            });
        }
        if positions.first() != positions.last() {
            return Err(GeometryError::RingNotClosed);
        }
        Ok(Self(positions))
    }

    /// Close an open vertex sequence by repeating its first vertex.
    pub fn close(mut vertices: Vec<Coordinate>) -> Result<Self, GeometryError> {
        if let Some(first) = vertices.first().copied() {
            vertices.push(first);
        }
        Self::new(vertices)
    }

    /// Positions of the ring, closing position included.
    #[must_use]
    pub fn positions(&self) -> &[Coordinate] {
        &self.0
    }

    /// Convert into a closed `geo` line string.
    #[must_use]
    pub fn to_line_string(&self) -> LineString<f64> {
        self.0.iter().copied().map(Coord::from).collect()
    }

    /// Convert into a hole-free `geo` polygon.
    #[must_use]
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(self.to_line_string(), Vec::new())
    }

    /// Convert a `geo` line string produced by clipping back into a ring.
    pub(crate) fn from_line_string(line: &LineString<f64>) -> Result<Self, GeometryError> {
        let positions = line
            .coords()
            .enumerate()
            .map(|(index, coord)| {
                Coordinate::new(coord.x, coord.y)
                    .map_err(|source| GeometryError::InvalidPosition { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(positions)
    }
}

impl TryFrom<Vec<Coordinate>> for Ring {
    type Error = GeometryError;

    fn try_from(value: Vec<Coordinate>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Ring> for Vec<Coordinate> {
    fn from(value: Ring) -> Self {
        value.0
    }
}
