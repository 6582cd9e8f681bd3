//! Marker value objects supplied by the map client.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Coordinate, TransportMode};

/// Validation errors for marker fields.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarkerValidationError {
    /// Marker identifiers must contain visible characters.
    #[error("marker id must not be empty")]
    EmptyId,
    /// Ranges must be finite and strictly positive.
    #[error("range must be a finite number greater than zero, got {value}")]
    NonPositiveRange { value: f64 },
    /// Ranges are capped at [`MAX_RANGE_METERS`].
    #[error("range must not exceed 1000000 metres, got {value}")]
    RangeTooLarge { value: f64 },
}

/// Largest accepted range in metres (1000 km).
pub const MAX_RANGE_METERS: f64 = 1_000_000.0;

/// Caller-assigned marker identifier, unique within one marker set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MarkerId(String);

impl MarkerId {
    /// Validate and wrap an identifier.
    ///
    /// # Examples
    /// ```
    /// use isochrone_backend::domain::MarkerId;
    ///
    /// let id = MarkerId::new("m1")?;
    /// assert_eq!(id.as_str(), "m1");
    /// assert!(MarkerId::new("  ").is_err());
    /// # Ok::<(), isochrone_backend::domain::MarkerValidationError>(())
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, MarkerValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(MarkerValidationError::EmptyId);
        }
        Ok(Self(raw))
    }

    /// Borrow the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for MarkerId {
    type Error = MarkerValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MarkerId> for String {
    fn from(value: MarkerId) -> Self {
        value.0
    }
}

/// Reachability range in metres; always finite and greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct RangeMeters(f64);

impl RangeMeters {
    /// Validate a range value.
    pub fn new(value: f64) -> Result<Self, MarkerValidationError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(MarkerValidationError::NonPositiveRange { value });
        }
        if value > MAX_RANGE_METERS {
            return Err(MarkerValidationError::RangeTooLarge { value });
        }
        Ok(Self(value))
    }

    /// The range in metres.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for RangeMeters {
    type Error = MarkerValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RangeMeters> for f64 {
    fn from(value: RangeMeters) -> Self {
        value.0
    }
}

/// A map marker: one location, one transport mode, one range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Caller-assigned identifier.
    pub id: MarkerId,
    /// Marker position.
    pub location: Coordinate,
    /// Travel profile.
    pub transport: TransportMode,
    /// Reachability budget.
    pub range: RangeMeters,
}
