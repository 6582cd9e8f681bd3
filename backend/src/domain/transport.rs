//! Transport modes supported by the isochrone endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Travel profile used to compute a reachability area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransportMode {
    /// Private car on the road network.
    #[serde(rename = "driving-car")]
    DrivingCar,
    /// Regular bicycle.
    #[serde(rename = "cycling-regular")]
    CyclingRegular,
    /// Pedestrian.
    #[serde(rename = "foot-walking")]
    FootWalking,
}

impl TransportMode {
    /// Every supported mode, in endpoint registration order.
    pub const ALL: [Self; 3] = [Self::DrivingCar, Self::CyclingRegular, Self::FootWalking];

    /// Profile name used in URLs and payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DrivingCar => "driving-car",
            Self::CyclingRegular => "cycling-regular",
            Self::FootWalking => "foot-walking",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown profile name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transport profile: {value}")]
pub struct UnknownTransportMode {
    /// The rejected input.
    pub value: String,
}

impl FromStr for TransportMode {
    type Err = UnknownTransportMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownTransportMode {
                value: s.to_owned(),
            })
    }
}
