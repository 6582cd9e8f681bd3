//! Isochrone request and response shapes.
//!
//! The response mirrors the GeoJSON `FeatureCollection` contract consumed by
//! the map client: one `Polygon` feature per `(location, range)` pair plus
//! request metadata.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Coordinate, RangeMeters, Ring, TransportMode};

/// Bounding box advertised on every response; it always spans the world.
pub const WORLD_BBOX: [f64; 4] = [-180.0, -90.0, 180.0, 90.0];

/// Service identity echoed in response metadata.
pub const SERVICE_NAME: &str = "isochrones";

/// Data attribution echoed in response metadata.
pub const ATTRIBUTION: &str =
    "openrouteservice.org | OpenStreetMap contributors";

/// Validation errors for [`IsochroneRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IsochroneRequestError {
    /// At least one location is required.
    #[error("locations must contain at least one coordinate")]
    EmptyLocations,
    /// At least one range is required.
    #[error("range must contain at least one value")]
    EmptyRanges,
}

/// Validated isochrone query for a single transport mode.
#[derive(Debug, Clone, PartialEq)]
pub struct IsochroneRequest {
    transport: TransportMode,
    locations: Vec<Coordinate>,
    ranges: Vec<RangeMeters>,
    id: Option<String>,
}

impl IsochroneRequest {
    /// Build a request, rejecting empty location or range lists.
    ///
    /// # Examples
    /// ```
    /// use isochrone_backend::domain::{Coordinate, IsochroneRequest, RangeMeters, TransportMode};
    ///
    /// let request = IsochroneRequest::new(
    ///     TransportMode::FootWalking,
    ///     vec![Coordinate::wgs84(-0.1, 51.5)?],
    ///     vec![RangeMeters::new(500.0)?],
    ///     Some("m1".to_owned()),
    /// )?;
    /// assert_eq!(request.locations().len(), 1);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(
        transport: TransportMode,
        locations: Vec<Coordinate>,
        ranges: Vec<RangeMeters>,
        id: Option<String>,
    ) -> Result<Self, IsochroneRequestError> {
        if locations.is_empty() {
            return Err(IsochroneRequestError::EmptyLocations);
        }
        if ranges.is_empty() {
            return Err(IsochroneRequestError::EmptyRanges);
        }
        Ok(Self {
            transport,
            locations,
            ranges,
            id,
        })
    }

    /// Requested transport mode.
    #[must_use]
    pub const fn transport(&self) -> TransportMode {
        self.transport
    }

    /// Requested centres, in caller order.
    #[must_use]
    pub fn locations(&self) -> &[Coordinate] {
        &self.locations
    }

    /// Requested ranges, in caller order.
    #[must_use]
    pub fn ranges(&self) -> &[RangeMeters] {
        &self.ranges
    }

    /// Optional caller correlation id.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// GeoJSON feature collection returned for an isochrone query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct IsochroneResponse {
    /// Always [`WORLD_BBOX`].
    pub bbox: [f64; 4],
    /// One feature per `(location, range)` pair, location-major.
    pub features: Vec<IsochroneFeature>,
    /// Request echo and generation details.
    pub metadata: IsochroneMetadata,
}

/// A single reachability polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct IsochroneFeature {
    /// Polygon geometry with exactly one ring.
    pub geometry: PolygonGeometry,
    /// Correlation and range properties.
    pub properties: IsochroneProperties,
}

impl IsochroneFeature {
    /// The exterior ring of the feature, if any.
    #[must_use]
    pub fn exterior(&self) -> Option<&Ring> {
        self.geometry.coordinates.first()
    }
}

/// GeoJSON `Polygon` geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Polygon")]
pub struct PolygonGeometry {
    /// Exterior ring followed by any holes.
    pub coordinates: Vec<Ring>,
}

/// Properties attached to each isochrone feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsochroneProperties {
    /// Index of the originating location in the request.
    pub group_index: usize,
    /// Range in metres the polygon was generated for.
    pub value: f64,
    /// Centre the polygon was generated around.
    pub center: Coordinate,
}

/// Response metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsochroneMetadata {
    /// Caller correlation id, when supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Data attribution.
    pub attribution: String,
    /// Service identity, always [`SERVICE_NAME`].
    pub service: String,
    /// Generation time in epoch milliseconds.
    pub timestamp: i64,
    /// Echo of the request.
    pub query: QueryEcho,
    /// Static engine descriptor.
    pub engine: EngineInfo,
}

/// Request parameters echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryEcho {
    /// Caller correlation id, when supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Requested centres.
    pub locations: Vec<Coordinate>,
    /// Requested ranges in metres.
    pub range: Vec<f64>,
    /// Requested transport mode.
    pub transport: TransportMode,
}

impl From<&IsochroneRequest> for QueryEcho {
    fn from(request: &IsochroneRequest) -> Self {
        Self {
            id: request.id.clone(),
            locations: request.locations.clone(),
            range: request.ranges.iter().map(|range| range.get()).collect(),
            transport: request.transport,
        }
    }
}

/// Version and data-date descriptor of the engine behind the responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineInfo {
    /// Engine version.
    pub version: String,
    /// Engine build date, ISO 8601.
    pub build_date: String,
    /// Routing graph date, ISO 8601.
    pub graph_date: String,
    /// OpenStreetMap extract date, ISO 8601.
    pub osm_date: String,
}

impl EngineInfo {
    /// The fixed descriptor reported by the synthetic engine.
    #[must_use]
    pub fn synthetic() -> Self {
        Self {
            version: "9.0.0".to_owned(),
            build_date: "2025-01-15T10:00:00Z".to_owned(),
            graph_date: "2025-01-20T00:00:00Z".to_owned(),
            osm_date: "2025-01-13T00:00:00Z".to_owned(),
        }
    }
}
