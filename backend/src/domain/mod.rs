//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed value objects for markers and isochrones,
//! the services that synthesise and intersect reachability polygons, and the
//! ports adapters implement. Types validate on construction so invalid
//! states cannot reach the services.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Coordinate, Ring, Marker, MarkerId, RangeMeters, TransportMode: value
//!   objects.
//! - IsochroneRequest / IsochroneResponse: query and GeoJSON result shapes.
//! - IsochroneService, OverlapEngine, MarkerBoard, OverlapCoordinator:
//!   domain services.

pub mod error;
pub mod geometry;
pub mod isochrone;
pub mod isochrone_service;
pub mod marker;
pub mod marker_board;
pub mod overlap;
pub mod ports;
pub mod synthesis;
pub mod trace_id;
pub mod transport;

pub use self::error::{Error, ErrorCode};
pub use self::geometry::{Coordinate, CoordinateValidationError, GeometryError, Ring};
pub use self::isochrone::{
    ATTRIBUTION, EngineInfo, IsochroneFeature, IsochroneMetadata, IsochroneProperties,
    IsochroneRequest, IsochroneRequestError, IsochroneResponse, PolygonGeometry, QueryEcho,
    SERVICE_NAME, WORLD_BBOX,
};
pub use self::isochrone_service::IsochroneService;
pub use self::marker::{
    MAX_RANGE_METERS, Marker, MarkerId, MarkerValidationError, RangeMeters,
};
pub use self::marker_board::{
    MarkerBoard, MarkerState, OverlapCoordinator, Revision, SettleOutcome, SettledBoard,
};
pub use self::overlap::{
    IntersectionPolygon, MarkerPolygon, OverlapEngine, OverlapGeometry, OverlapReport, SkippedPair,
};
pub use self::synthesis::{NoisyRingSynthesizer, PolygonSynthesizer, SynthesisError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::transport::{TransportMode, UnknownTransportMode};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use isochrone_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::not_found("no such profile"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
