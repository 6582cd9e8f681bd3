//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Only compiled for tests or with the `test-support` feature.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::synthesis::{PolygonSynthesizer, SynthesisError, radius_degrees};
use crate::domain::{
    ATTRIBUTION, Coordinate, EngineInfo, IsochroneMetadata, IsochroneRequest, IsochroneResponse,
    QueryEcho, RangeMeters, Ring, SERVICE_NAME, TransportMode, WORLD_BBOX,
};

/// Clock whose time only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// A clock frozen at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// A clock frozen at 2025-01-20T12:00:00Z.
    pub fn fixed() -> Self {
        match Utc.with_ymd_and_hms(2025, 1, 20, 12, 0, 0).single() {
            Some(now) => Self::new(now),
            None => panic!("fixed instant is unambiguous"),
        }
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => {
                panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}")
            }
        };
        *self.lock_clock() += delta;
    }

    /// Move the clock by whole seconds; negative values rewind it.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Synthesiser producing an axis-aligned square of half-width
/// [`radius_degrees`] around the centre, with no noise.
#[derive(Debug, Default, Clone, Copy)]
pub struct SquareSynthesizer;

impl PolygonSynthesizer for SquareSynthesizer {
    fn synthesize(&self, center: Coordinate, range: RangeMeters) -> Result<Ring, SynthesisError> {
        let half = radius_degrees(range);
        let corner = |index: u32, dx: f64, dy: f64| {
            Coordinate::new(center.lon() + dx, center.lat() + dy)
                .map_err(|_| SynthesisError::NonFiniteVertex { index })
        };
        let corners = vec![
            corner(0, -half, -half)?,
            corner(1, half, -half)?,
            corner(2, half, half)?,
            corner(3, -half, half)?,
        ];
        Ok(Ring::close(corners)?)
    }
}

/// Synthesiser that fails for every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingSynthesizer;

impl PolygonSynthesizer for FailingSynthesizer {
    fn synthesize(&self, _center: Coordinate, _range: RangeMeters) -> Result<Ring, SynthesisError> {
        Err(SynthesisError::NonFiniteVertex { index: 0 })
    }
}

/// Build a coordinate, panicking on invalid input.
pub fn coordinate(lon: f64, lat: f64) -> Coordinate {
    match Coordinate::wgs84(lon, lat) {
        Ok(coordinate) => coordinate,
        Err(error) => panic!("invalid test coordinate ({lon}, {lat}): {error}"),
    }
}

/// Build a range, panicking on invalid input.
pub fn metres(value: f64) -> RangeMeters {
    match RangeMeters::new(value) {
        Ok(range) => range,
        Err(error) => panic!("invalid test range {value}: {error}"),
    }
}

/// Single-location, single-range request.
pub fn single_request(
    transport: TransportMode,
    lon: f64,
    lat: f64,
    range: f64,
) -> IsochroneRequest {
    let request =
        IsochroneRequest::new(transport, vec![coordinate(lon, lat)], vec![metres(range)], None);
    match request {
        Ok(request) => request,
        Err(error) => panic!("invalid test request: {error}"),
    }
}

/// Empty feature collection stamped with `timestamp`, for cache tests.
pub fn empty_response(request: &IsochroneRequest, timestamp: i64) -> IsochroneResponse {
    IsochroneResponse {
        bbox: WORLD_BBOX,
        features: Vec::new(),
        metadata: IsochroneMetadata {
            id: request.id().map(str::to_owned),
            attribution: ATTRIBUTION.to_owned(),
            service: SERVICE_NAME.to_owned(),
            timestamp,
            query: QueryEcho::from(request),
            engine: EngineInfo::synthetic(),
        },
    }
}
