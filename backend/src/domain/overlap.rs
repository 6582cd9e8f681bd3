//! Pairwise intersection of marker reachability polygons.
//!
//! Every pair `(i, j)` with `i < j` is clipped with `geo`'s boolean
//! operations. Pairs whose input is not a usable ring, or whose clipping
//! fails, are reported in [`OverlapReport::skipped`] and the pass continues.
//! Rings must lie inside the WGS84 bounds; `geo`'s sweep does not terminate
//! reliably on coordinates of extreme magnitude.

use std::panic::{AssertUnwindSafe, catch_unwind};

use geo::{Area, BooleanOps, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Coordinate, GeometryError, MarkerId, Ring};

/// A marker's exterior ring as raw `[lon, lat]` positions.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPolygon {
    /// Marker the ring belongs to.
    pub marker_id: MarkerId,
    /// Closed exterior ring; every position must be a WGS84 coordinate.
    pub positions: Vec<[f64; 2]>,
}

impl MarkerPolygon {
    /// Copy the positions of an already validated ring.
    pub fn from_ring(marker_id: MarkerId, ring: &Ring) -> Self {
        Self {
            marker_id,
            positions: ring
                .positions()
                .iter()
                .copied()
                .map(Coordinate::as_array)
                .collect(),
        }
    }

    fn to_polygon(&self) -> Result<Polygon<f64>, GeometryError> {
        let positions = self
            .positions
            .iter()
            .enumerate()
            .map(|(index, [lon, lat])| {
                Coordinate::wgs84(*lon, *lat)
                    .map_err(|source| GeometryError::InvalidPosition { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Ring::new(positions)?.to_polygon())
    }
}

/// GeoJSON geometry of an intersection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum OverlapGeometry {
    /// A single connected region: exterior ring followed by holes.
    Polygon(Vec<Ring>),
    /// Several disjoint regions.
    MultiPolygon(Vec<Vec<Ring>>),
}

impl OverlapGeometry {
    fn from_polygons(polygons: Vec<Polygon<f64>>) -> Result<Option<Self>, GeometryError> {
        let mut parts = polygons
            .iter()
            .map(rings_of)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(match parts.len() {
            0 => None,
            1 => parts.pop().map(Self::Polygon),
            _ => Some(Self::MultiPolygon(parts)),
        })
    }

    /// Convert back into a `geo` multipolygon.
    #[must_use]
    pub fn to_multi_polygon(&self) -> MultiPolygon<f64> {
        let polygon = |rings: &[Ring]| {
            let mut lines = rings.iter().map(Ring::to_line_string);
            let exterior = lines.next().unwrap_or_else(|| LineString::new(Vec::new()));
            Polygon::new(exterior, lines.collect())
        };
        match self {
            Self::Polygon(rings) => MultiPolygon::new(vec![polygon(rings)]),
            Self::MultiPolygon(parts) => {
                MultiPolygon::new(parts.iter().map(|rings| polygon(rings)).collect())
            }
        }
    }

    /// Planar area in square degrees.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.to_multi_polygon().unsigned_area()
    }
}

fn rings_of(polygon: &Polygon<f64>) -> Result<Vec<Ring>, GeometryError> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(Ring::from_line_string)
        .collect()
}

/// Overlap between two markers, identified by their id pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionPolygon {
    /// Marker ids in input order.
    pub markers: (MarkerId, MarkerId),
    /// Positive-area intersection.
    pub geometry: OverlapGeometry,
}

/// A pair omitted from the pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedPair {
    /// Marker ids in input order.
    pub markers: (MarkerId, MarkerId),
    /// Why the pair could not be intersected.
    pub reason: String,
}

/// Result of one overlap pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlapReport {
    /// Overlapping pairs in `(i, j)` order.
    pub intersections: Vec<IntersectionPolygon>,
    /// Pairs omitted because of invalid input or a clipping failure.
    pub skipped: Vec<SkippedPair>,
}

/// Stateless pairwise intersection calculator.
#[derive(Debug, Default, Clone, Copy)]
pub struct OverlapEngine;

impl OverlapEngine {
    /// Intersect every unordered pair of `polygons`, preserving input order.
    ///
    /// # Examples
    /// ```
    /// use isochrone_backend::domain::MarkerId;
    /// use isochrone_backend::domain::overlap::{MarkerPolygon, OverlapEngine};
    ///
    /// let square = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]];
    /// let report = OverlapEngine.pairwise_intersections(&[
    ///     MarkerPolygon { marker_id: MarkerId::new("a")?, positions: square.clone() },
    ///     MarkerPolygon { marker_id: MarkerId::new("b")?, positions: square },
    /// ]);
    /// assert_eq!(report.intersections.len(), 1);
    /// # Ok::<(), isochrone_backend::domain::MarkerValidationError>(())
    /// ```
    #[must_use]
    pub fn pairwise_intersections(&self, polygons: &[MarkerPolygon]) -> OverlapReport {
        let prepared: Vec<Result<Polygon<f64>, GeometryError>> =
            polygons.iter().map(MarkerPolygon::to_polygon).collect();
        let mut report = OverlapReport::default();

        for (i, left) in polygons.iter().enumerate() {
            for (j, right) in polygons.iter().enumerate().skip(i + 1) {
                let markers = (left.marker_id.clone(), right.marker_id.clone());
                let outcome = match (&prepared[i], &prepared[j]) {
                    (Ok(a), Ok(b)) => intersect(a, b),
                    (Err(err), _) | (_, Err(err)) => Err(err.clone()),
                };
                match outcome {
                    Ok(Some(geometry)) => {
                        report
                            .intersections
                            .push(IntersectionPolygon { markers, geometry });
                    }
                    Ok(None) => {
                        debug!(left = %markers.0, right = %markers.1, "markers do not overlap");
                    }
                    Err(err) => {
                        warn!(
                            left = %markers.0,
                            right = %markers.1,
                            error = %err,
                            "skipping marker pair"
                        );
                        report.skipped.push(SkippedPair {
                            markers,
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }
        report
    }
}

fn intersect(
    a: &Polygon<f64>,
    b: &Polygon<f64>,
) -> Result<Option<OverlapGeometry>, GeometryError> {
    let clipped = catch_unwind(AssertUnwindSafe(|| a.intersection(b))).map_err(|panic| {
        let message = panic
            .downcast_ref::<&str>()
            .map(|text| (*text).to_owned())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "boolean operation panicked".to_owned());
        GeometryError::ClippingFailed { message }
    })?;
    let parts: Vec<Polygon<f64>> = clipped
        .into_iter()
        .filter(|part| part.unsigned_area() > 0.0)
        .collect();
    OverlapGeometry::from_polygons(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::synthesis::{NoisyRingSynthesizer, PolygonSynthesizer};
    use crate::domain::{MAX_RANGE_METERS, RangeMeters};
    use geo::BoundingRect;
    use rstest::{fixture, rstest};

    fn id(value: &str) -> MarkerId {
        MarkerId::new(value).expect("valid marker id")
    }

    fn square(marker: &str, x: f64, y: f64, side: f64) -> MarkerPolygon {
        MarkerPolygon {
            marker_id: id(marker),
            positions: vec![
                [x, y],
                [x + side, y],
                [x + side, y + side],
                [x, y + side],
                [x, y],
            ],
        }
    }

    #[fixture]
    fn engine() -> OverlapEngine {
        OverlapEngine
    }

    #[rstest]
    fn identical_squares_overlap_exactly_and_disjoint_square_is_ignored(engine: OverlapEngine) {
        let report = engine.pairwise_intersections(&[
            square("a", 0.0, 0.0, 1.0),
            square("b", 0.0, 0.0, 1.0),
            square("c", 10.0, 10.0, 1.0),
        ]);

        assert!(report.skipped.is_empty());
        assert_eq!(report.intersections.len(), 1);
        let overlap = &report.intersections[0];
        assert_eq!(overlap.markers, (id("a"), id("b")));
        assert!((overlap.geometry.area() - 1.0).abs() < 1e-9);
        let bounds = overlap
            .geometry
            .to_multi_polygon()
            .bounding_rect()
            .expect("non-empty geometry");
        assert!((bounds.min().x - 0.0).abs() < 1e-9 && (bounds.min().y - 0.0).abs() < 1e-9);
        assert!((bounds.max().x - 1.0).abs() < 1e-9 && (bounds.max().y - 1.0).abs() < 1e-9);
    }

    #[rstest]
    fn disjoint_markers_produce_no_intersections(engine: OverlapEngine) {
        let report = engine.pairwise_intersections(&[
            square("a", 0.0, 0.0, 1.0),
            square("b", 5.0, 5.0, 1.0),
            square("c", -5.0, -5.0, 1.0),
        ]);
        assert_eq!(report, OverlapReport::default());
    }

    #[rstest]
    fn touching_edges_have_no_positive_area(engine: OverlapEngine) {
        let report = engine.pairwise_intersections(&[
            square("a", 0.0, 0.0, 1.0),
            square("b", 1.0, 0.0, 1.0),
        ]);
        assert!(report.intersections.is_empty());
    }

    #[rstest]
    fn partial_overlap_yields_polygon(engine: OverlapEngine) {
        let report = engine.pairwise_intersections(&[
            square("a", 0.0, 0.0, 2.0),
            square("b", 1.0, 1.0, 2.0),
        ]);
        let overlap = &report.intersections[0];
        assert!(matches!(overlap.geometry, OverlapGeometry::Polygon(_)));
        assert!((overlap.geometry.area() - 1.0).abs() < 1e-9);
    }

    #[rstest]
    fn disconnected_overlap_yields_multipolygon(engine: OverlapEngine) {
        let u_shape = MarkerPolygon {
            marker_id: id("u"),
            positions: vec![
                [0.0, 0.0],
                [3.0, 0.0],
                [3.0, 3.0],
                [2.0, 3.0],
                [2.0, 1.0],
                [1.0, 1.0],
                [1.0, 3.0],
                [0.0, 3.0],
                [0.0, 0.0],
            ],
        };
        let bar = MarkerPolygon {
            marker_id: id("bar"),
            positions: vec![[-1.0, 2.0], [4.0, 2.0], [4.0, 2.5], [-1.0, 2.5], [-1.0, 2.0]],
        };

        let report = engine.pairwise_intersections(&[u_shape, bar]);

        let overlap = &report.intersections[0];
        match &overlap.geometry {
            OverlapGeometry::MultiPolygon(parts) => assert_eq!(parts.len(), 2),
            other => panic!("expected multipolygon, got {other:?}"),
        }
        assert!((overlap.geometry.area() - 1.0).abs() < 1e-9);
    }

    #[rstest]
    #[case::open_ring(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])]
    #[case::too_short(vec![[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]])]
    #[case::non_finite(vec![[0.0, 0.0], [f64::NAN, 0.0], [1.0, 1.0], [0.0, 0.0]])]
    #[case::beyond_longitude(vec![[0.0, 0.0], [181.0, 0.0], [1.0, 1.0], [0.0, 0.0]])]
    #[case::extreme_magnitude(vec![[0.0, 0.0], [1e160, 0.0], [1e160, 1e160], [0.0, 0.0]])]
    fn invalid_ring_skips_only_its_pairs(engine: OverlapEngine, #[case] positions: Vec<[f64; 2]>) {
        let broken = MarkerPolygon {
            marker_id: id("broken"),
            positions,
        };
        let report = engine.pairwise_intersections(&[
            square("a", 0.0, 0.0, 1.0),
            broken,
            square("b", 0.0, 0.0, 1.0),
        ]);

        assert_eq!(report.intersections.len(), 1);
        assert_eq!(report.intersections[0].markers, (id("a"), id("b")));
        let skipped: Vec<_> = report.skipped.iter().map(|pair| pair.markers.clone()).collect();
        assert_eq!(
            skipped,
            vec![(id("a"), id("broken")), (id("broken"), id("b"))]
        );
    }

    #[rstest]
    fn rings_synthesised_past_the_bounds_are_skipped(engine: OverlapEngine) {
        let synthesizer = NoisyRingSynthesizer::seeded(3);
        let center = Coordinate::wgs84(0.0, 85.0).expect("valid centre");
        let range = RangeMeters::new(MAX_RANGE_METERS).expect("valid range");
        let ring = |marker: &str| {
            let ring = synthesizer.synthesize(center, range).expect("finite ring");
            MarkerPolygon::from_ring(id(marker), &ring)
        };

        let report = engine.pairwise_intersections(&[ring("north"), ring("pole")]);

        assert!(report.intersections.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].reason.contains("is outside"));
    }

    #[rstest]
    fn geometry_serialises_as_geojson() {
        let report = OverlapEngine.pairwise_intersections(&[
            square("a", 0.0, 0.0, 1.0),
            square("b", 0.5, 0.0, 1.0),
        ]);
        let value = serde_json::to_value(&report.intersections[0]).expect("serialise");
        assert_eq!(value["markers"], serde_json::json!(["a", "b"]));
        assert_eq!(value["geometry"]["type"], "Polygon");
        assert!(value["geometry"]["coordinates"][0].as_array().is_some());
    }
}
