//! Marker overlap API handler.
//!
//! ```text
//! POST /api/v1/overlaps  Resolve a marker set and intersect its isochrones
//! ```
//!
//! Every marker is fetched concurrently. Failed markers are listed without a
//! feature and left out of the pairwise intersection pass.

use std::sync::Mutex;

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::domain::{
    Error, IntersectionPolygon, IsochroneFeature, Marker, MarkerBoard, MarkerId, MarkerState,
    SettleOutcome, SettledBoard, SkippedPair,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, ensure_unique_ids, parse_coordinate, parse_marker_id, parse_range, parse_transport,
};

const MARKER_ID: FieldName = FieldName::new("markers.id");
const MARKER_LOCATION: FieldName = FieldName::new("markers.location");
const MARKER_TRANSPORT: FieldName = FieldName::new("markers.transport");
const MARKER_RANGE: FieldName = FieldName::new("markers.range");

/// One marker in an overlap request.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct MarkerBody {
    /// Caller-assigned identifier, unique within the request.
    pub id: String,
    /// `[lon, lat]` position.
    #[schema(value_type = Vec<f64>, example = json!([-0.1, 51.5]))]
    pub location: [f64; 2],
    /// `driving-car`, `cycling-regular` or `foot-walking`.
    #[schema(example = "foot-walking")]
    pub transport: String,
    /// Range in metres.
    #[schema(example = 500.0)]
    pub range: f64,
}

/// Overlap request body.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct OverlapsBody {
    /// Markers to resolve and intersect; must not be empty.
    pub markers: Vec<MarkerBody>,
}

/// Per-marker fetch status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStatus {
    /// The isochrone was computed; `feature` is present.
    Resolved,
    /// The fetch failed; the marker takes no part in overlaps.
    Failed,
}

/// Marker entry in an overlap response.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MarkerResult {
    /// Marker identifier as sent.
    #[schema(value_type = String)]
    pub id: MarkerId,
    /// Fetch outcome.
    pub status: MarkerStatus,
    /// Present when `status` is `resolved`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<crate::inbound::http::schemas::FeatureSchema>)]
    pub feature: Option<IsochroneFeature>,
}

/// Overlap response body.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OverlapsResponse {
    /// Every marker in request order.
    pub markers: Vec<MarkerResult>,
    /// Positive-area intersections between resolved markers.
    #[schema(value_type = Vec<crate::inbound::http::schemas::IntersectionSchema>)]
    pub intersections: Vec<IntersectionPolygon>,
    /// Pairs that could not be intersected.
    #[schema(value_type = Vec<crate::inbound::http::schemas::SkippedPairSchema>)]
    pub skipped: Vec<SkippedPair>,
}

impl From<SettledBoard> for OverlapsResponse {
    fn from(settled: SettledBoard) -> Self {
        let markers = settled
            .markers
            .into_iter()
            .map(|(id, state)| match state {
                MarkerState::Resolved(feature) => MarkerResult {
                    id,
                    status: MarkerStatus::Resolved,
                    feature: Some(feature),
                },
                MarkerState::Pending | MarkerState::Failed(_) => MarkerResult {
                    id,
                    status: MarkerStatus::Failed,
                    feature: None,
                },
            })
            .collect();
        Self {
            markers,
            intersections: settled.report.intersections,
            skipped: settled.report.skipped,
        }
    }
}

fn parse_markers(markers: Vec<MarkerBody>) -> Result<Vec<Marker>, Error> {
    let markers = markers
        .into_iter()
        .enumerate()
        .map(|(index, body)| {
            Ok(Marker {
                id: parse_marker_id(body.id, MARKER_ID, index)?,
                location: parse_coordinate(body.location, MARKER_LOCATION, index)?,
                transport: parse_transport(&body.transport, MARKER_TRANSPORT, index)?,
                range: parse_range(body.range, MARKER_RANGE, index)?,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;
    ensure_unique_ids(markers.iter().map(|marker| &marker.id), MARKER_ID)?;
    Ok(markers)
}

/// Resolve isochrones for a marker set and intersect them pairwise.
///
/// # Errors
///
/// - `400 Bad Request`: invalid marker fields or duplicate ids.
/// - `500 Internal Server Error`: the settle pass could not complete.
#[utoipa::path(
    post,
    path = "/api/v1/overlaps",
    request_body = OverlapsBody,
    responses(
        (status = 200, description = "Marker statuses and pairwise intersections", body = OverlapsResponse),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 500, description = "Internal server error", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["overlaps"],
    operation_id = "computeOverlaps"
)]
#[post("/overlaps")]
pub async fn compute_overlaps(
    state: web::Data<HttpState>,
    payload: web::Json<OverlapsBody>,
) -> ApiResult<HttpResponse> {
    let markers = parse_markers(payload.into_inner().markers)?;
    let mut board = MarkerBoard::new();
    for marker in markers {
        board.upsert(marker);
    }
    let board = Mutex::new(board);

    match state.overlaps.settle(&board).await? {
        SettleOutcome::Settled(settled) => {
            info!(
                markers = settled.markers.len(),
                intersections = settled.report.intersections.len(),
                skipped = settled.report.skipped.len(),
                "overlap pass complete"
            );
            Ok(HttpResponse::Ok().json(OverlapsResponse::from(settled)))
        }
        SettleOutcome::Superseded => {
            error!("request-local marker board changed during settle");
            Err(Error::internal("overlap pass was superseded"))
        }
    }
}

#[cfg(test)]
#[path = "overlaps_tests.rs"]
mod tests;
