//! Isochrone API handler.
//!
//! ```text
//! POST /api/v1/isochrones/{profile}  Reachability polygons for a profile
//! ```

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use tracing::info;

use crate::domain::{Error, IsochroneRequest, TransportMode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::public_one_hour_header;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_locations, parse_ranges};

const LOCATIONS: FieldName = FieldName::new("locations");
const RANGE: FieldName = FieldName::new("range");

/// Isochrone request body.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct IsochroneBody {
    /// Centres as `[lon, lat]` pairs.
    #[schema(value_type = Vec<Vec<f64>>, example = json!([[-0.1, 51.5]]))]
    pub locations: Vec<[f64; 2]>,
    /// Ranges in metres.
    #[schema(example = json!([500.0, 1000.0]))]
    pub range: Vec<f64>,
    /// Caller correlation id echoed in metadata.
    #[serde(default)]
    pub id: Option<String>,
}

fn parse_profile(profile: &str) -> Result<TransportMode, Error> {
    profile
        .parse()
        .map_err(|_| Error::not_found(format!("unknown isochrone profile: {profile}")))
}

/// Compute isochrones for every `(location, range)` pair.
///
/// # Errors
///
/// - `400 Bad Request`: empty lists, non-positive ranges or out-of-range
///   coordinates.
/// - `404 Not Found`: unknown profile.
/// - `500 Internal Server Error`: polygon synthesis failed.
#[utoipa::path(
    post,
    path = "/api/v1/isochrones/{profile}",
    request_body = IsochroneBody,
    params(
        ("profile" = String, Path, description = "driving-car, cycling-regular or foot-walking")
    ),
    responses(
        (status = 200, description = "GeoJSON FeatureCollection", body = crate::inbound::http::schemas::FeatureCollectionSchema),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Unknown profile", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 500, description = "Internal server error", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["isochrones"],
    operation_id = "computeIsochrones"
)]
#[post("/isochrones/{profile}")]
pub async fn compute_isochrones(
    state: web::Data<HttpState>,
    profile: web::Path<String>,
    payload: web::Json<IsochroneBody>,
) -> ApiResult<HttpResponse> {
    let transport = parse_profile(&profile)?;
    let IsochroneBody {
        locations,
        range,
        id,
    } = payload.into_inner();
    let locations = parse_locations(locations, LOCATIONS)?;
    let ranges = parse_ranges(range, RANGE)?;
    let request = IsochroneRequest::new(transport, locations, ranges, id)?;

    let response = state.isochrones.compute(&request).await?;
    info!(
        %transport,
        features = response.features.len(),
        "isochrones computed"
    );
    Ok(HttpResponse::Ok()
        .insert_header(public_one_hour_header())
        .json(response))
}

#[cfg(test)]
#[path = "isochrones_tests.rs"]
mod tests;
