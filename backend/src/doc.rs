//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the isochrone, overlap and health endpoints together
//! with the schema wrappers from [`crate::inbound::http::schemas`]. Swagger
//! UI serves it in debug builds and `openapi-dump` prints it for tooling.

use utoipa::OpenApi;

use crate::inbound::http::isochrones::IsochroneBody;
use crate::inbound::http::overlaps::{
    MarkerBody, MarkerResult, MarkerStatus, OverlapsBody, OverlapsResponse,
};
use crate::inbound::http::schemas::{
    EngineSchema, ErrorCodeSchema, ErrorSchema, FeatureCollectionSchema, FeatureSchema,
    IntersectionSchema, MetadataSchema, PolygonGeometrySchema, PropertiesSchema, QueryEchoSchema,
    SkippedPairSchema,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Isochrone backend API",
        description = "Reachability polygons per transport mode and pairwise marker overlaps.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::isochrones::compute_isochrones,
        crate::inbound::http::overlaps::compute_overlaps,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        IsochroneBody,
        MarkerBody,
        OverlapsBody,
        MarkerStatus,
        MarkerResult,
        OverlapsResponse,
        ErrorSchema,
        ErrorCodeSchema,
        FeatureCollectionSchema,
        FeatureSchema,
        PolygonGeometrySchema,
        PropertiesSchema,
        MetadataSchema,
        QueryEchoSchema,
        EngineSchema,
        IntersectionSchema,
        SkippedPairSchema,
    )),
    tags(
        (name = "isochrones", description = "Reachability polygons"),
        (name = "overlaps", description = "Marker sets and their intersections"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
