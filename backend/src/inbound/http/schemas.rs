//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`. The
//! wrappers here mirror their serialised shape for documentation only.

#![expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested resource or profile does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "range must contain at least one entry")]
    message: String,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// `{ field, index?, value?, code }` for validation failures.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::PolygonGeometry`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PolygonGeometry)]
pub struct PolygonGeometrySchema {
    /// Always `Polygon`.
    #[schema(rename = "type", example = "Polygon")]
    kind: String,
    /// One closed ring of `[lon, lat]` positions.
    coordinates: Vec<Vec<Vec<f64>>>,
}

/// OpenAPI schema for [`crate::domain::IsochroneProperties`].
#[derive(ToSchema)]
#[schema(as = crate::domain::IsochroneProperties)]
pub struct PropertiesSchema {
    /// Index of the originating location.
    group_index: usize,
    /// Range in metres.
    value: f64,
    /// `[lon, lat]` centre.
    center: Vec<f64>,
}

/// OpenAPI schema for [`crate::domain::IsochroneFeature`].
#[derive(ToSchema)]
#[schema(as = crate::domain::IsochroneFeature)]
pub struct FeatureSchema {
    /// Always `Feature`.
    #[schema(rename = "type", example = "Feature")]
    kind: String,
    geometry: PolygonGeometrySchema,
    properties: PropertiesSchema,
}

/// OpenAPI schema for [`crate::domain::QueryEcho`].
#[derive(ToSchema)]
#[schema(as = crate::domain::QueryEcho)]
pub struct QueryEchoSchema {
    id: Option<String>,
    locations: Vec<Vec<f64>>,
    range: Vec<f64>,
    #[schema(example = "foot-walking")]
    transport: String,
}

/// OpenAPI schema for [`crate::domain::EngineInfo`].
#[derive(ToSchema)]
#[schema(as = crate::domain::EngineInfo)]
pub struct EngineSchema {
    version: String,
    build_date: String,
    graph_date: String,
    osm_date: String,
}

/// OpenAPI schema for [`crate::domain::IsochroneMetadata`].
#[derive(ToSchema)]
#[schema(as = crate::domain::IsochroneMetadata)]
pub struct MetadataSchema {
    id: Option<String>,
    attribution: String,
    #[schema(example = "isochrones")]
    service: String,
    /// Generation time in epoch milliseconds.
    timestamp: i64,
    query: QueryEchoSchema,
    engine: EngineSchema,
}

/// OpenAPI schema for [`crate::domain::IsochroneResponse`].
#[derive(ToSchema)]
#[schema(as = crate::domain::IsochroneResponse)]
pub struct FeatureCollectionSchema {
    /// Always `FeatureCollection`.
    #[schema(rename = "type", example = "FeatureCollection")]
    kind: String,
    /// Always `[-180, -90, 180, 90]`.
    bbox: Vec<f64>,
    features: Vec<FeatureSchema>,
    metadata: MetadataSchema,
}

/// OpenAPI schema for [`crate::domain::IntersectionPolygon`].
#[derive(ToSchema)]
#[schema(as = crate::domain::IntersectionPolygon)]
pub struct IntersectionSchema {
    /// The two marker ids, in request order.
    markers: Vec<String>,
    /// GeoJSON `Polygon` or `MultiPolygon`.
    geometry: serde_json::Value,
}

/// OpenAPI schema for [`crate::domain::SkippedPair`].
#[derive(ToSchema)]
#[schema(as = crate::domain::SkippedPair)]
pub struct SkippedPairSchema {
    markers: Vec<String>,
    reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    fn error_schema_uses_wire_field_names() {
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        let json = schema_to_json::<ErrorSchema>();
        assert!(json.contains("traceId"));
        assert!(json.contains("details"));
    }

    #[rstest]
    fn error_code_schema_lists_every_code() {
        let json = schema_to_json::<ErrorCodeSchema>();
        for code in ["invalid_request", "not_found", "internal_error"] {
            assert!(json.contains(code), "missing {code}");
        }
    }

    #[rstest]
    fn feature_collection_schema_exposes_geojson_type() {
        assert_eq!(
            FeatureCollectionSchema::name(),
            "crate.domain.IsochroneResponse"
        );
        let json = schema_to_json::<FeatureCollectionSchema>();
        assert!(json.contains("\"type\""));
        assert!(json.contains("metadata"));
    }
}
