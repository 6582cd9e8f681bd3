//! Handler tests for the overlap endpoint.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::{MarkerStatus, OverlapsResponse};
use crate::Trace;
use crate::domain::ports::{DisabledIsochroneCache, IsochroneQuery, MockIsochroneQuery};
use crate::domain::{Error, IsochroneService};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::HttpState;
use crate::test_support::{MutableClock, SquareSynthesizer};

#[fixture]
fn square_query() -> Arc<dyn IsochroneQuery> {
    Arc::new(IsochroneService::new(
        Arc::new(DisabledIsochroneCache),
        Arc::new(SquareSynthesizer),
        Arc::new(MutableClock::fixed()),
    ))
}

async fn post(query: Arc<dyn IsochroneQuery>, body: Value) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(HttpState::new(query)))
            .wrap(Trace)
            .configure(configure_api),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/api/v1/overlaps")
        .set_json(body)
        .to_request();
    let res = test::call_service(&app, req).await;
    let status = res.status();
    (status, test::read_body_json(res).await)
}

fn marker(id: &str, lon: f64, lat: f64) -> Value {
    json!({"id": id, "location": [lon, lat], "transport": "foot-walking", "range": 5000})
}

#[rstest]
#[actix_web::test]
async fn overlapping_pair_yields_one_intersection(square_query: Arc<dyn IsochroneQuery>) {
    let (status, body) = post(
        square_query,
        json!({"markers": [marker("a", 2.0, 2.0), marker("b", 2.0, 2.0), marker("c", 40.0, 40.0)]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: OverlapsResponse = serde_json::from_value(body.clone()).expect("response shape");
    assert_eq!(response.markers.len(), 3);
    assert!(
        response
            .markers
            .iter()
            .all(|marker| marker.status == MarkerStatus::Resolved && marker.feature.is_some())
    );
    assert_eq!(response.intersections.len(), 1);
    assert_eq!(body["intersections"][0]["markers"], json!(["a", "b"]));
    assert_eq!(body["intersections"][0]["geometry"]["type"], "Polygon");
    assert!(response.skipped.is_empty());
}

#[rstest]
#[actix_web::test]
async fn disjoint_markers_yield_no_intersections(square_query: Arc<dyn IsochroneQuery>) {
    let (status, body) = post(
        square_query,
        json!({"markers": [marker("a", 0.0, 0.0), marker("b", 10.0, 10.0)]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["intersections"], json!([]));
}

#[rstest]
#[actix_web::test]
async fn failed_markers_are_listed_without_feature() {
    let mut query = MockIsochroneQuery::new();
    query
        .expect_compute()
        .returning(|_| Err(Error::internal("synthesis failed")));

    let (status, body) = post(
        Arc::new(query),
        json!({"markers": [marker("a", 0.0, 0.0), marker("b", 0.0, 0.0)]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["markers"],
        json!([{"id": "a", "status": "failed"}, {"id": "b", "status": "failed"}])
    );
    assert_eq!(body["intersections"], json!([]));
}

#[rstest]
#[case::duplicate(json!({"markers": [marker("a", 0.0, 0.0), marker("a", 1.0, 1.0)]}), "duplicate_marker_id")]
#[case::blank_id(json!({"markers": [marker(" ", 0.0, 0.0)]}), "empty_marker_id")]
#[case::transport(json!({"markers": [{"id": "a", "location": [0.0, 0.0], "transport": "rocket", "range": 10}]}), "unknown_transport")]
#[case::range(json!({"markers": [{"id": "a", "location": [0.0, 0.0], "transport": "driving-car", "range": 0}]}), "non_positive_range")]
#[case::huge_range(json!({"markers": [{"id": "a", "location": [0.0, 0.0], "transport": "driving-car", "range": 1e160}, marker("b", 0.0, 0.0)]}), "range_too_large")]
#[actix_web::test]
async fn invalid_marker_sets_are_rejected(#[case] payload: Value, #[case] code: &str) {
    let mut query = MockIsochroneQuery::new();
    query.expect_compute().never();

    let (status, body) = post(Arc::new(query), payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], code);
}
