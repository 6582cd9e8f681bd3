//! HTTP inbound adapter exposing REST endpoints.

pub mod cache_control;
pub mod error;
pub mod health;
pub mod isochrones;
pub mod overlaps;
pub mod schemas;
pub mod state;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register the versioned API under `/api/v1`, including the JSON body
/// configuration that maps malformed bodies to `invalid_request`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use isochrone_backend::inbound::http::configure_api;
///
/// let _app = App::new().configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
            .service(isochrones::compute_isochrones)
            .service(overlaps::compute_overlaps),
    );
}
