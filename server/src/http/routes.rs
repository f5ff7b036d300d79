use crate::{error::ApiError, http};
use actix_web::web;

/// Mount every HTTP sub-module under `/api`.
///
/// Extractor failures (bad JSON, non-UUID path ids, bad query strings) are
/// answered in the same `{"error": ..}` shape as every other invalid input.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(
                web::JsonConfig::default()
                    .error_handler(|err, _| ApiError::invalid(err.to_string()).into()),
            )
            .app_data(
                web::PathConfig::default()
                    .error_handler(|err, _| ApiError::invalid(err.to_string()).into()),
            )
            .app_data(
                web::QueryConfig::default()
                    .error_handler(|err, _| ApiError::invalid(err.to_string()).into()),
            )
            .configure(http::health::init_routes)
            .configure(http::members::init_routes)
            .configure(http::matches::init_routes)
            .configure(http::team_balance::init_routes),
    );
}
