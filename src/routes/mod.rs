// Route exports
pub mod browse;
pub mod matches;
pub mod profiles;

use crate::core::CoreError;
use crate::models::ErrorResponse;
use crate::services::Store;
use actix_web::{http::StatusCode, web, HttpResponse};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(profiles::configure)
            .configure(browse::configure)
            .configure(matches::configure),
    );
}

/// Map a core error onto its HTTP status and JSON body
pub(crate) fn error_response(err: &CoreError) -> HttpResponse {
    let (status, error) = match err {
        CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation failed"),
        CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "Not found"),
        CoreError::Conflict(_) => (StatusCode::CONFLICT, "Conflict"),
    };
    tracing::warn!("Request rejected ({}): {}", status.as_u16(), err);

    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: err.to_string(),
        status_code: status.as_u16(),
    })
}

pub(crate) fn invalid_request(errors: validator::ValidationErrors) -> HttpResponse {
    tracing::info!("Validation failed: field_errors={:?}", errors);
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}
