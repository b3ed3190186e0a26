use super::{error_response, invalid_request, AppState};
use crate::models::{HealthResponse, ProfilePatch, PublicProfile, RegisterRequest};
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Configure health and profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/profiles", web::post().to(register))
        .route("/profiles/{id}", web::get().to(get_profile))
        .route("/profiles/{id}", web::patch().to(update_profile));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let snapshot = state.store.snapshot();

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        profiles: snapshot.profiles().len(),
        matches: snapshot.registry().len(),
        timestamp: chrono::Utc::now(),
    })
}

/// Register endpoint
///
/// POST /api/v1/profiles
///
/// Responds 409 when the email is already taken.
async fn register(state: web::Data<AppState>, req: web::Json<RegisterRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return invalid_request(errors);
    }

    match state.store.register(req.into_inner().into()) {
        Ok(profile) => HttpResponse::Created().json(profile),
        Err(e) => error_response(&e),
    }
}

/// Public profile endpoint; the email is never included
async fn get_profile(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match state.store.profile(&path) {
        Ok(profile) => HttpResponse::Ok().json(PublicProfile::from(&profile)),
        Err(e) => error_response(&e),
    }
}

/// Edit profile endpoint
///
/// PATCH /api/v1/profiles/{id}
///
/// Only the fields present in the body change. Every browsing queue restarts.
async fn update_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    patch: web::Json<ProfilePatch>,
) -> impl Responder {
    match state.store.update_profile(&path, &patch) {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => error_response(&e),
    }
}
