use super::{error_response, invalid_request, AppState};
use crate::models::{ErrorResponse, FilterUpdateRequest, SwipeRequest, ViewerQuery};
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Configure discovery routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/browse", web::get().to(current_candidate))
        .route("/browse/filters", web::get().to(get_filters))
        .route("/browse/filters", web::put().to(update_filters))
        .route("/browse/filters", web::delete().to(clear_filters))
        .route("/browse/swipe", web::post().to(swipe));
}

/// Current candidate endpoint
///
/// GET /api/v1/browse?userId={userId}
///
/// `status` distinguishes `empty` (nothing matched the filters) from
/// `exhausted` (everything has been swiped).
async fn current_candidate(
    state: web::Data<AppState>,
    query: web::Query<ViewerQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return invalid_request(errors);
    }

    match state.store.browse(&query.user_id) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => error_response(&e),
    }
}

async fn get_filters(state: web::Data<AppState>, query: web::Query<ViewerQuery>) -> impl Responder {
    match state.store.criteria(&query.user_id) {
        Ok(criteria) => HttpResponse::Ok().json(criteria),
        Err(e) => error_response(&e),
    }
}

/// Update filters endpoint
///
/// PUT /api/v1/browse/filters
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "skills": ["Rust"],
///   "location": "berlin"
/// }
/// ```
/// Omitted categories keep their current value.
async fn update_filters(
    state: web::Data<AppState>,
    req: web::Json<FilterUpdateRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return invalid_request(errors);
    }

    match state.store.update_criteria(&req.user_id, &req.patch) {
        Ok(view) => {
            tracing::debug!(
                "Filters updated for {}: {} candidates",
                req.user_id,
                view.total
            );
            HttpResponse::Ok().json(view)
        }
        Err(e) => error_response(&e),
    }
}

async fn clear_filters(
    state: web::Data<AppState>,
    query: web::Query<ViewerQuery>,
) -> impl Responder {
    match state.store.clear_criteria(&query.user_id) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => error_response(&e),
    }
}

/// Swipe endpoint
///
/// POST /api/v1/browse/swipe
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "decision": "like|pass"
/// }
/// ```
async fn swipe(state: web::Data<AppState>, req: web::Json<SwipeRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return invalid_request(errors);
    }

    let decision = match req.decision() {
        Some(decision) => decision,
        None => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid decision".to_string(),
                message: "Decision must be one of: like, pass".to_string(),
                status_code: 400,
            });
        }
    };

    match state.store.swipe(&req.user_id, decision) {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => error_response(&e),
    }
}
