use super::{error_response, invalid_request, AppState};
use crate::models::{
    DateGroupResponse, MarkReadRequest, MarkReadResponse, SendMessageRequest, SendMessageResponse,
    ViewerQuery,
};
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Configure match and messaging routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/matches", web::get().to(list_matches))
        .route("/threads", web::get().to(list_threads))
        .route("/matches/{id}/messages", web::get().to(get_messages))
        .route("/matches/{id}/messages", web::post().to(send_message))
        .route("/matches/{id}/read", web::post().to(mark_read));
}

/// GET /api/v1/matches?userId={userId}
async fn list_matches(
    state: web::Data<AppState>,
    query: web::Query<ViewerQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return invalid_request(errors);
    }

    match state.store.matches_for(&query.user_id) {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(&e),
    }
}

/// Inbox endpoint
///
/// GET /api/v1/threads?userId={userId}
///
/// Threads come back most recently active first, each with its unread count.
async fn list_threads(
    state: web::Data<AppState>,
    query: web::Query<ViewerQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return invalid_request(errors);
    }

    match state.store.threads(&query.user_id) {
        Ok(threads) => HttpResponse::Ok().json(threads),
        Err(e) => error_response(&e),
    }
}

/// Conversation endpoint
///
/// GET /api/v1/matches/{id}/messages?userId={userId}
async fn get_messages(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ViewerQuery>,
) -> impl Responder {
    let today = state.store.today();

    match state.store.grouped_messages(&path, &query.user_id) {
        Ok(groups) => HttpResponse::Ok().json(
            groups
                .into_iter()
                .map(|group| DateGroupResponse::labelled(group, today))
                .collect::<Vec<_>>(),
        ),
        Err(e) => error_response(&e),
    }
}

/// Send message endpoint
///
/// POST /api/v1/matches/{id}/messages
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "text": "string"
/// }
/// ```
/// Blank text is accepted and ignored (`sent: false`).
async fn send_message(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<SendMessageRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return invalid_request(errors);
    }

    match state.store.send_message(&path, &req.user_id, &req.text) {
        Ok(message) => HttpResponse::Ok().json(SendMessageResponse {
            sent: message.is_some(),
            message,
        }),
        Err(e) => error_response(&e),
    }
}

/// POST /api/v1/matches/{id}/read
async fn mark_read(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<MarkReadRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return invalid_request(errors);
    }

    match state.store.mark_read(&path, &req.user_id) {
        Ok(marked_read) => HttpResponse::Ok().json(MarkReadResponse { marked_read }),
        Err(e) => error_response(&e),
    }
}
