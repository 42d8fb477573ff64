//! Text note routes
//!
//! All endpoints require authentication and only ever expose the
//! caller's own notes.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::NoteService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use content_hub_shared::{MessageResponse, NoteRequest, NoteResponse};

use super::parse_id;

/// Create text note routes
pub fn text_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notes).post(create_note))
        .route("/:id", get(get_note).put(update_note).delete(delete_note))
}

/// POST /api/text
async fn create_note(
    State(state): State<AppState>,
    auth_user: AuthUser,
    body: Result<Json<NoteRequest>, JsonRejection>,
) -> ApiResult<Json<NoteResponse>> {
    let Json(req) = body?;
    let note = NoteService::create(state.notes.as_ref(), auth_user, req).await?;
    Ok(Json(note))
}

/// GET /api/text
async fn list_notes(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Json<Vec<NoteResponse>>> {
    let notes = NoteService::list(state.notes.as_ref(), auth_user).await?;
    Ok(Json(notes))
}

/// GET /api/text/:id
async fn get_note(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<NoteResponse>> {
    let id = parse_id(&id, "note not found")?;
    let note = NoteService::get(state.notes.as_ref(), auth_user, id).await?;
    Ok(Json(note))
}

/// PUT /api/text/:id
async fn update_note(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<NoteRequest>, JsonRejection>,
) -> ApiResult<Json<NoteResponse>> {
    let id = parse_id(&id, "note not found")?;
    let Json(req) = body?;
    let note = NoteService::update(state.notes.as_ref(), auth_user, id, req).await?;
    Ok(Json(note))
}

/// DELETE /api/text/:id
async fn delete_note(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id, "note not found")?;
    let response = NoteService::delete(state.notes.as_ref(), auth_user, id).await?;
    Ok(Json(response))
}
