//! Text note service
//!
//! Notes are private: reads by id are owner-checked like mutations.

use crate::auth::{ensure_owner, AuthUser};
use crate::error::ApiError;
use crate::repositories::{NoteRecord, NoteRepository};
use content_hub_shared::{MessageResponse, NoteRequest, NoteResponse};
use tracing::info;
use uuid::Uuid;

/// Text note service
pub struct NoteService;

impl NoteService {
    pub async fn create(
        notes: &dyn NoteRepository,
        user: AuthUser,
        req: NoteRequest,
    ) -> Result<NoteResponse, ApiError> {
        req.validate().map_err(ApiError::Validation)?;

        let note = notes.create(user.user_id, &req.content).await?;
        info!(note_id = %note.id, owner_id = %note.owner_id, "Note created");
        Ok(note.into())
    }

    /// The caller's notes, newest first
    pub async fn list(
        notes: &dyn NoteRepository,
        user: AuthUser,
    ) -> Result<Vec<NoteResponse>, ApiError> {
        let listed = notes.list_by_owner(user.user_id).await?;
        Ok(listed.into_iter().map(NoteResponse::from).collect())
    }

    pub async fn get(
        notes: &dyn NoteRepository,
        user: AuthUser,
        id: Uuid,
    ) -> Result<NoteResponse, ApiError> {
        let note = find_note(notes, id).await?;
        ensure_owner(&note, &user)?;
        Ok(note.into())
    }

    pub async fn update(
        notes: &dyn NoteRepository,
        user: AuthUser,
        id: Uuid,
        req: NoteRequest,
    ) -> Result<NoteResponse, ApiError> {
        req.validate().map_err(ApiError::Validation)?;

        let existing = find_note(notes, id).await?;
        ensure_owner(&existing, &user)?;

        let note = notes
            .update(id, &req.content)
            .await?
            .ok_or_else(note_not_found)?;
        Ok(note.into())
    }

    pub async fn delete(
        notes: &dyn NoteRepository,
        user: AuthUser,
        id: Uuid,
    ) -> Result<MessageResponse, ApiError> {
        let existing = find_note(notes, id).await?;
        ensure_owner(&existing, &user)?;

        if !notes.delete(id).await? {
            return Err(note_not_found());
        }

        info!(note_id = %id, "Note deleted");
        Ok(MessageResponse::new("note deleted"))
    }
}

async fn find_note(notes: &dyn NoteRepository, id: Uuid) -> Result<NoteRecord, ApiError> {
    notes.find_by_id(id).await?.ok_or_else(note_not_found)
}

fn note_not_found() -> ApiError {
    ApiError::NotFound("note not found".to_string())
}
