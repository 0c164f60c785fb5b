use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};

use crate::dto::note_dto::{CreateNotePayload, NotesQuery};
use crate::dto::view_dto::ViewSnapshot;
use crate::error::{Error, Result};
use crate::models::note::Note;
use crate::models::user::User;
use crate::utils::validation::validate;
use crate::AppState;

#[axum::debug_handler]
pub async fn list_notes(
    State(state): State<AppState>,
    Query(query): Query<NotesQuery>,
) -> Result<Json<Vec<Note>>> {
    let notes = match query.q.as_deref() {
        Some(term) => state.store.search_notes(term).await?,
        None => state.store.list_notes().await?,
    };
    Ok(Json(notes))
}

#[axum::debug_handler]
pub async fn create_note(
    State(state): State<AppState>,
    Extension(author): Extension<User>,
    Json(payload): Json<CreateNotePayload>,
) -> Result<(StatusCode, Json<Note>)> {
    validate(&payload)?;
    let note = state.store.author_note(payload).await?;
    tracing::info!(id = %note.id, author = %author.email, "Note published");
    Ok((StatusCode::CREATED, Json(note)))
}

#[axum::debug_handler]
pub async fn open_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ViewSnapshot>> {
    let note = state
        .store
        .find_note(&id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Note {} not found", id)))?;

    let mut controller = state.controller.lock().await;
    controller.open_note(note)?;
    Ok(Json(controller.snapshot()))
}
