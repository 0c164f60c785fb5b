use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::dto::quiz_dto::{SelectAnswerPayload, SessionView};
use crate::dto::view_dto::ViewSnapshot;
use crate::error::{Error, Result};
use crate::services::screen_service::take_quiz;
use crate::services::session_service::Resolution;
use crate::AppState;

/// Generates a quiz for the note and opens it. A failed generation is not an
/// HTTP error: the snapshot carries the failed session and its message.
#[axum::debug_handler]
pub async fn start_quiz(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ViewSnapshot>> {
    let note = state
        .store
        .find_note(&id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Note {} not found", id)))?;

    let (resolution, snapshot) = take_quiz(
        &state.controller,
        state.quiz_generator.as_ref(),
        note,
        state.generation_timeout,
    )
    .await?;
    if resolution == Resolution::Stale {
        tracing::info!(note_id = %id, "Quiz arrived after the user moved on");
    }
    Ok(Json(snapshot))
}

#[axum::debug_handler]
pub async fn get_quiz(State(state): State<AppState>) -> Result<Json<SessionView>> {
    let mut controller = state.controller.lock().await;
    let session = controller.session_mut()?;
    Ok(Json(SessionView::from(&*session)))
}

#[axum::debug_handler]
pub async fn select_answer(
    State(state): State<AppState>,
    Json(payload): Json<SelectAnswerPayload>,
) -> Result<Json<SessionView>> {
    let mut controller = state.controller.lock().await;
    let session = controller.session_mut()?;
    session.select_answer(payload.option)?;
    Ok(Json(SessionView::from(&*session)))
}

#[axum::debug_handler]
pub async fn next_question(State(state): State<AppState>) -> Result<Json<SessionView>> {
    let mut controller = state.controller.lock().await;
    let session = controller.session_mut()?;
    session.advance()?;
    Ok(Json(SessionView::from(&*session)))
}

#[axum::debug_handler]
pub async fn restart_quiz(State(state): State<AppState>) -> Result<Json<SessionView>> {
    let mut controller = state.controller.lock().await;
    let session = controller.session_mut()?;
    session.restart()?;
    Ok(Json(SessionView::from(&*session)))
}
