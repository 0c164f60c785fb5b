use axum::{extract::State, response::Json};

use crate::dto::view_dto::ViewSnapshot;
use crate::error::Result;
use crate::AppState;

#[axum::debug_handler]
pub async fn get_view(State(state): State<AppState>) -> Json<ViewSnapshot> {
    Json(state.controller.lock().await.snapshot())
}

#[axum::debug_handler]
pub async fn finish_intro(State(state): State<AppState>) -> Json<ViewSnapshot> {
    let mut controller = state.controller.lock().await;
    let screen = controller.finish_intro();
    tracing::debug!(?screen, "Intro finished");
    Json(controller.snapshot())
}

#[axum::debug_handler]
pub async fn show_dashboard(State(state): State<AppState>) -> Result<Json<ViewSnapshot>> {
    let mut controller = state.controller.lock().await;
    controller.show_dashboard()?;
    Ok(Json(controller.snapshot()))
}
