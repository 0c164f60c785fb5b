use axum::{extract::State, response::Json};

use crate::dto::auth_dto::LoginPayload;
use crate::dto::view_dto::ViewSnapshot;
use crate::error::Result;
use crate::AppState;

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<ViewSnapshot>> {
    let user = state.auth_service.sign_in(payload)?;
    state.store.set_user(&user).await?;

    let mut controller = state.controller.lock().await;
    controller.login(user);
    Ok(Json(controller.snapshot()))
}

#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>) -> Result<Json<ViewSnapshot>> {
    state.store.clear_user().await?;

    let mut controller = state.controller.lock().await;
    controller.logout();
    Ok(Json(controller.snapshot()))
}
