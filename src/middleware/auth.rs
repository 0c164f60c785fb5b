use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::models::user::User;
use crate::AppState;

pub async fn require_signed_in(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(user) = state.controller.lock().await.user().cloned() else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Sign in to continue" })),
        )
            .into_response();
    };
    req.extensions_mut().insert(user);
    next.run(req).await
}

/// Authoring gate: only the configured administrator may add notes.
pub async fn require_admin(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let user: Option<User> = state.controller.lock().await.user().cloned();
    match user {
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Sign in to continue" })),
        )
            .into_response(),
        Some(user) if !user.is_admin() => {
            tracing::warn!(email = %user.email, "Non-admin tried to author a note");
            (StatusCode::FORBIDDEN, Json(json!({ "error": "forbidden" }))).into_response()
        }
        Some(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
    }
}
