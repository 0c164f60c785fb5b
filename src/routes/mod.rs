pub mod auth;
pub mod health;
pub mod notes;
pub mod quiz;
pub mod view;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::{auth as guard, cors::client_cors, rate_limit};
use crate::AppState;

pub fn router(state: AppState) -> Router {
    let limiter = rate_limit::RateLimiter::per_second(state.quiz_rps);

    let public = Router::new()
        .route("/health", get(health::health))
        .route("/api/view", get(view::get_view))
        .route("/api/intro/finish", post(view::finish_intro))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout));

    let members = Router::new()
        .route("/api/dashboard", post(view::show_dashboard))
        .route(
            "/api/notes",
            get(notes::list_notes).merge(
                post(notes::create_note)
                    .layer(from_fn_with_state(state.clone(), guard::require_admin)),
            ),
        )
        .route("/api/notes/:id", get(notes::open_note))
        .route(
            "/api/notes/:id/quiz",
            post(quiz::start_quiz).layer(from_fn_with_state(limiter, rate_limit::throttle)),
        )
        .route("/api/quiz", get(quiz::get_quiz))
        .route("/api/quiz/answer", post(quiz::select_answer))
        .route("/api/quiz/next", post(quiz::next_question))
        .route("/api/quiz/restart", post(quiz::restart_quiz))
        .route_layer(from_fn_with_state(state.clone(), guard::require_signed_in));

    public
        .merge(members)
        .with_state(state)
        .layer(client_cors())
        .layer(TraceLayer::new_for_http())
}
