use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of the single outbound quiz generation call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GenerationError {
    #[error("Note has no content to build a quiz from")]
    EmptyContent,

    #[error("Generation request failed: {0}")]
    Transport(String),

    #[error("Generation service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Generation response is malformed: {0}")]
    Malformed(String),

    #[error("Generation returned no usable questions")]
    NoQuestions,

    #[error("Generation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::Transport(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("No quiz session is active")]
    NoSession,

    #[error("Quiz is still being generated")]
    StillLoading,

    #[error("Quiz generation failed")]
    GenerationFailed,

    #[error("Quiz is already finished")]
    AlreadyFinished,

    #[error("Quiz is not finished yet")]
    NotFinished,

    #[error("Option {option} is out of range for a question with {available} options")]
    InvalidOption { option: usize, available: usize },

    #[error("Select an answer before moving on")]
    AnswerRequired,
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Error::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Generation(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
            Error::Session(err) => match err {
                SessionError::NoSession => (StatusCode::NOT_FOUND, err.to_string()),
                SessionError::InvalidOption { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
                _ => (StatusCode::CONFLICT, err.to_string()),
            },
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Error::Io(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Error::Anyhow(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
