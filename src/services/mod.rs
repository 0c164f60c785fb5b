pub mod ai_service;
pub mod auth_service;
pub mod grading_service;
pub mod note_service;
pub mod screen_service;
pub mod session_service;
