pub mod auth_dto;
pub mod note_dto;
pub mod quiz_dto;
pub mod view_dto;
