use crate::dto::quiz_dto::SessionView;
use crate::models::note::Note;
use crate::models::user::User;
use crate::services::screen_service::Screen;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub screen: Screen,
    pub user: Option<User>,
    pub can_author: bool,
    pub active_note: Option<Note>,
    pub session: Option<SessionView>,
}
