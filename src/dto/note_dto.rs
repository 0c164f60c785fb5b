use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateNotePayload {
    #[validate(length(min = 1, max = 200), custom(function = "crate::utils::validation::not_blank"))]
    pub title: String,
    #[validate(length(min = 1, max = 50), custom(function = "crate::utils::validation::not_blank"))]
    pub subject: String,
    #[validate(length(min = 1, max = 50), custom(function = "crate::utils::validation::not_blank"))]
    pub tag: String,
    #[validate(custom(function = "crate::utils::validation::not_blank"))]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotesQuery {
    pub q: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CreateNotePayload {
        CreateNotePayload {
            title: "Data Structures 101".into(),
            subject: "CS201".into(),
            tag: "Module 1".into(),
            content: "A Stack is LIFO while a Queue is FIFO.".into(),
        }
    }

    #[test]
    fn complete_note_is_valid() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn blank_fields_are_rejected() {
        let mut p = payload();
        p.content = "   ".into();
        let errors = p.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("content"));

        let mut p = payload();
        p.title = String::new();
        assert!(p.validate().unwrap_err().field_errors().contains_key("title"));
    }
}
