use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub content: String,
    pub date: String,
    pub tag: String,
}

impl Note {
    pub fn welcome() -> Self {
        Self {
            id: "1".to_string(),
            title: "Study Vault: Introduction".to_string(),
            subject: "SYSTEM".to_string(),
            content: "Welcome to the study vault. As a student, you can read notes and take AI generated tests. As an admin, you can add new notes for everyone.".to_string(),
            date: "System".to_string(),
            tag: "Notice".to_string(),
        }
    }

    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.title.to_lowercase().contains(&term)
            || self.subject.to_lowercase().contains(&term)
    }
}
