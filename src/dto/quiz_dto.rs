use crate::services::grading_service::ScoreSummary;
use crate::services::session_service::{QuizSession, SessionPhase};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectAnswerPayload {
    pub option: usize,
}

/// The question on screen. Carries no answer key.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    pub question: String,
    pub options: Vec<String>,
    pub selected: Option<usize>,
    pub can_advance: bool,
    pub is_last: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub note_id: String,
    #[serde(flatten)]
    pub phase: SessionPhase,
    pub title: Option<String>,
    pub current: Option<QuestionView>,
    pub result: Option<ScoreSummary>,
}

impl From<&QuizSession> for SessionView {
    fn from(session: &QuizSession) -> Self {
        let total = session.quiz().map(|q| q.len()).unwrap_or_default();
        let current = session.current_question().map(|q| QuestionView {
            index: session.current_index(),
            total,
            question: q.question.clone(),
            options: q.options.clone(),
            selected: session.selected_answer(),
            can_advance: session.can_advance(),
            is_last: session.current_index() + 1 == total,
        });

        Self {
            note_id: session.ticket().note_id.clone(),
            phase: session.phase().clone(),
            title: session.quiz().map(|q| q.title.clone()),
            current,
            result: session.summary(),
        }
    }
}
