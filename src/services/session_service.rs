use crate::error::{GenerationError, SessionError};
use crate::models::question::{Question, Quiz};
use crate::services::ai_service::GenerationResult;
use crate::services::grading_service::{GradingService, ScoreSummary};
use serde::{Deserialize, Serialize};

/// Identifies one generation call: the note it was issued for plus a
/// sequence number, so a repeated request for the same note is still
/// distinguishable from the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationTicket {
    pub note_id: String,
    pub sequence: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionPhase {
    Loading,
    InProgress,
    Finished,
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next(usize),
    Finished { score: u32, total: usize },
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    ticket: GenerationTicket,
    phase: SessionPhase,
    quiz: Option<Quiz>,
    current_index: usize,
    answers: Vec<Option<usize>>,
    score: u32,
}

impl QuizSession {
    pub fn loading(ticket: GenerationTicket) -> Self {
        Self {
            ticket,
            phase: SessionPhase::Loading,
            quiz: None,
            current_index: 0,
            answers: Vec::new(),
            score: 0,
        }
    }

    pub fn ticket(&self) -> &GenerationTicket {
        &self.ticket
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_ref()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    pub fn selected_answer(&self) -> Option<usize> {
        self.answers.get(self.current_index).copied().flatten()
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            SessionPhase::InProgress => self.quiz.as_ref()?.questions.get(self.current_index),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    /// Final score; only defined once the run is finished.
    pub fn score(&self) -> Option<u32> {
        self.is_finished().then_some(self.score)
    }

    pub fn summary(&self) -> Option<ScoreSummary> {
        let total = self.quiz.as_ref()?.len();
        self.score().map(|score| GradingService::summarize(score, total))
    }

    /// Applies the outcome of the generation call this session was opened
    /// for. Results carrying any other ticket are stale and leave the
    /// session untouched.
    pub fn resolve(&mut self, ticket: &GenerationTicket, result: GenerationResult) -> Resolution {
        if *ticket != self.ticket || self.phase != SessionPhase::Loading {
            return Resolution::Stale;
        }

        match result {
            Ok(quiz) if !quiz.is_empty() => {
                self.answers = vec![None; quiz.len()];
                self.quiz = Some(quiz);
                self.phase = SessionPhase::InProgress;
            }
            Ok(_) => self.fail(&GenerationError::NoQuestions),
            Err(err) => self.fail(&err),
        }
        Resolution::Applied
    }

    fn fail(&mut self, err: &GenerationError) {
        tracing::warn!(note_id = %self.ticket.note_id, "Quiz failed to load: {}", err);
        self.phase = SessionPhase::Failed {
            message: format!("Failed to load the quiz: {}", err),
        };
    }

    fn ensure_in_progress(&self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::InProgress => Ok(()),
            SessionPhase::Loading => Err(SessionError::StillLoading),
            SessionPhase::Finished => Err(SessionError::AlreadyFinished),
            SessionPhase::Failed { .. } => Err(SessionError::GenerationFailed),
        }
    }

    /// Records the choice for the current question, replacing any earlier one.
    pub fn select_answer(&mut self, option: usize) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        let available = self
            .current_question()
            .map(|q| q.options.len())
            .unwrap_or_default();
        if option >= available {
            return Err(SessionError::InvalidOption { option, available });
        }
        self.answers[self.current_index] = Some(option);
        Ok(())
    }

    pub fn can_advance(&self) -> bool {
        self.phase == SessionPhase::InProgress && self.selected_answer().is_some()
    }

    /// Scores the current question and moves on. Rejected, with no state
    /// change, until the current question has an answer.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        self.ensure_in_progress()?;
        let selected = self.selected_answer().ok_or(SessionError::AnswerRequired)?;
        let quiz = self.quiz.as_ref().ok_or(SessionError::StillLoading)?;
        let total = quiz.len();

        if GradingService::grade_answer(&quiz.questions[self.current_index], selected) {
            self.score += 1;
        }

        if self.current_index + 1 < total {
            self.current_index += 1;
            Ok(Advance::Next(self.current_index))
        } else {
            self.phase = SessionPhase::Finished;
            Ok(Advance::Finished {
                score: self.score,
                total,
            })
        }
    }

    /// Runs the same quiz again from the first question.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if !self.is_finished() {
            return Err(SessionError::NotFinished);
        }
        let total = self.quiz.as_ref().map(Quiz::len).unwrap_or_default();
        self.current_index = 0;
        self.answers = vec![None; total];
        self.score = 0;
        self.phase = SessionPhase::InProgress;
        Ok(())
    }
}
