use crate::dto::quiz_dto::SessionView;
use crate::dto::view_dto::ViewSnapshot;
use crate::error::{Error, GenerationError, Result, SessionError};
use crate::models::note::Note;
use crate::models::user::User;
use crate::services::ai_service::{GenerationResult, QuizGenerator};
use crate::services::session_service::{GenerationTicket, QuizSession, Resolution};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Intro,
    Login,
    Dashboard,
    Viewer,
    Quiz,
}

/// Which screen is showing, for whom, and the quiz run attached to it.
#[derive(Debug)]
pub struct ViewController {
    screen: Screen,
    user: Option<User>,
    active_note: Option<Note>,
    session: Option<QuizSession>,
    next_sequence: u64,
}

impl ViewController {
    pub fn new(user: Option<User>) -> Self {
        Self {
            screen: Screen::Intro,
            user,
            active_note: None,
            session: None,
            next_sequence: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn active_note(&self) -> Option<&Note> {
        self.active_note.as_ref()
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> std::result::Result<&mut QuizSession, SessionError> {
        match self.screen {
            Screen::Quiz => self.session.as_mut().ok_or(SessionError::NoSession),
            _ => Err(SessionError::NoSession),
        }
    }

    fn require_user(&self) -> Result<&User> {
        self.user
            .as_ref()
            .ok_or_else(|| Error::Unauthorized("Sign in to continue".to_string()))
    }

    pub fn finish_intro(&mut self) -> Screen {
        if self.screen == Screen::Intro {
            self.screen = if self.user.is_some() {
                Screen::Dashboard
            } else {
                Screen::Login
            };
        }
        self.screen
    }

    pub fn login(&mut self, user: User) {
        tracing::info!(email = %user.email, role = ?user.role, "Signed in");
        self.user = Some(user);
        self.screen = Screen::Dashboard;
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!(email = %user.email, "Signed out");
        }
        self.active_note = None;
        self.session = None;
        self.screen = Screen::Login;
    }

    /// Back to the note list. Any quiz run is discarded.
    pub fn show_dashboard(&mut self) -> Result<()> {
        self.require_user()?;
        self.session = None;
        self.screen = Screen::Dashboard;
        Ok(())
    }

    pub fn open_note(&mut self, note: Note) -> Result<()> {
        self.require_user()?;
        self.session = None;
        self.active_note = Some(note);
        self.screen = Screen::Viewer;
        Ok(())
    }

    /// Opens a loading session for `note` and hands back the ticket the
    /// generation result must present to be accepted.
    pub fn begin_quiz(&mut self, note: Note) -> Result<GenerationTicket> {
        self.require_user()?;
        self.next_sequence += 1;
        let ticket = GenerationTicket {
            note_id: note.id.clone(),
            sequence: self.next_sequence,
        };
        self.active_note = Some(note);
        self.session = Some(QuizSession::loading(ticket.clone()));
        self.screen = Screen::Quiz;
        Ok(ticket)
    }

    pub fn complete_quiz(&mut self, ticket: &GenerationTicket, result: GenerationResult) -> Resolution {
        let resolution = match (&self.screen, self.session.as_mut()) {
            (Screen::Quiz, Some(session)) => session.resolve(ticket, result),
            _ => Resolution::Stale,
        };
        if resolution == Resolution::Stale {
            tracing::info!(
                note_id = %ticket.note_id,
                sequence = ticket.sequence,
                "Discarding quiz for a session that is no longer active"
            );
        }
        resolution
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            screen: self.screen,
            user: self.user.clone(),
            can_author: self.user.as_ref().is_some_and(User::is_admin),
            active_note: self.active_note.clone(),
            session: self
                .session
                .as_ref()
                .filter(|_| self.screen == Screen::Quiz)
                .map(SessionView::from),
        }
    }
}

/// Starts a quiz for `note` and waits for the generator, holding the
/// controller lock only while the session is opened and resolved.
pub async fn take_quiz(
    controller: &Mutex<ViewController>,
    generator: &dyn QuizGenerator,
    note: Note,
    timeout: Duration,
) -> Result<(Resolution, ViewSnapshot)> {
    let (content, title) = (note.content.clone(), note.title.clone());
    let ticket = controller.lock().await.begin_quiz(note)?;

    let result = match tokio::time::timeout(timeout, generator.generate_quiz(content, title)).await {
        Ok(result) => result,
        Err(_) => Err(GenerationError::Timeout(timeout)),
    };

    let mut controller = controller.lock().await;
    let resolution = controller.complete_quiz(&ticket, result);
    Ok((resolution, controller.snapshot()))
}
