use crate::dto::note_dto::CreateNotePayload;
use crate::error::Result;
use crate::models::note::Note;
use crate::models::user::User;
use crate::storage::local_storage::LocalStorage;
use crate::utils::time;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const NOTES_KEY: &str = "study_vault_notes";
pub const USER_KEY: &str = "study_vault_user";

/// Notes and the signed-in user, kept in local storage under two fixed keys.
#[derive(Clone)]
pub struct ContentStore {
    storage: Arc<Mutex<LocalStorage>>,
}

impl ContentStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
        }
    }

    /// Newest first. Seeds the welcome note when nothing usable is stored.
    pub async fn list_notes(&self) -> Result<Vec<Note>> {
        let mut storage = self.storage.lock().await;
        load_notes(&mut storage).await
    }

    pub async fn search_notes(&self, term: &str) -> Result<Vec<Note>> {
        let notes = self.list_notes().await?;
        Ok(notes.into_iter().filter(|n| n.matches(term)).collect())
    }

    pub async fn find_note(&self, id: &str) -> Result<Option<Note>> {
        let notes = self.list_notes().await?;
        Ok(notes.into_iter().find(|n| n.id == id))
    }

    pub async fn add_note(&self, note: Note) -> Result<()> {
        let mut storage = self.storage.lock().await;
        let mut notes = load_notes(&mut storage).await?;
        tracing::info!(id = %note.id, title = %note.title, "Adding note");
        notes.insert(0, note);
        save_notes(&mut storage, &notes).await
    }

    /// Stamps a submitted note with its id and date. Callers are
    /// responsible for the admin check.
    pub async fn author_note(&self, payload: CreateNotePayload) -> Result<Note> {
        let at = time::now();
        let note = Note {
            id: time::note_id(at),
            title: payload.title.trim().to_string(),
            subject: payload.subject.trim().to_string(),
            content: payload.content,
            date: time::note_date(at),
            tag: payload.tag.trim().to_string(),
        };
        self.add_note(note.clone()).await?;
        Ok(note)
    }

    pub async fn get_user(&self) -> Result<Option<User>> {
        let storage = self.storage.lock().await;
        let Some(raw) = storage.get(USER_KEY) else {
            return Ok(None);
        };
        match serde_json::from_str::<User>(raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!("Stored user is unreadable, treating as signed out: {}", e);
                Ok(None)
            }
        }
    }

    pub async fn set_user(&self, user: &User) -> Result<()> {
        let mut storage = self.storage.lock().await;
        storage.set(USER_KEY, serde_json::to_string(user)?).await
    }

    pub async fn clear_user(&self) -> Result<()> {
        let mut storage = self.storage.lock().await;
        storage.remove(USER_KEY).await
    }
}

async fn load_notes(storage: &mut LocalStorage) -> Result<Vec<Note>> {
    if let Some(raw) = storage.get(NOTES_KEY) {
        match serde_json::from_str::<Vec<Note>>(raw) {
            Ok(notes) => return Ok(notes),
            Err(e) => tracing::warn!("Stored notes are unreadable, reseeding: {}", e),
        }
    }
    let seeded = vec![Note::welcome()];
    save_notes(storage, &seeded).await?;
    Ok(seeded)
}

async fn save_notes(storage: &mut LocalStorage, notes: &[Note]) -> Result<()> {
    storage.set(NOTES_KEY, serde_json::to_string(notes)?).await
}
