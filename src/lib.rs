pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;
pub mod utils;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::services::{
    ai_service::{AIService, QuizGenerator},
    auth_service::AuthService,
    note_service::ContentStore,
    screen_service::ViewController,
};
use crate::storage::local_storage::LocalStorage;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: ContentStore,
    pub auth_service: AuthService,
    pub quiz_generator: Arc<dyn QuizGenerator>,
    pub controller: Arc<Mutex<ViewController>>,
    pub generation_timeout: Duration,
    pub quiz_rps: u32,
}

impl AppState {
    /// Wires the components together. The stored user, if any, is restored
    /// into the controller.
    pub async fn new(
        config: &Config,
        storage: LocalStorage,
        quiz_generator: Arc<dyn QuizGenerator>,
    ) -> Result<Self> {
        let store = ContentStore::new(storage);
        let user = store.get_user().await?;
        let notes = store.list_notes().await?;
        tracing::info!(
            notes = notes.len(),
            signed_in = user.is_some(),
            "Content store ready"
        );

        Ok(Self {
            store,
            auth_service: AuthService::new(config.admin_email.clone()),
            quiz_generator,
            controller: Arc::new(Mutex::new(ViewController::new(user))),
            generation_timeout: config.generation_timeout(),
            quiz_rps: config.quiz_rps,
        })
    }

    pub async fn from_config(config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.generation_timeout())
            .build()
            .map_err(|e| Error::Internal(format!("Cannot build HTTP client: {}", e)))?;
        let ai_service = AIService::from_config(config, http_client)?;

        let storage = match &config.storage_path {
            Some(path) => LocalStorage::open(path).await?,
            None => LocalStorage::in_memory(),
        };

        Self::new(config, storage, Arc::new(ai_service)).await
    }
}
