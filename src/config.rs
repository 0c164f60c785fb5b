use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;
use url::Url;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: Url,
    pub admin_email: String,
    pub storage_path: Option<String>,
    pub generation_timeout_secs: u64,
    pub quiz_rps: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match env::var("LOG_FORMAT").map(|v| v.to_lowercase()).as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let storage_path = get_env_or("STORAGE_PATH", "study_vault.json");

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "127.0.0.1:8080"),
            gemini_api_key: get_env("GEMINI_API_KEY")?,
            gemini_model: get_env_or("GEMINI_MODEL", DEFAULT_MODEL),
            gemini_base_url: parse_base_url(&get_env_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL))?,
            admin_email: get_env("ADMIN_EMAIL")?,
            storage_path: (!storage_path.trim().is_empty()).then_some(storage_path),
            generation_timeout_secs: get_env_parse_or("GENERATION_TIMEOUT_SECS", 30)?,
            quiz_rps: get_env_parse_or("QUIZ_RPS", 2)?,
        })
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs.max(1))
    }
}

/// Parses the generation endpoint base, forcing a trailing slash so that
/// relative joins keep any path prefix.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    let url = Url::parse(&normalized)
        .map_err(|e| Error::Config(format!("Invalid value for GEMINI_BASE_URL: {}", e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::Config(format!(
            "GEMINI_BASE_URL must be http or https, got {}",
            url.scheme()
        )));
    }
    Ok(url)
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| {
        tracing::info!("{} not set, using default: {}", name, default);
        default.to_string()
    })
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}
