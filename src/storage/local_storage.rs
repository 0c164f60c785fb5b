use crate::error::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// String key-value area persisted as a single JSON object on disk.
///
/// Every write rewrites the whole file; there is one writer per profile.
#[derive(Debug, Default)]
pub struct LocalStorage {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl LocalStorage {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!("Local storage at {:?} is unreadable, starting empty: {}", path, e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::info!("Opened local storage at {:?} with {} keys", path, entries.len());
        Ok(Self {
            path: Some(path),
            entries,
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Writes the updated map first; the in-memory entries only change
    /// once the file holds them.
    pub async fn set(&mut self, key: &str, value: String) -> Result<()> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value);
        self.commit(next).await
    }

    pub async fn remove(&mut self, key: &str) -> Result<()> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        next.remove(key);
        self.commit(next).await
    }

    async fn commit(&mut self, next: BTreeMap<String, String>) -> Result<()> {
        if let Some(path) = &self.path {
            write_atomically(path, &next).await?;
        }
        self.entries = next;
        Ok(())
    }
}

async fn write_atomically(path: &Path, entries: &BTreeMap<String, String>) -> Result<()> {
    let body = serde_json::to_string_pretty(entries)?;
    let tmp = path.with_extension("tmp");
    if let Err(e) = fs::write(&tmp, body).await {
        tracing::error!("Cannot write local storage at {:?}: {}", tmp, e);
        return Err(e.into());
    }
    fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "study_vault_{}_{}_{}.json",
            name,
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ))
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let path = scratch_file("reopen");
        let mut storage = LocalStorage::open(&path).await.unwrap();
        storage.set("a", "1".to_string()).await.unwrap();
        storage.set("b", "2".to_string()).await.unwrap();
        storage.remove("a").await.unwrap();

        let reopened = LocalStorage::open(&path).await.unwrap();
        assert_eq!(reopened.get("a"), None);
        assert_eq!(reopened.get("b"), Some("2"));
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn failed_write_leaves_entries_untouched() {
        let dir = scratch_file("gone_dir");
        std::fs::create_dir_all(&dir).unwrap();
        let mut storage = LocalStorage::open(dir.join("vault.json")).await.unwrap();
        storage.set("kept", "1".to_string()).await.unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert!(storage.set("lost", "2".to_string()).await.is_err());
        assert_eq!(storage.get("lost"), None);

        assert!(storage.remove("kept").await.is_err());
        assert_eq!(storage.get("kept"), Some("1"));
    }

    #[tokio::test]
    async fn garbage_file_opens_empty() {
        let path = scratch_file("garbage");
        std::fs::write(&path, "{not json").unwrap();
        let storage = LocalStorage::open(&path).await.unwrap();
        assert_eq!(storage.get("anything"), None);
        let _ = std::fs::remove_file(&path);
    }
}
