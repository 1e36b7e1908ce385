//! JSON-file-backed recipient registry

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::RecipientRegistry;
use crate::application::errors::RegistryError;
use crate::domain::Registration;

/// On-disk document shape: `{"users": {"<chat_id>": {...}}}`.
///
/// Chat ids are stored as string keys so the file stays a plain JSON
/// object readable by external tooling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RegistryDocument {
    #[serde(default)]
    users: BTreeMap<String, StoredRegistration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRegistration {
    username: Option<String>,
    activated_at: String,
}

/// Registry persisted to a single JSON file.
///
/// Writes go through a temp file and rename so a crash mid-write never
/// leaves a truncated registry, and a Mutex serializes read-modify-write
/// cycles against concurrent command handlers.
pub struct FileRegistry {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileRegistry {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    async fn load_document(&self) -> RegistryDocument {
        match fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "registry file unreadable, starting empty");
                    RegistryDocument::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => RegistryDocument::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "registry file unreadable, starting empty");
                RegistryDocument::default()
            }
        }
    }

    async fn store_document(&self, document: &RegistryDocument) -> Result<(), RegistryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let bytes = serde_json::to_vec_pretty(document)?;
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &bytes).await?;
        fs::rename(&temp_path, &self.path).await?;
        debug!(path = %self.path.display(), users = document.users.len(), "registry persisted");
        Ok(())
    }
}

#[async_trait]
impl RecipientRegistry for FileRegistry {
    async fn is_registered(&self, chat_id: i64) -> Result<bool, RegistryError> {
        let document = self.load_document().await;
        Ok(document.users.contains_key(&chat_id.to_string()))
    }

    async fn register(&self, chat_id: i64, username: Option<&str>) -> Result<bool, RegistryError> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.load_document().await;
        let key = chat_id.to_string();
        if document.users.contains_key(&key) {
            return Ok(false);
        }

        document.users.insert(
            key,
            StoredRegistration {
                username: username.map(str::to_string),
                activated_at: Utc::now().to_rfc3339(),
            },
        );
        self.store_document(&document).await?;
        Ok(true)
    }

    async fn all_ids(&self) -> Result<Vec<i64>, RegistryError> {
        let document = self.load_document().await;
        Ok(document
            .users
            .keys()
            .filter_map(|key| key.parse().ok())
            .collect())
    }

    async fn get(&self, chat_id: i64) -> Result<Option<Registration>, RegistryError> {
        let document = self.load_document().await;
        Ok(document
            .users
            .get(&chat_id.to_string())
            .map(|stored| Registration {
                chat_id,
                username: stored.username.clone(),
                activated_at: stored.activated_at.clone(),
            }))
    }
}
