use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;
use validator::ValidationErrors;
use crate::core::normalize::normalize_profile;
use crate::models::ProfileForm;

/// Errors that can occur with the profile store
#[derive(Debug, Error)]
pub enum ProfileStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid profile: {0}")]
    Validation(#[from] ValidationErrors),
}

/// A saved profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProfile {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub form: ProfileForm,
}

/// JSON-file profile store
///
/// The whole file is a list of `StoredProfile`. Writes are serialized by a
/// mutex and land through a temp file + rename.
pub struct ProfileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ProfileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// All saved profiles; a missing file is an empty store
    pub async fn load_all(&self) -> Result<Vec<StoredProfile>, ProfileStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Validate and append a profile
    pub async fn save(&self, form: ProfileForm) -> Result<StoredProfile, ProfileStoreError> {
        normalize_profile(&form)?;

        let _guard = self.write_lock.lock().await;

        let mut profiles = self.load_all().await?;
        let stored = StoredProfile {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            form,
        };
        profiles.push(stored.clone());

        self.write_all(&profiles).await?;

        tracing::info!(
            "Saved profile {} ({} total)",
            stored.id,
            profiles.len()
        );

        Ok(stored)
    }

    /// Most recently saved profile with this email, case-insensitive
    pub async fn find_by_email(&self, email: &str) -> Result<Option<StoredProfile>, ProfileStoreError> {
        let wanted = email.trim().to_lowercase();
        let profiles = self.load_all().await?;

        Ok(profiles.into_iter().rev().find(|p| {
            p.form
                .email
                .as_deref()
                .map(|e| e.trim().to_lowercase() == wanted)
                .unwrap_or(false)
        }))
    }

    async fn write_all(&self, profiles: &[StoredProfile]) -> Result<(), ProfileStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(profiles)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        Ok(())
    }
}
