use chrono::{DateTime, Utc};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use crate::core::normalize::{normalize_records, normalize_values, NormalizedCatalog};
use crate::models::ScholarshipRecord;

/// Errors that can occur when loading the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid catalog format: {0}")]
    InvalidFormat(String),
}

/// Immutable view of the catalog handed to one match request
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub catalog: NormalizedCatalog,
    pub loaded_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn new(catalog: NormalizedCatalog) -> Self {
        Self {
            catalog,
            loaded_at: Utc::now(),
        }
    }
}

/// File-backed scholarship catalog
///
/// Holds the current snapshot behind an `Arc`. Readers clone the `Arc` and
/// keep a consistent view for the whole request; `reload` swaps in a new one.
pub struct CatalogStore {
    path: Option<PathBuf>,
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl CatalogStore {
    /// Open the catalog file and load the first snapshot
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref().to_path_buf();
        let catalog = load_catalog(&path).await?;

        Ok(Self {
            path: Some(path),
            current: RwLock::new(Arc::new(CatalogSnapshot::new(catalog))),
        })
    }

    /// Catalog that lives only in memory; `reload` keeps it as is
    pub fn in_memory(records: &[ScholarshipRecord]) -> Self {
        Self {
            path: None,
            current: RwLock::new(Arc::new(CatalogSnapshot::new(normalize_records(records)))),
        }
    }

    pub async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.current.read().await.clone()
    }

    /// Re-read the catalog file
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn reload(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        let Some(path) = &self.path else {
            return Ok(self.snapshot().await);
        };

        let snapshot = Arc::new(CatalogSnapshot::new(load_catalog(path).await?));
        *self.current.write().await = snapshot.clone();

        tracing::info!(
            "Catalog reloaded: {} scholarships, {} skipped records",
            snapshot.catalog.len(),
            snapshot.catalog.warnings.len()
        );

        Ok(snapshot)
    }
}

/// Load and normalize a catalog file
///
/// A missing file is an empty catalog. Malformed records become warnings;
/// only an unreadable file or a non-list document is an error.
pub async fn load_catalog(path: &Path) -> Result<NormalizedCatalog, CatalogError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("Catalog file {:?} not found, starting with an empty catalog", path);
            return Ok(NormalizedCatalog::default());
        }
        Err(source) => {
            return Err(CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let catalog = parse_catalog(&content)?;

    tracing::info!(
        "Loaded {} scholarships from {:?} ({} skipped)",
        catalog.len(),
        path,
        catalog.warnings.len()
    );

    Ok(catalog)
}

/// Parse catalog JSON: a list of records, or `{"scholarships": [...]}`
pub fn parse_catalog(content: &str) -> Result<NormalizedCatalog, CatalogError> {
    let document: Value = serde_json::from_str(content)?;

    let records = match document {
        Value::Array(records) => records,
        Value::Object(mut map) => match map.remove("scholarships") {
            Some(Value::Array(records)) => records,
            _ => {
                return Err(CatalogError::InvalidFormat(
                    "expected a `scholarships` list".to_string(),
                ))
            }
        },
        _ => {
            return Err(CatalogError::InvalidFormat(
                "expected a list of scholarship records".to_string(),
            ))
        }
    };

    Ok(normalize_values(records))
}
