//! JSON artifact storage
//!
//! Per-entry `CombinedRecord` files keyed by slug, plus catalog file
//! reading and writing. Output is pretty-printed UTF-8 with non-ASCII
//! characters left unescaped.

#![allow(clippy::uninlined_format_args)]

use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

use crate::domain::catalog_record::CatalogDocument;
use crate::domain::combined_record::CombinedRecord;
use crate::domain::slug::Slug;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error on {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Output collaborator for combined records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Whether an artifact for `slug` is already present (the resume marker)
    async fn exists(&self, slug: &Slug) -> bool;

    async fn save(&self, slug: &Slug, record: &CombinedRecord) -> Result<PathBuf, StoreError>;
}

/// One `<slug>.json` per entry under a directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, slug: &Slug) -> PathBuf {
        self.dir.join(format!("{}.json", slug))
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn exists(&self, slug: &Slug) -> bool {
        fs::try_exists(self.path_for(slug)).await.unwrap_or(false)
    }

    async fn save(&self, slug: &Slug, record: &CombinedRecord) -> Result<PathBuf, StoreError> {
        let path = self.path_for(slug);
        write_pretty_json(&path, record).await?;
        Ok(path)
    }
}

/// Serialize `value` as indented JSON, creating parent directories
pub async fn write_pretty_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }
    }

    let content = serde_json::to_string_pretty(value).map_err(|e| StoreError::json(path, e))?;
    fs::write(path, content)
        .await
        .map_err(|e| StoreError::io(path, e))?;

    debug!("Wrote {:?}", path);
    Ok(())
}

pub async fn read_catalog(path: &Path) -> Result<CatalogDocument, StoreError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| StoreError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| StoreError::json(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog_record::CatalogRecord;
    use crate::domain::detail_record::DetailRecord;

    #[tokio::test]
    async fn test_save_marks_slug_present() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("detail"));
        let slug = Slug::from_url("https://pokebase.app/pokemon-go/pokemon/6").unwrap();

        assert!(!store.exists(&slug).await);

        let record = CombinedRecord::new(
            CatalogRecord::default(),
            DetailRecord {
                name: "Flabébé".to_string(),
                ..Default::default()
            },
        );
        let path = store.save(&slug, &record).await.unwrap();

        assert!(store.exists(&slug).await);
        assert_eq!(path.file_name().unwrap(), "6.json");

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Flabébé"));
        assert!(written.contains("\n  \"list_meta\""));
    }

    #[tokio::test]
    async fn test_read_catalog_accepts_legacy_image_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.json");
        std::fs::write(
            &path,
            r#"{"results":[{"name":"Pikachu","url":"https://pokebase.app/pokemon-go/pokemon/25","img":"/i/25.png"}]}"#,
        )
        .unwrap();

        let catalog = read_catalog(&path).await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.results[0].image.as_deref(), Some("/i/25.png"));
    }

    #[tokio::test]
    async fn test_read_missing_catalog_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_catalog(&dir.path().join("absent.json")).await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
