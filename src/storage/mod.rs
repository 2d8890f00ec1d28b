// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::corpus::CorpusEntry;
use crate::utils::error::StorageError;

/// JSON cache of the corpus export. A run that finds an existing cache loads
/// it instead of re-parsing the whole corpus.
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Loads a previously saved export, or `None` when no cache file exists.
    pub fn load(&self) -> Result<Option<Vec<CorpusEntry>>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path).map_err(StorageError::Io)?;
        let entries: Vec<CorpusEntry> = serde_json::from_str(&raw)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        tracing::info!(
            "Loaded {} cached corpus entries from {}",
            entries.len(),
            self.path.display()
        );
        Ok(Some(entries))
    }

    /// Saves the export as pretty-printed JSON, plus a sidecar metadata file
    /// recording counts and the save timestamp.
    pub fn save(
        &self,
        entries: &[CorpusEntry],
        documents_processed: usize,
    ) -> Result<PathBuf, StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(StorageError::Io)?;
            }
        }

        let serialized = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&self.path, serialized).map_err(StorageError::Io)?;

        let metadata = serde_json::json!({
            "entry_count": entries.len(),
            "documents_processed": documents_processed,
            "saved_at": chrono::Utc::now().to_rfc3339(),
        });
        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(self.metadata_path(), metadata_str).map_err(StorageError::Io)?;

        tracing::info!(
            "Saved {} corpus entries to {}",
            entries.len(),
            self.path.display()
        );

        Ok(self.path.clone())
    }

    fn metadata_path(&self) -> PathBuf {
        self.path.with_extension("meta.json")
    }
}
