// src/source/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::error::SourceError;

/// One raw markup document pulled from a source.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub name: String,
    pub markup: String,
}

/// Pull-based stream of raw documents.
///
/// Implementations yield documents in a stable order. A read failure is
/// reported per document so the caller can log it, skip the document, and
/// keep going.
pub trait DocumentSource {
    fn next_document(&mut self) -> Option<Result<RawDocument, SourceError>>;
}

/// Reads `.html` / `.htm` / `.xhtml` files from a directory in sorted name
/// order. Files are read lazily, one per `next_document` call, so a single
/// unreadable file surfaces as a per-document error rather than aborting
/// construction.
pub struct DirectorySource {
    paths: std::vec::IntoIter<PathBuf>,
}

impl DirectorySource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, SourceError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(SourceError::NotADirectory(dir.to_path_buf()));
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("html") | Some("htm") | Some("xhtml")
                )
            })
            .collect();
        paths.sort();

        tracing::debug!("Found {} markup files in {}", paths.len(), dir.display());

        Ok(Self {
            paths: paths.into_iter(),
        })
    }
}

impl DocumentSource for DirectorySource {
    fn next_document(&mut self) -> Option<Result<RawDocument, SourceError>> {
        let path = self.paths.next()?;
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string();

        Some(match fs::read_to_string(&path) {
            Ok(markup) => Ok(RawDocument { name, markup }),
            Err(source) => Err(SourceError::Read { path, source }),
        })
    }
}
