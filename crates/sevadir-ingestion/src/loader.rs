//! Document loader.
//!
//! Reads saved listing pages from disk. The source site serves
//! windows-1252, so pages are decoded with that encoding; undecodable
//! bytes are replaced rather than failing the page.

use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1252;
use tracing::{info, warn};

/// One loaded document, ready for extraction.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub path: PathBuf,
    pub text: String,
}

/// Read and decode a single document.
///
/// Returns `None` when the file is missing or unreadable — a bad page
/// is reported and skipped, never fatal to the run.
pub fn load_document(path: &Path) -> Option<LoadedDocument> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Document not found, skipping");
            return None;
        }
    };

    let (text, _, had_errors) = WINDOWS_1252.decode(&bytes);
    if had_errors {
        warn!(path = %path.display(), "Document contained undecodable bytes, replaced");
    }
    info!(path = %path.display(), bytes = bytes.len(), "Document loaded");

    Some(LoadedDocument {
        path: path.to_path_buf(),
        text: text.into_owned(),
    })
}
