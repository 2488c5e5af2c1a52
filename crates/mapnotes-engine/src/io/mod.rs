use std::fs;
use std::path::{Path, PathBuf};

use crate::editing::{Document, DocumentError};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid document {path}: {source}")]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },
}

/// Read a markdown file and return its content
pub fn read_document(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Load a file straight into an editable [`Document`].
pub fn open_document(path: &Path) -> Result<Document, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    let doc = Document::from_bytes(&bytes).map_err(|source| IoError::InvalidDocument {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "opened {} ({} bytes, {} outline nodes)",
        path.display(),
        bytes.len(),
        doc.outline().len()
    );
    Ok(doc)
}
