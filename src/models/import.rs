//! CSV import request and response payloads.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A CSV file selected for import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvUpload {
    /// File name sent in the multipart part.
    pub file_name: String,
    /// Raw file contents. The server decodes them itself.
    pub bytes: Vec<u8>,
}

impl CsvUpload {
    /// Wraps in-memory contents.
    #[inline]
    #[must_use]
    pub fn new<T: Into<String>>(file_name: T, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Reads a file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::FinanzasError::Io`] if the file cannot be read.
    #[inline]
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map_or_else(|| "import.csv".to_owned(), |name| name.to_string_lossy().into_owned());
        Ok(Self { file_name, bytes })
    }
}

/// Body of a successful import response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSuccess {
    /// Human-readable summary, e.g. `Se importaron 12 movimientos con éxito`.
    pub mensaje: String,
}

/// Body of a failed request (`{"error": ...}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Server-supplied message.
    pub error: String,
}
