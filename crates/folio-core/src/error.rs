// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Folio.

use thiserror::Error;

/// Top-level error type for all Folio operations.
///
/// Layout itself never fails: unencodable characters, ragged tables and page
/// overflow are all recovered where they occur. What remains are the edges of
/// the pipeline, reading the source and writing the artifact.
#[derive(Debug, Error)]
pub enum FolioError {
    // -- Input --
    #[error("cannot read source document {path}: {source}")]
    SourceRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // -- Output --
    #[error("PDF generation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FolioError {
    /// Wrap an I/O failure that happened while reading the input document.
    pub fn source_read(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::SourceRead {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FolioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_read_names_the_path() {
        let err = FolioError::source_read(
            "docs/missing.md",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        let message = err.to_string();
        assert!(message.contains("docs/missing.md"), "got: {message}");
        assert!(message.contains("no such file"), "got: {message}");
    }

    #[test]
    fn io_errors_convert() {
        let err: FolioError = std::io::Error::other("disk full").into();
        assert!(matches!(err, FolioError::Io(_)));
    }
}
