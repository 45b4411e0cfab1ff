//! Error types for page text ingestion.

use std::path::{Path, PathBuf};

use cis_model::ExtractError;
use thiserror::Error;

/// Errors that can occur while turning an input file into page texts.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Input file does not exist.
    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// PDF is encrypted and its content could not be decrypted.
    #[error("PDF is encrypted and could not be decrypted: {path}")]
    Encrypted { path: PathBuf },

    /// Content could not be decoded to text.
    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
}

impl IngestError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::FileNotFound { path }
            | Self::FileRead { path, .. }
            | Self::Encrypted { path }
            | Self::Decode { path, .. } => path,
        }
    }

    /// Short reason without the path, for the fatal error report.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::FileNotFound { .. } => "file not found".to_string(),
            Self::FileRead { source, .. } => source.to_string(),
            Self::Encrypted { .. } => "encrypted".to_string(),
            Self::Decode { message, .. } => message.clone(),
        }
    }
}

impl From<IngestError> for ExtractError {
    fn from(err: IngestError) -> Self {
        Self::UnreadablePdf {
            reason: err.reason(),
            path: err.path().to_path_buf(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/bench.pdf"),
        };
        assert_eq!(err.to_string(), "input file not found: /path/to/bench.pdf");
    }

    #[test]
    fn test_error_into_unreadable_pdf() {
        let err = IngestError::Encrypted {
            path: PathBuf::from("locked.pdf"),
        };
        let extract: ExtractError = err.into();
        match extract {
            ExtractError::UnreadablePdf { path, reason } => {
                assert_eq!(path, PathBuf::from("locked.pdf"));
                assert_eq!(reason, "encrypted");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
