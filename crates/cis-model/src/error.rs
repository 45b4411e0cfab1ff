use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::options::FieldName;

/// Fatal extraction errors. Any of these aborts the run before output is written.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Input cannot be decoded to text (encrypted, corrupt, not a PDF).
    #[error("unreadable PDF {path}: {reason}")]
    UnreadablePdf { path: PathBuf, reason: String },

    /// Decoded text is empty or whitespace-only.
    #[error("document contains no extractable text")]
    EmptyDocument,

    /// No recommendation listing could be located, or nothing survived extraction.
    #[error("no recommendations found in document")]
    RecommendationsNotFound,

    /// A configured label pattern is not a valid regular expression.
    #[error("invalid label pattern for {field} ({pattern}): {reason}")]
    InvalidLabelPattern {
        field: FieldName,
        pattern: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, ExtractError>;

/// Non-fatal, per-record problems. The record is dropped and the issue counted.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentIssue {
    /// Header carried no recognizable title.
    #[error("segment {control_number} (page {page}) has no title")]
    MissingTitle { control_number: String, page: usize },

    /// Control number does not match `digits(.digits)+`.
    #[error("invalid control number '{control_number}' (page {page})")]
    InvalidControlNumber { control_number: String, page: usize },

    /// Recommendation was filed under a section it does not belong to.
    #[error("recommendation {control_number} does not belong to section {section}")]
    SectionMismatch {
        control_number: String,
        section: String,
    },

    /// Control number was already extracted earlier in the document.
    #[error("duplicate recommendation {control_number} (page {page})")]
    Duplicate { control_number: String, page: usize },
}

impl SegmentIssue {
    #[must_use]
    pub fn control_number(&self) -> &str {
        match self {
            Self::MissingTitle { control_number, .. }
            | Self::InvalidControlNumber { control_number, .. }
            | Self::SectionMismatch { control_number, .. }
            | Self::Duplicate { control_number, .. } => control_number,
        }
    }

    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExtractError::UnreadablePdf {
            path: PathBuf::from("/tmp/bench.pdf"),
            reason: "encrypted".to_string(),
        };
        assert_eq!(err.to_string(), "unreadable PDF /tmp/bench.pdf: encrypted");
    }

    #[test]
    fn test_issue_control_number() {
        let issue = SegmentIssue::Duplicate {
            control_number: "1.2".to_string(),
            page: 40,
        };
        assert_eq!(issue.control_number(), "1.2");
        assert!(issue.is_duplicate());
        assert_eq!(issue.to_string(), "duplicate recommendation 1.2 (page 40)");
    }
}
