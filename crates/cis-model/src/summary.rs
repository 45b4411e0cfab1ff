//! Extraction summary reported to the CLI layer.

use serde::{Deserialize, Serialize};

use crate::document::BenchmarkDocument;
use crate::error::SegmentIssue;

/// Counts describing one extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractionSummary {
    /// Pages received from the page source.
    pub total_pages: usize,
    /// Page (1-based) holding the first recommendation header.
    pub start_page: usize,
    /// Segments produced by the segmenter.
    pub segments: usize,
    /// Recommendations present in the assembled document.
    pub recommendations: usize,
    /// Segments dropped as malformed (duplicates excluded).
    pub skipped: usize,
    /// Repeated control numbers dropped in favor of the first copy.
    pub duplicates: usize,
    /// Subsection headings recognized and not emitted as recommendations.
    pub group_headings: usize,
    /// Recommendations with no description, rationale or audit text.
    pub low_confidence: usize,
    /// Labels recognized with an empty body.
    pub unresolved_fields: usize,
    /// Sections in the assembled document.
    pub sections: usize,
    /// Running header/footer lines stripped during normalization.
    pub header_lines_removed: usize,
    /// Hyphenated line breaks joined during normalization.
    pub hyphen_joins: usize,
    /// Per-record problems, in document order.
    pub issues: Vec<SegmentIssue>,
}

impl ExtractionSummary {
    /// True when at least one record was dropped or degraded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.skipped > 0 || self.low_confidence > 0 || self.unresolved_fields > 0
    }
}

/// Output of a successful extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub document: BenchmarkDocument,
    pub summary: ExtractionSummary,
}
