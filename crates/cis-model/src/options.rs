//! Configuration options for benchmark extraction.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Labeled sub-fields recognized inside a recommendation body.
///
/// Declaration order is recognizer priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    ProfileApplicability,
    Description,
    Rationale,
    Impact,
    Audit,
    Remediation,
    DefaultValue,
    References,
    AdditionalInformation,
    /// Recognized so it terminates the preceding field; its body is discarded.
    CisControls,
}

impl FieldName {
    /// All fields in priority order.
    pub const ALL: [Self; 10] = [
        Self::ProfileApplicability,
        Self::Description,
        Self::Rationale,
        Self::Impact,
        Self::Audit,
        Self::Remediation,
        Self::DefaultValue,
        Self::References,
        Self::AdditionalInformation,
        Self::CisControls,
    ];

    /// Label text as printed in benchmark documents.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ProfileApplicability => "Profile Applicability",
            Self::Description => "Description",
            Self::Rationale => "Rationale",
            Self::Impact => "Impact",
            Self::Audit => "Audit",
            Self::Remediation => "Remediation",
            Self::DefaultValue => "Default Value",
            Self::References => "References",
            Self::AdditionalInformation => "Additional Information",
            Self::CisControls => "CIS Controls",
        }
    }

    /// Default line-start recognizer for this label.
    #[must_use]
    pub const fn default_pattern(&self) -> &'static str {
        match self {
            Self::ProfileApplicability => r"^Profile Applicability\s*:?",
            Self::Description => r"^Description\s*:",
            Self::Rationale => r"^Rationale(?: Statement)?\s*:",
            Self::Impact => r"^Impact(?: Statement)?\s*:",
            Self::Audit => r"^Audit(?: Procedure)?\s*:",
            Self::Remediation => r"^Remediation(?: Procedure)?\s*:",
            Self::DefaultValue => r"^Default Value\s*:",
            Self::References => r"^References\s*:",
            Self::AdditionalInformation => r"^Additional Information\s*:",
            Self::CisControls => r"^CIS Controls\s*:",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Override of one field's recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelPattern {
    pub field: FieldName,
    /// Regular expression matched against the start of a line.
    pub pattern: String,
}

/// Default repetition count for running header/footer detection.
pub const DEFAULT_HEADER_REPEAT_THRESHOLD: usize = 3;

/// Default number of leading pages scanned for title and version.
pub const DEFAULT_METADATA_SCAN_PAGES: usize = 5;

/// Options controlling extraction behavior.
///
/// Each pipeline run owns its own copy; nothing here is global.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionOptions {
    /// Section number to section name overrides.
    pub section_names: BTreeMap<String, String>,

    /// Number of leading pages scanned for benchmark title and version.
    pub metadata_scan_pages: usize,

    /// Per-field recognizer overrides. Priority order stays [`FieldName::ALL`].
    pub label_patterns: Vec<LabelPattern>,

    /// Edge lines repeated on at least this many consecutive pages are stripped.
    /// Values below 2 disable stripping.
    pub header_repeat_threshold: usize,

    /// Take section titles from top-level headings found in the document.
    pub infer_section_names: bool,

    /// Treat marker-less, label-less headers as subsection headings when the
    /// document otherwise marks recommendations with an assessment status.
    pub skip_group_headings: bool,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            section_names: BTreeMap::new(),
            metadata_scan_pages: DEFAULT_METADATA_SCAN_PAGES,
            label_patterns: Vec::new(),
            header_repeat_threshold: DEFAULT_HEADER_REPEAT_THRESHOLD,
            infer_section_names: true,
            skip_group_headings: true,
        }
    }
}

impl ExtractionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_section_names(mut self, names: BTreeMap<String, String>) -> Self {
        self.section_names = names;
        self
    }

    #[must_use]
    pub fn with_metadata_scan_pages(mut self, pages: usize) -> Self {
        self.metadata_scan_pages = pages;
        self
    }

    #[must_use]
    pub fn with_label_pattern(mut self, field: FieldName, pattern: impl Into<String>) -> Self {
        self.label_patterns.retain(|entry| entry.field != field);
        self.label_patterns.push(LabelPattern {
            field,
            pattern: pattern.into(),
        });
        self
    }

    #[must_use]
    pub fn with_header_repeat_threshold(mut self, threshold: usize) -> Self {
        self.header_repeat_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_section_inference(mut self, enable: bool) -> Self {
        self.infer_section_names = enable;
        self
    }

    #[must_use]
    pub fn with_group_heading_detection(mut self, enable: bool) -> Self {
        self.skip_group_headings = enable;
        self
    }

    /// Effective pattern for a field: configured override or built-in default.
    #[must_use]
    pub fn pattern_for(&self, field: FieldName) -> &str {
        self.label_patterns
            .iter()
            .rev()
            .find(|entry| entry.field == field)
            .map_or_else(|| field.default_pattern(), |entry| entry.pattern.as_str())
    }
}
