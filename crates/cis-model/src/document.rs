//! Benchmark document model.
//!
//! All records are plain values built once by the extraction pipeline and only
//! read afterwards by the workbook and JSON writers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// CIS scoring tier of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Baseline hardening.
    Level1,
    /// Stricter hardening that may reduce functionality.
    Level2,
    /// No level marker was found.
    #[default]
    Unknown,
}

impl Level {
    /// Get a human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Level1 => "Level 1",
            Self::Level2 => "Level 2",
            Self::Unknown => "Unknown",
        }
    }

    /// Map a numeric tier ("1", "2") to a level.
    #[must_use]
    pub fn from_tier(tier: &str) -> Self {
        match tier.trim() {
            "1" => Self::Level1,
            "2" => Self::Level2,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Assessment status printed after a recommendation title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assessment {
    Automated,
    Manual,
    Scored,
    NotScored,
    #[default]
    Unspecified,
}

impl Assessment {
    /// Parse the text inside an assessment marker, e.g. `Not Scored`.
    #[must_use]
    pub fn from_marker(marker: &str) -> Self {
        let normalized = marker.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_ascii_lowercase().as_str() {
            "automated" => Self::Automated,
            "manual" => Self::Manual,
            "scored" => Self::Scored,
            "not scored" => Self::NotScored,
            _ => Self::Unspecified,
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Automated => "Automated",
            Self::Manual => "Manual",
            Self::Scored => "Scored",
            Self::NotScored => "Not Scored",
            Self::Unspecified => "",
        }
    }
}

/// One auditable benchmark control.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Recommendation {
    /// Hierarchical number such as `1.2.3`.
    pub control_number: String,
    pub title: String,
    pub level: Level,
    pub assessment: Assessment,
    pub description: String,
    pub rationale: String,
    pub impact: String,
    pub audit_cli: String,
    pub audit_gui: String,
    pub remediation: String,
    pub default_value: String,
    pub references: Vec<String>,
    pub additional_information: String,
    /// Reserved for the auditor; always empty at extraction time.
    pub status: String,
}

impl Recommendation {
    /// Create a title-only recommendation with every optional field empty.
    pub fn new(control_number: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            control_number: control_number.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Leading numeric component of the control number (`"1"` for `1.2.3`).
    #[must_use]
    pub fn section_number(&self) -> &str {
        section_number_of(&self.control_number)
    }

    /// True when at least one audit style was extracted.
    #[must_use]
    pub fn has_audit(&self) -> bool {
        !self.audit_cli.is_empty() || !self.audit_gui.is_empty()
    }

    /// True when no description-like content was found for this record.
    #[must_use]
    pub fn is_low_confidence(&self) -> bool {
        self.description.is_empty() && self.rationale.is_empty() && !self.has_audit()
    }

    /// Number of populated optional text fields.
    #[must_use]
    pub fn populated_fields(&self) -> usize {
        [
            &self.description,
            &self.rationale,
            &self.impact,
            &self.audit_cli,
            &self.audit_gui,
            &self.remediation,
            &self.default_value,
            &self.additional_information,
        ]
        .iter()
        .filter(|value| !value.is_empty())
        .count()
            + usize::from(!self.references.is_empty())
    }
}

/// Top-level grouping of recommendations sharing a leading number.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Section {
    pub number: String,
    pub name: String,
    /// Recommendations in document order.
    pub recommendations: Vec<Recommendation>,
}

impl Section {
    /// Count recommendations at the given level.
    #[must_use]
    pub fn count_by_level(&self, level: Level) -> usize {
        self.recommendations
            .iter()
            .filter(|rec| rec.level == level)
            .count()
    }

    /// Check that a control number belongs to this section.
    #[must_use]
    pub fn contains_control(&self, control_number: &str) -> bool {
        control_number
            .strip_prefix(self.number.as_str())
            .is_some_and(|rest| rest.starts_with('.'))
    }
}

/// Root of the extracted checklist.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BenchmarkDocument {
    /// Best-effort benchmark title; empty when undetected.
    pub title: String,
    /// Best-effort version token such as `v2.0.0`; empty when undetected.
    pub version: String,
    /// Sections in order of first appearance.
    pub sections: Vec<Section>,
}

impl BenchmarkDocument {
    /// Total number of recommendations across all sections.
    #[must_use]
    pub fn recommendation_count(&self) -> usize {
        self.sections
            .iter()
            .map(|section| section.recommendations.len())
            .sum()
    }

    /// Iterate over every recommendation in document order.
    pub fn recommendations(&self) -> impl Iterator<Item = &Recommendation> {
        self.sections
            .iter()
            .flat_map(|section| section.recommendations.iter())
    }

    /// Title and version joined for display, e.g. `CIS Ubuntu Linux Benchmark v2.0.0`.
    #[must_use]
    pub fn display_title(&self) -> String {
        match (self.title.is_empty(), self.version.is_empty()) {
            (false, false) => format!("{} {}", self.title, self.version),
            (false, true) => self.title.clone(),
            (true, false) => format!("CIS Benchmark {}", self.version),
            (true, true) => "CIS Benchmark".to_string(),
        }
    }
}

/// Text before the first `.` of a control number.
#[must_use]
pub fn section_number_of(control_number: &str) -> &str {
    control_number
        .split_once('.')
        .map_or(control_number, |(head, _)| head)
}

/// Check that a control number has the shape `digits(.digits)+`.
#[must_use]
pub fn is_valid_control_number(control_number: &str) -> bool {
    let mut parts = 0usize;
    for part in control_number.split('.') {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        parts += 1;
    }
    parts >= 2
}
