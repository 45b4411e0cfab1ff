//! Field label recognizers.
//!
//! A [`LabelSet`] is an ordered list of `(FieldName, recognizer)` pairs. The
//! first recognizer in priority order that accepts a line wins.

use std::fmt;

use cis_model::{ExtractError, ExtractionOptions, FieldName, Result};
use regex::Regex;

/// Decides whether a line opens a labeled field.
pub trait FieldRecognizer: Send + Sync + fmt::Debug {
    /// Byte offset where the field body starts when `line` opens the field.
    fn recognize(&self, line: &str) -> Option<usize>;
}

/// Recognizer backed by a regular expression that must match at line start.
#[derive(Debug, Clone)]
pub struct RegexRecognizer {
    regex: Regex,
}

impl RegexRecognizer {
    pub fn new(pattern: &str) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }
}

impl FieldRecognizer for RegexRecognizer {
    fn recognize(&self, line: &str) -> Option<usize> {
        self.regex
            .find(line)
            .filter(|found| found.start() == 0)
            .map(|found| found.end())
    }
}

/// A recognized label on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelMatch {
    pub field: FieldName,
    /// Byte offset of the field body within the line.
    pub body_start: usize,
}

/// Ordered label recognizers.
#[derive(Debug)]
pub struct LabelSet {
    entries: Vec<(FieldName, Box<dyn FieldRecognizer>)>,
}

impl LabelSet {
    /// Build the recognizers for every field, honoring configured overrides.
    pub fn from_options(options: &ExtractionOptions) -> Result<Self> {
        let mut entries: Vec<(FieldName, Box<dyn FieldRecognizer>)> =
            Vec::with_capacity(FieldName::ALL.len());
        for field in FieldName::ALL {
            let pattern = options.pattern_for(field);
            let recognizer =
                RegexRecognizer::new(pattern).map_err(|e| ExtractError::InvalidLabelPattern {
                    field,
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                })?;
            entries.push((field, Box::new(recognizer)));
        }
        Ok(Self { entries })
    }

    /// Built-in recognizers only.
    pub fn builtin() -> Self {
        Self::from_options(&ExtractionOptions::default()).expect("built-in label patterns compile")
    }

    /// Replace the recognizer for one field, keeping its priority slot.
    #[must_use]
    pub fn with_recognizer(mut self, field: FieldName, recognizer: Box<dyn FieldRecognizer>) -> Self {
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| *name == field) {
            entry.1 = recognizer;
        } else {
            self.entries.push((field, recognizer));
        }
        self
    }

    /// First label in priority order that opens `line`.
    #[must_use]
    pub fn match_line(&self, line: &str) -> Option<LabelMatch> {
        self.entries.iter().find_map(|(field, recognizer)| {
            recognizer.recognize(line).map(|body_start| LabelMatch {
                field: *field,
                body_start,
            })
        })
    }

    /// True when `line` opens any labeled field.
    #[must_use]
    pub fn is_label_line(&self, line: &str) -> bool {
        self.match_line(line).is_some()
    }

    /// Fields in priority order.
    pub fn fields(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.entries.iter().map(|(field, _)| *field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_labels_match_at_line_start() {
        let labels = LabelSet::builtin();
        let found = labels.match_line("Rationale: bar").expect("rationale");
        assert_eq!(found.field, FieldName::Rationale);
        assert_eq!(&"Rationale: bar"[found.body_start..], " bar");

        assert_eq!(
            labels.match_line("Default Value:").map(|m| m.field),
            Some(FieldName::DefaultValue)
        );
        assert!(labels.match_line("The Rationale: is inline").is_none());
        assert!(labels.match_line("Auditing is enabled").is_none());
    }

    #[test]
    fn unanchored_override_still_requires_line_start() {
        let options = ExtractionOptions::default().with_label_pattern(FieldName::Impact, "Effect:");
        let labels = LabelSet::from_options(&options).expect("labels");
        assert_eq!(
            labels.match_line("Effect: none").map(|m| m.field),
            Some(FieldName::Impact)
        );
        assert!(labels.match_line("Side Effect: none").is_none());
        assert!(labels.match_line("Impact: none").is_none());
    }

    #[test]
    fn invalid_override_is_reported() {
        let options = ExtractionOptions::default().with_label_pattern(FieldName::Audit, "^Audit(");
        let err = LabelSet::from_options(&options).expect_err("invalid pattern");
        assert!(matches!(
            err,
            ExtractError::InvalidLabelPattern {
                field: FieldName::Audit,
                ..
            }
        ));
    }

    #[test]
    fn priority_order_decides_overlapping_labels() {
        let options = ExtractionOptions::default()
            .with_label_pattern(FieldName::Description, r"^(?:Description|Summary)\s*:")
            .with_label_pattern(FieldName::Rationale, r"^(?:Rationale|Summary)\s*:");
        let labels = LabelSet::from_options(&options).expect("labels");
        assert_eq!(
            labels.match_line("Summary: text").map(|m| m.field),
            Some(FieldName::Description)
        );
    }
}
