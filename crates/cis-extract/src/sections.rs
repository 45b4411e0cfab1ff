//! Grouping recommendations into named sections.

use std::collections::BTreeMap;

use cis_model::{Recommendation, Section};

use crate::normalize::NormalizedText;
use crate::patterns::{is_control_header, split_section_heading};

/// Section names used when neither configuration nor the document names one.
pub const BUILTIN_SECTION_NAMES: [(&str, &str); 9] = [
    ("1", "Initial Setup"),
    ("2", "System Configuration"),
    ("3", "Network & Services"),
    ("4", "Security Profiles"),
    ("5", "Access Control"),
    ("6", "Authentication"),
    ("7", "Logging & Monitoring"),
    ("8", "System Maintenance"),
    ("9", "Additional Hardening"),
];

const MAX_INFERRED_TITLE_LEN: usize = 80;
const MAX_INFERRED_TITLE_WORDS: usize = 10;

/// Section name lookup.
///
/// Precedence: configured override, then a heading found in the document,
/// then the built-in table, then `Section N`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionNames {
    overrides: BTreeMap<String, String>,
    inferred: BTreeMap<String, String>,
}

impl SectionNames {
    #[must_use]
    pub fn new(overrides: BTreeMap<String, String>) -> Self {
        Self {
            overrides,
            inferred: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_inferred(mut self, inferred: BTreeMap<String, String>) -> Self {
        self.inferred = inferred;
        self
    }

    #[must_use]
    pub fn resolve(&self, number: &str) -> String {
        self.overrides
            .get(number)
            .or_else(|| self.inferred.get(number))
            .cloned()
            .or_else(|| builtin_section_name(number).map(str::to_string))
            .unwrap_or_else(|| format!("Section {number}"))
    }
}

#[must_use]
pub fn builtin_section_name(number: &str) -> Option<&'static str> {
    BUILTIN_SECTION_NAMES
        .iter()
        .find(|(key, _)| *key == number)
        .map(|(_, name)| *name)
}

/// Collect top-level headings (`1 Initial Setup`) from the document.
///
/// The first plausible heading for each number wins, so contents entries
/// name sections as well as the headings in the body.
pub fn infer_section_names(text: &NormalizedText) -> BTreeMap<String, String> {
    let mut names = BTreeMap::new();
    for line in text.lines() {
        if is_control_header(line.text) || line.text.ends_with('.') {
            continue;
        }
        let Some((number, title)) = split_section_heading(line.text) else {
            continue;
        };
        if is_plausible_title(title) {
            names
                .entry(number.to_string())
                .or_insert_with(|| title.to_string());
        }
    }
    names
}

fn is_plausible_title(title: &str) -> bool {
    let len = title.chars().count();
    (2..=MAX_INFERRED_TITLE_LEN).contains(&len)
        && title.split_whitespace().count() <= MAX_INFERRED_TITLE_WORDS
}

/// Group recommendations by leading control-number component.
///
/// Sections appear in order of first appearance; recommendations keep
/// document order within each section.
pub fn organize(recommendations: Vec<Recommendation>, names: &SectionNames) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut index: BTreeMap<String, usize> = BTreeMap::new();
    for rec in recommendations {
        let number = rec.section_number().to_string();
        let slot = *index.entry(number.clone()).or_insert_with(|| {
            sections.push(Section {
                name: names.resolve(&number),
                number: number.clone(),
                recommendations: Vec::new(),
            });
            sections.len() - 1
        });
        sections[slot].recommendations.push(rec);
    }
    sections
}
