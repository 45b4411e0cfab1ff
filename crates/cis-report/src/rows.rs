//! Sheet layout: names, headers and cell text for each row.
//!
//! Everything here is pure so the workbook writer only deals with styling.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use cis_model::{BenchmarkDocument, Recommendation, Section};

pub const INDEX_SHEET_NAME: &str = "INDEX";

pub const INDEX_HEADERS: [&str; 4] = ["Section", "Section Name", "Control Count", "Tab Reference"];

pub const INDEX_COLUMN_WIDTHS: [f64; 4] = [10.0, 32.0, 14.0, 32.0];

pub const SECTION_HEADERS: [&str; 8] = [
    "#",
    "Control Title",
    "Level",
    "Description & Impact",
    "Audit Steps",
    "Remediation",
    "Default Value",
    "References/Status",
];

pub const SECTION_COLUMN_WIDTHS: [f64; 8] = [8.0, 42.0, 10.0, 55.0, 60.0, 55.0, 35.0, 40.0];

/// Longest text Excel stores in one cell.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Longest worksheet name Excel accepts.
pub const MAX_SHEET_NAME_CHARS: usize = 31;

const LINE_HEIGHT: f64 = 14.0;
const MIN_ROW_HEIGHT: f64 = 80.0;
const MAX_ROW_HEIGHT: f64 = 350.0;

/// One row of the index sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub section: String,
    pub name: String,
    pub control_count: usize,
    /// Worksheet holding the section's controls.
    pub sheet: String,
}

/// Cell text for one recommendation row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistRow {
    pub number: String,
    pub title: String,
    pub level: String,
    pub description_impact: String,
    pub audit_steps: String,
    pub remediation: String,
    pub default_value: String,
    pub references_status: String,
}

impl ChecklistRow {
    /// Cells in column order.
    #[must_use]
    pub fn cells(&self) -> [&str; 8] {
        [
            &self.number,
            &self.title,
            &self.level,
            &self.description_impact,
            &self.audit_steps,
            &self.remediation,
            &self.default_value,
            &self.references_status,
        ]
    }

    /// Row height in points, from the tallest wrapped cell.
    #[must_use]
    pub fn height(&self) -> f64 {
        let lines = self
            .cells()
            .iter()
            .zip(SECTION_COLUMN_WIDTHS)
            .map(|(text, width)| wrapped_lines(text, width))
            .max()
            .unwrap_or(1);
        (lines as f64 * LINE_HEIGHT).clamp(MIN_ROW_HEIGHT, MAX_ROW_HEIGHT)
    }
}

/// Build the cell text for a recommendation.
#[must_use]
pub fn checklist_row(rec: &Recommendation) -> ChecklistRow {
    ChecklistRow {
        number: rec.control_number.clone(),
        title: rec.title.clone(),
        level: rec.level.label().to_string(),
        description_impact: truncate_cell(&description_impact(rec)),
        audit_steps: truncate_cell(&audit_steps(rec)),
        remediation: truncate_cell(&rec.remediation),
        default_value: truncate_cell(&rec.default_value),
        references_status: truncate_cell(&references_status(rec)),
    }
}

/// Description followed by labeled rationale and impact blocks.
#[must_use]
pub fn description_impact(rec: &Recommendation) -> String {
    let mut blocks: Vec<String> = Vec::new();
    if !rec.description.is_empty() {
        blocks.push(rec.description.clone());
    }
    if !rec.rationale.is_empty() {
        blocks.push(format!("RATIONALE:\n{}", rec.rationale));
    }
    if !rec.impact.is_empty() {
        blocks.push(format!("IMPACT:\n{}", rec.impact));
    }
    blocks.join("\n\n")
}

/// Audit text, labeled by style when both styles are present.
#[must_use]
pub fn audit_steps(rec: &Recommendation) -> String {
    match (rec.audit_cli.is_empty(), rec.audit_gui.is_empty()) {
        (false, false) => format!("CLI:\n{}\n\nGUI:\n{}", rec.audit_cli, rec.audit_gui),
        (false, true) => rec.audit_cli.clone(),
        (true, false) => rec.audit_gui.clone(),
        (true, true) => String::new(),
    }
}

/// References one per line, then the auditor's status.
#[must_use]
pub fn references_status(rec: &Recommendation) -> String {
    let references = rec.references.join("\n");
    match (references.is_empty(), rec.status.is_empty()) {
        (_, true) => references,
        (true, false) => rec.status.clone(),
        (false, false) => format!("{references}\n\n{}", rec.status),
    }
}

/// Cut text to Excel's cell limit on a character boundary.
#[must_use]
pub fn truncate_cell(text: &str) -> String {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}

fn wrapped_lines(text: &str, width: f64) -> usize {
    let per_line = width.max(1.0) as usize;
    text.lines()
        .map(|line| line.chars().count().div_ceil(per_line).max(1))
        .sum::<usize>()
        .max(1)
}

/// Worksheet names for each section, in section order.
///
/// Names are `"{number}. {name}"` with characters Excel rejects removed, cut
/// to 31 characters and made unique ignoring case.
#[must_use]
pub fn section_sheet_names(sections: &[Section]) -> Vec<String> {
    let mut taken: BTreeSet<String> = BTreeSet::from([INDEX_SHEET_NAME.to_lowercase()]);
    sections
        .iter()
        .map(|section| {
            let base = sanitize_sheet_name(&format!("{}. {}", section.number, section.name));
            let name = unique_sheet_name(&base, &taken);
            taken.insert(name.to_lowercase());
            name
        })
        .collect()
}

/// Remove characters Excel does not allow in sheet names.
#[must_use]
pub fn sanitize_sheet_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .collect();
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = cleaned.trim_matches('\'');
    let name: String = trimmed.chars().take(MAX_SHEET_NAME_CHARS).collect();
    let name = name.trim_end().trim_end_matches('\'').to_string();
    if name.is_empty() {
        "Section".to_string()
    } else {
        name
    }
}

fn unique_sheet_name(base: &str, taken: &BTreeSet<String>) -> String {
    if !taken.contains(&base.to_lowercase()) {
        return base.to_string();
    }
    (2..)
        .map(|n| {
            let suffix = format!(" ({n})");
            let keep = MAX_SHEET_NAME_CHARS - suffix.chars().count();
            let stem: String = base.chars().take(keep).collect();
            format!("{}{suffix}", stem.trim_end())
        })
        .find(|candidate| !taken.contains(&candidate.to_lowercase()))
        .unwrap_or_else(|| base.to_string())
}

/// Index rows paired with the section sheet names.
#[must_use]
pub fn index_rows(document: &BenchmarkDocument, sheet_names: &[String]) -> Vec<IndexRow> {
    document
        .sections
        .iter()
        .zip(sheet_names)
        .map(|(section, sheet)| IndexRow {
            section: section.number.clone(),
            name: section.name.clone(),
            control_count: section.recommendations.len(),
            sheet: sheet.clone(),
        })
        .collect()
}

/// Internal hyperlink target for a worksheet.
#[must_use]
pub fn sheet_link(sheet: &str) -> String {
    format!("internal:'{}'!A1", sheet.replace('\'', "''"))
}

#[must_use]
pub fn index_subtitle(date: NaiveDate) -> String {
    format!("Audit Checklist - Generated on {}", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use cis_model::Level;

    use super::*;

    fn section(number: &str, name: &str) -> Section {
        Section {
            number: number.to_string(),
            name: name.to_string(),
            recommendations: Vec::new(),
        }
    }

    #[test]
    fn row_cells_in_column_order() {
        let mut rec = Recommendation::new("1.1", "Ensure X");
        rec.level = Level::Level1;
        rec.description = "foo".to_string();
        rec.audit_cli = "# check".to_string();
        rec.remediation = "fix".to_string();
        rec.default_value = "off".to_string();
        rec.references = vec!["https://a".to_string()];

        let row = checklist_row(&rec);
        insta::assert_snapshot!(
            row.cells().join(" | "),
            @"1.1 | Ensure X | Level 1 | foo | # check | fix | off | https://a"
        );
    }

    #[test]
    fn description_joins_rationale_and_impact() {
        let mut rec = Recommendation::new("1.1", "Ensure X");
        rec.description = "foo".to_string();
        rec.impact = "none".to_string();
        assert_eq!(description_impact(&rec), "foo\n\nIMPACT:\nnone");

        rec.rationale = "bar".to_string();
        assert_eq!(
            description_impact(&rec),
            "foo\n\nRATIONALE:\nbar\n\nIMPACT:\nnone"
        );
    }

    #[test]
    fn audit_labels_both_styles() {
        let mut rec = Recommendation::new("1.1", "Ensure X");
        rec.audit_gui = "open settings".to_string();
        assert_eq!(audit_steps(&rec), "open settings");
        rec.audit_cli = "# grep x".to_string();
        assert_eq!(audit_steps(&rec), "CLI:\n# grep x\n\nGUI:\nopen settings");
    }

    #[test]
    fn sheet_names_are_valid_and_unique() {
        let names = section_sheet_names(&[
            section("1", "Network: Services / Daemons [legacy]"),
            section("2", "A very long section name that keeps going and going"),
            section("2", "A very long section name that keeps going and going"),
            section("3", "INDEX"),
        ]);
        assert_eq!(names[0], "1. Network Services Daemons leg");
        assert_eq!(names[1].chars().count(), 31);
        assert_ne!(names[1], names[2]);
        assert!(names[2].ends_with(" (2)"));
        assert!(names[2].chars().count() <= 31);
        assert_eq!(names[3], "3. INDEX");
    }

    #[test]
    fn bare_index_name_is_deduplicated() {
        let base = sanitize_sheet_name("index");
        let taken = BTreeSet::from([INDEX_SHEET_NAME.to_lowercase()]);
        assert_eq!(unique_sheet_name(&base, &taken), "index (2)");
    }

    #[test]
    fn long_cells_are_truncated() {
        let text = "é".repeat(MAX_CELL_CHARS + 10);
        assert_eq!(truncate_cell(&text).chars().count(), MAX_CELL_CHARS);
        assert_eq!(truncate_cell("short"), "short");
    }

    #[test]
    fn row_height_is_clamped() {
        let short = checklist_row(&Recommendation::new("1.1", "Ensure X"));
        assert!((short.height() - MIN_ROW_HEIGHT).abs() < f64::EPSILON);

        let mut rec = Recommendation::new("1.1", "Ensure X");
        rec.remediation = "step\n".repeat(100);
        assert!((checklist_row(&rec).height() - MAX_ROW_HEIGHT).abs() < f64::EPSILON);
    }

    #[test]
    fn links_quote_sheet_names() {
        assert_eq!(sheet_link("1. Initial Setup"), "internal:'1. Initial Setup'!A1");
        assert_eq!(sheet_link("2. Admin's"), "internal:'2. Admin''s'!A1");
    }

    #[test]
    fn subtitle_has_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(index_subtitle(date), "Audit Checklist - Generated on 2024-03-09");
    }
}
