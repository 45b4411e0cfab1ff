//! Field extraction for one recommendation segment.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use cis_model::{FieldName, Level, Recommendation, SegmentIssue};
use regex::Regex;
use tracing::debug;

use crate::heading::parse_heading;
use crate::labels::LabelSet;
use crate::patterns::{LEVEL_MENTION, LIST_MARKER};
use crate::segment::RawSegment;

/// Line that introduces command-line audit steps.
static CLI_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:CLI|Command Line)\s*:|\b(?:via|using|from|through|with)\s+(?:the\s+)?(?:CLI|command[\s-]line|terminal|shell|PowerShell)\b",
    )
    .expect("Invalid CLI marker regex")
});

/// Line that introduces graphical audit steps.
static GUI_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:GUI|UI)\s*:|\b(?:via|using|from|through|with)\s+(?:the\s+|a\s+)?(?:GUI|graphical|user interface|web (?:console|interface|UI)|management console)\b",
    )
    .expect("Invalid GUI marker regex")
});

static GUI_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:navigate to|click|select|UI Path|Group Policy|gpedit)\b")
        .expect("Invalid GUI hint regex")
});

static CLI_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[#$>]\s|\b(?:run the following|command|grep|sudo|awk|stat|systemctl|Get-\w+)\b")
        .expect("Invalid CLI hint regex")
});

/// Inline numbered list item inside a references line: `1. https://...`.
static INLINE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)(\d{1,3})\.\s+").expect("Invalid inline number regex"));

const BULLETS: [char; 5] = ['•', '●', '▪', '◦', '■'];

/// A recommendation built from one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRecommendation {
    pub recommendation: Recommendation,
    /// Labels found with an empty body.
    pub unresolved_fields: Vec<FieldName>,
    /// 1-based page of the header.
    pub page: usize,
}

/// Result of extracting one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentOutcome {
    Recommendation(ExtractedRecommendation),
    /// Subsection heading such as `1.1 Filesystem Configuration`.
    GroupHeading { control_number: String, title: String },
    Malformed(SegmentIssue),
}

/// Turns raw segments into recommendations.
#[derive(Debug, Clone, Copy)]
pub struct FieldExtractor<'l> {
    labels: &'l LabelSet,
    detect_group_headings: bool,
}

impl<'l> FieldExtractor<'l> {
    #[must_use]
    pub fn new(labels: &'l LabelSet) -> Self {
        Self {
            labels,
            detect_group_headings: false,
        }
    }

    /// Treat unmarked, label-less headers as subsection headings.
    ///
    /// Only meaningful for documents that mark recommendations with an
    /// assessment status.
    #[must_use]
    pub fn with_group_heading_detection(mut self, enable: bool) -> Self {
        self.detect_group_headings = enable;
        self
    }

    pub fn extract(&self, segment: &RawSegment<'_>) -> SegmentOutcome {
        let heading = parse_heading(segment.heading);
        if heading.title.is_empty() {
            return SegmentOutcome::Malformed(SegmentIssue::MissingTitle {
                control_number: segment.control_number.to_string(),
                page: segment.page,
            });
        }

        let fields = LabeledFields::split(segment.body, self.labels);
        if self.detect_group_headings && !heading.has_assessment() && fields.seen.is_empty() {
            return SegmentOutcome::GroupHeading {
                control_number: segment.control_number.to_string(),
                title: heading.title,
            };
        }

        let mut rec = Recommendation::new(segment.control_number, heading.title);
        rec.assessment = heading.assessment;
        rec.level = heading
            .level
            .or_else(|| profile_level(&fields.text(FieldName::ProfileApplicability)))
            .unwrap_or(Level::Unknown);

        rec.description = fields.text(FieldName::Description);
        if rec.description.is_empty() {
            rec.description = fields.preamble();
        }
        rec.rationale = fields.text(FieldName::Rationale);
        rec.impact = fields.text(FieldName::Impact);
        (rec.audit_cli, rec.audit_gui) = split_audit(&fields.text(FieldName::Audit));
        rec.remediation = fields.text(FieldName::Remediation);
        rec.default_value = fields.text(FieldName::DefaultValue);
        rec.references = split_references(&fields.text(FieldName::References));
        rec.additional_information = fields.text(FieldName::AdditionalInformation);

        let unresolved_fields = fields.unresolved();
        debug!(
            control_number = %rec.control_number,
            level = %rec.level,
            populated = rec.populated_fields(),
            unresolved = unresolved_fields.len(),
            "segment extracted"
        );

        SegmentOutcome::Recommendation(ExtractedRecommendation {
            recommendation: rec,
            unresolved_fields,
            page: segment.page,
        })
    }
}

/// Segment body lines grouped under the label that precedes them.
#[derive(Debug, Default)]
struct LabeledFields<'a> {
    preamble: Vec<&'a str>,
    content: BTreeMap<FieldName, Vec<&'a str>>,
    seen: BTreeSet<FieldName>,
}

impl<'a> LabeledFields<'a> {
    fn split(body: &'a str, labels: &LabelSet) -> Self {
        let mut fields = Self::default();
        let mut current: Option<FieldName> = None;
        for line in body.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let text = match labels.match_line(line) {
                Some(found) => {
                    current = Some(found.field);
                    fields.seen.insert(found.field);
                    line[found.body_start..].trim()
                }
                None => line,
            };
            if text.is_empty() {
                continue;
            }
            match current {
                Some(field) => fields.content.entry(field).or_default().push(text),
                None => fields.preamble.push(text),
            }
        }
        fields
    }

    fn text(&self, field: FieldName) -> String {
        self.content
            .get(&field)
            .map(|lines| lines.join("\n"))
            .unwrap_or_default()
    }

    fn preamble(&self) -> String {
        self.preamble.join("\n")
    }

    fn unresolved(&self) -> Vec<FieldName> {
        self.seen
            .iter()
            .copied()
            .filter(|field| *field != FieldName::CisControls && !self.content.contains_key(field))
            .collect()
    }
}

/// Lowest level listed under Profile Applicability.
fn profile_level(text: &str) -> Option<Level> {
    LEVEL_MENTION
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .map(|tier| Level::from_tier(tier.as_str()))
        .min()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuditStyle {
    Cli,
    Gui,
}

/// Split audit text into command-line and graphical parts.
pub fn split_audit(text: &str) -> (String, String) {
    if text.is_empty() {
        return (String::new(), String::new());
    }

    let mut preamble: Vec<&str> = Vec::new();
    let mut cli: Vec<&str> = Vec::new();
    let mut gui: Vec<&str> = Vec::new();
    let mut first: Option<AuditStyle> = None;
    let mut current: Option<AuditStyle> = None;

    for line in text.lines() {
        if let Some(style) = audit_marker(line) {
            current = Some(style);
            first.get_or_insert(style);
        }
        match current {
            Some(AuditStyle::Cli) => cli.push(line),
            Some(AuditStyle::Gui) => gui.push(line),
            None => preamble.push(line),
        }
    }

    let style = first.unwrap_or_else(|| guess_style(text));
    let target = match style {
        AuditStyle::Cli => &mut cli,
        AuditStyle::Gui => &mut gui,
    };
    preamble.append(target);
    *target = preamble;

    (cli.join("\n"), gui.join("\n"))
}

fn audit_marker(line: &str) -> Option<AuditStyle> {
    let cli = CLI_MARKER.find(line).map(|found| found.start());
    let gui = GUI_MARKER.find(line).map(|found| found.start());
    match (cli, gui) {
        (Some(c), Some(g)) if g < c => Some(AuditStyle::Gui),
        (Some(_), _) => Some(AuditStyle::Cli),
        (None, Some(_)) => Some(AuditStyle::Gui),
        (None, None) => None,
    }
}

fn guess_style(text: &str) -> AuditStyle {
    if GUI_HINT.is_match(text) && !CLI_HINT.is_match(text) {
        AuditStyle::Gui
    } else {
        AuditStyle::Cli
    }
}

/// Split references on lines, bullets and inline numbering; first copy wins.
pub fn split_references(text: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut references = Vec::new();
    for line in text.lines() {
        for piece in line.split(BULLETS) {
            for reference in split_numbered(piece.trim()) {
                let reference = strip_list_marker(reference.trim()).trim();
                if !reference.is_empty() && seen.insert(reference.to_string()) {
                    references.push(reference.to_string());
                }
            }
        }
    }
    references
}

fn strip_list_marker(line: &str) -> &str {
    LIST_MARKER
        .find(line)
        .map_or(line, |found| &line[found.end()..])
}

/// Split `a 2. b 3. c` on a run of consecutive item numbers.
fn split_numbered(line: &str) -> Vec<&str> {
    let mut cuts: Vec<(usize, usize)> = Vec::new();
    let mut expected: Option<u32> = None;
    for captures in INLINE_NUMBER.captures_iter(line) {
        let (Some(whole), Some(number)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let Ok(number) = number.as_str().parse::<u32>() else {
            continue;
        };
        if expected.is_none_or(|next| next == number) {
            cuts.push((whole.start(), whole.end()));
            expected = Some(number + 1);
        }
    }
    if cuts.len() < 2 {
        return vec![line];
    }

    let mut pieces = vec![&line[..cuts[0].0]];
    for (i, &(_, end)) in cuts.iter().enumerate() {
        let stop = cuts.get(i + 1).map_or(line.len(), |&(start, _)| start);
        pieces.push(&line[end..stop]);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment<'a>(heading: &'a str, body: &'a str) -> RawSegment<'a> {
        RawSegment {
            control_number: "1.1",
            heading,
            body,
            offset: 0,
            page: 7,
        }
    }

    fn extract(heading: &str, body: &str) -> ExtractedRecommendation {
        let labels = LabelSet::builtin();
        match FieldExtractor::new(&labels).extract(&segment(heading, body)) {
            SegmentOutcome::Recommendation(rec) => rec,
            other => panic!("expected recommendation, got {other:?}"),
        }
    }

    #[test]
    fn extracts_labeled_fields() {
        let extracted = extract(
            "Ensure X (Automated)",
            "Profile Applicability:\n• Level 2 - Server\n• Level 1 - Workstation\nDescription: foo\nmore foo\nRationale: bar\nImpact:\nnone\nRemediation: fix it\nDefault Value: off\nCIS Controls:\nv8 4.1",
        );
        let rec = extracted.recommendation;
        assert_eq!(rec.title, "Ensure X");
        assert_eq!(rec.level, Level::Level1);
        assert_eq!(rec.description, "foo\nmore foo");
        assert_eq!(rec.rationale, "bar");
        assert_eq!(rec.impact, "none");
        assert_eq!(rec.remediation, "fix it");
        assert_eq!(rec.default_value, "off");
        assert!(rec.additional_information.is_empty());
        assert!(rec.status.is_empty());
        assert!(extracted.unresolved_fields.is_empty());
        assert_eq!(extracted.page, 7);
    }

    #[test]
    fn missing_rationale_leaves_field_empty() {
        let rec = extract("Ensure X", "Description: foo").recommendation;
        assert_eq!(rec.description, "foo");
        assert!(rec.rationale.is_empty());
        assert_eq!(rec.level, Level::Unknown);
    }

    #[test]
    fn unlabeled_body_becomes_description() {
        let rec = extract("Ensure X (L1)", "This setting controls X.\nRationale: bar").recommendation;
        assert_eq!(rec.description, "This setting controls X.");
        assert_eq!(rec.rationale, "bar");
    }

    #[test]
    fn empty_label_is_unresolved() {
        let extracted = extract("Ensure X", "Description: foo\nImpact:\nRationale: bar");
        assert_eq!(extracted.unresolved_fields, vec![FieldName::Impact]);
        assert_eq!(extracted.recommendation.rationale, "bar");
    }

    #[test]
    fn missing_title_is_malformed() {
        let labels = LabelSet::builtin();
        let outcome = FieldExtractor::new(&labels).extract(&segment("(Automated)", "Description: foo"));
        assert_eq!(
            outcome,
            SegmentOutcome::Malformed(SegmentIssue::MissingTitle {
                control_number: "1.1".to_string(),
                page: 7,
            })
        );
    }

    #[test]
    fn group_headings_are_detected_when_enabled() {
        let labels = LabelSet::builtin();
        let extractor = FieldExtractor::new(&labels).with_group_heading_detection(true);

        let outcome = extractor.extract(&segment("Filesystem Configuration", "Directories used for system functions."));
        assert!(matches!(outcome, SegmentOutcome::GroupHeading { .. }));

        let outcome = extractor.extract(&segment("Ensure X (Manual)", ""));
        assert!(matches!(outcome, SegmentOutcome::Recommendation(_)));

        let outcome = FieldExtractor::new(&labels).extract(&segment("Filesystem Configuration", ""));
        assert!(matches!(outcome, SegmentOutcome::Recommendation(_)));
    }

    #[test]
    fn audit_splits_on_style_markers() {
        let (cli, gui) = split_audit(
            "Perform the following to verify:\nTo audit via CLI run:\n# grep foo /etc/bar\nTo audit via the graphical interface, open Settings.",
        );
        assert_eq!(
            cli,
            "Perform the following to verify:\nTo audit via CLI run:\n# grep foo /etc/bar"
        );
        assert_eq!(gui, "To audit via the graphical interface, open Settings.");
    }

    #[test]
    fn unmarked_audit_is_classified_by_content() {
        let (cli, gui) = split_audit("Run the following command:\n# stat /etc/passwd");
        assert!(gui.is_empty());
        assert!(cli.starts_with("Run the following"));

        let (cli, gui) = split_audit("Navigate to the UI Path articulated in the Remediation section.");
        assert!(cli.is_empty());
        assert!(gui.starts_with("Navigate to"));
    }

    #[test]
    fn references_are_split_and_deduplicated() {
        let references = split_references(
            "1. https://example.com/a 2. https://example.com/b\n• NIST SP 800-53 • https://example.com/a\n- CCE-1234",
        );
        assert_eq!(
            references,
            vec![
                "https://example.com/a",
                "https://example.com/b",
                "NIST SP 800-53",
                "CCE-1234",
            ]
        );
    }

    #[test]
    fn version_numbers_do_not_split_references() {
        let references = split_references("Microsoft Windows 10 version 2. Release Notes");
        assert_eq!(references, vec!["Microsoft Windows 10 version 2. Release Notes"]);
    }
}
