//! Line-level patterns shared by the extraction stages.

use std::sync::LazyLock;

use regex::Regex;

/// Recommendation header: `1.2.3 Title...`.
pub static CONTROL_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)+)\s+(\S.*)$").expect("Invalid control header regex")
});

/// Top-level section heading: `1 Initial Setup`.
pub static SECTION_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})\s+(\p{Lu}.*)$").expect("Invalid section heading regex")
});

/// Dot leaders followed by a page number, as printed in a table of contents.
pub static TOC_LEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(?:\.\s*){3,}|…+\s*)(\d{1,4})\s*$").expect("Invalid TOC leader regex")
});

/// Bare trailing page number.
pub static TRAILING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s(\d{1,4})\s*$").expect("Invalid trailing number regex"));

/// Assessment status marker: `(Automated)`, `(Not Scored)`.
pub static ASSESSMENT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(\s*(automated|manual|scored|not\s+scored)\s*\)")
        .expect("Invalid assessment marker regex")
});

/// Bracketed level marker: `(L1)`, `[Level 2]`.
pub static LEVEL_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[(\[]\s*(?:L|Level\s*)([12])\s*[)\]]").expect("Invalid level marker regex")
});

/// Bare level marker at the end of a title: `... Level 1`.
pub static TRAILING_LEVEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[\s\-–:]*\bLevel\s*([12])\s*$").expect("Invalid trailing level regex")
});

/// Any `Level N` mention, used inside Profile Applicability.
pub static LEVEL_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bLevel\s*([12])\b").expect("Invalid level mention regex"));

/// Line ending with a marker that closes a recommendation header.
pub static HEADING_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\(\s*(?:automated|manual|scored|not\s+scored)\s*\)|[(\[]\s*(?:L|Level\s*)[12]\s*[)\]])\s*$",
    )
    .expect("Invalid heading end regex")
});

/// Bullet or numbered list item at line start.
pub static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[•●▪◦■\-\*–]\s+|\d{1,3}[.)]\s+)").expect("Invalid list marker regex")
});

/// Shell prompt at line start.
pub static COMMAND_PROMPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[#$>]\s").expect("Invalid command prompt regex"));

/// True when a line opens a recommendation.
#[must_use]
pub fn is_control_header(line: &str) -> bool {
    CONTROL_HEADER.is_match(line)
}

/// Split a header line into control number and heading text.
#[must_use]
pub fn split_control_header(line: &str) -> Option<(&str, &str)> {
    let captures = CONTROL_HEADER.captures(line)?;
    let number = captures.get(1)?.as_str();
    let heading = captures.get(2)?.as_str();
    Some((number, heading))
}

/// Section heading number and title with any trailing page reference removed.
#[must_use]
pub fn split_section_heading(line: &str) -> Option<(&str, &str)> {
    let captures = SECTION_HEADING.captures(line)?;
    let number = captures.get(1)?.as_str();
    let mut title = captures.get(2)?.as_str();
    if let Some(found) = TOC_LEADER.find(title) {
        title = &title[..found.start()];
    } else if let Some(found) = TRAILING_NUMBER.find(title) {
        title = &title[..found.start()];
    }
    let title = title.trim_end_matches(|c: char| c == '.' || c.is_whitespace());
    Some((number, title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_header_requires_dotted_number_and_text() {
        assert_eq!(
            split_control_header("1.1.2 Ensure nodev option set"),
            Some(("1.1.2", "Ensure nodev option set"))
        );
        assert!(!is_control_header("1 Initial Setup"));
        assert!(!is_control_header("1. https://example.com"));
        assert!(!is_control_header("1.1"));
    }

    #[test]
    fn section_heading_drops_page_reference() {
        assert_eq!(
            split_section_heading("2 Services ........... 140"),
            Some(("2", "Services"))
        );
        assert_eq!(
            split_section_heading("3 Network Configuration 210"),
            Some(("3", "Network Configuration"))
        );
        assert_eq!(
            split_section_heading("1 Initial Setup"),
            Some(("1", "Initial Setup"))
        );
        assert_eq!(split_section_heading("1 of the items"), None);
    }

    #[test]
    fn heading_end_markers() {
        assert!(HEADING_END.is_match("Ensure X (Automated)"));
        assert!(HEADING_END.is_match("Ensure X (Scored) [Level 1]"));
        assert!(HEADING_END.is_match("Ensure X (L2)"));
        assert!(!HEADING_END.is_match("Ensure X is"));
    }

    #[test]
    fn list_markers() {
        assert!(LIST_MARKER.is_match("1. https://example.com"));
        assert!(LIST_MARKER.is_match("• NIST SP 800-53"));
        assert!(LIST_MARKER.is_match("- item"));
        assert!(!LIST_MARKER.is_match("-rw-r--r-- 1 root"));
        assert!(!LIST_MARKER.is_match("1.1 Ensure X"));
    }
}
