//! Recommendation heading parsing: title, level and assessment markers.

use cis_model::{Assessment, Level};

use crate::patterns::{ASSESSMENT_MARKER, LEVEL_MARKER, TRAILING_LEVEL};

/// Heading text split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHeading {
    pub title: String,
    /// Level from a marker in the heading; `None` when unmarked.
    pub level: Option<Level>,
    pub assessment: Assessment,
}

impl ParsedHeading {
    /// True when the heading carried an assessment marker.
    #[must_use]
    pub fn has_assessment(&self) -> bool {
        self.assessment != Assessment::Unspecified
    }
}

/// Parse the text following a control number.
///
/// `"Ensure X (Scored) [Level 1]"` and `"Ensure X (L1)"` both give title
/// `Ensure X` at Level 1.
pub fn parse_heading(heading: &str) -> ParsedHeading {
    let mut text = heading.to_string();

    let mut assessment = Assessment::Unspecified;
    if let Some(captures) = ASSESSMENT_MARKER.captures_iter(heading).last()
        && let (Some(whole), Some(marker)) = (captures.get(0), captures.get(1))
    {
        assessment = Assessment::from_marker(marker.as_str());
        text.replace_range(whole.range(), " ");
    }

    let mut level = LEVEL_MARKER
        .captures(&text)
        .and_then(|captures| captures.get(1))
        .map(|tier| Level::from_tier(tier.as_str()));
    text = LEVEL_MARKER.replace_all(&text, " ").into_owned();

    let mut cut = None;
    if let Some(captures) = TRAILING_LEVEL.captures(text.trim_end())
        && let (Some(whole), Some(tier)) = (captures.get(0), captures.get(1))
    {
        level = level.or_else(|| Some(Level::from_tier(tier.as_str())));
        cut = Some(whole.start());
    }
    if let Some(cut) = cut {
        text.truncate(cut);
    }

    ParsedHeading {
        title: clean_title(&text),
        level,
        assessment,
    }
}

fn clean_title(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(|c: char| matches!(c, '-' | '–' | ':' | ',' | '.') || c.is_whitespace())
        .to_string()
}
