//! Locating the start of the recommendation listing.

use cis_model::{ExtractError, Result};
use tracing::debug;

use crate::normalize::{Line, NormalizedText};
use crate::patterns::{SECTION_HEADING, TOC_LEADER, TRAILING_NUMBER, is_control_header};

/// Offset of the first control header that is not a table-of-contents entry.
///
/// A line with dot leaders before a page number is always a contents entry.
/// A header or section heading ending in a bare number is one when it sits
/// next to another contents entry.
pub fn locate_start(text: &NormalizedText) -> Result<usize> {
    let lines: Vec<Line<'_>> = text.lines().collect();
    let mut previous_toc = false;

    for (index, line) in lines.iter().enumerate() {
        let header = is_control_header(line.text);
        let structural = header || SECTION_HEADING.is_match(line.text);
        let toc = TOC_LEADER.is_match(line.text)
            || (structural
                && TRAILING_NUMBER.is_match(line.text)
                && (previous_toc || lines.get(index + 1).is_some_and(is_toc_entry)));

        if header && !toc {
            debug!(offset = line.offset, page = line.page, line = line.text, "anchor found");
            return Ok(line.offset);
        }
        previous_toc = toc;
    }
    Err(ExtractError::RecommendationsNotFound)
}

fn is_toc_entry(line: &Line<'_>) -> bool {
    (is_control_header(line.text) || SECTION_HEADING.is_match(line.text))
        && (TOC_LEADER.is_match(line.text) || TRAILING_NUMBER.is_match(line.text))
}
