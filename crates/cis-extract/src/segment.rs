//! Recommendation segmentation.
//!
//! Every line matching `^<digits>(.<digits>)+\s+\S` past the located start
//! opens a new segment. Segment content is not interpreted here.

use cis_model::section_number_of;

use crate::normalize::{Line, NormalizedText};
use crate::patterns::{split_control_header, split_section_heading};

/// One recommendation-sized slice of the normalized stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSegment<'a> {
    pub control_number: &'a str,
    /// Header text after the control number: title plus any markers.
    pub heading: &'a str,
    /// Logical lines between this header and the next, newline separated.
    pub body: &'a str,
    /// Byte offset of the header line.
    pub offset: usize,
    /// 1-based page holding the header line.
    pub page: usize,
}

/// Splits a normalized stream into segments starting at a located offset.
#[derive(Debug, Clone, Copy)]
pub struct Segmenter<'a> {
    text: &'a NormalizedText,
    start: usize,
}

impl<'a> Segmenter<'a> {
    #[must_use]
    pub fn new(text: &'a NormalizedText, start: usize) -> Self {
        Self { text, start }
    }

    /// Fresh pass over the segments from the start offset.
    #[must_use]
    pub fn segments(&self) -> Segments<'a> {
        let (lines, pending) = self.header_lines();
        Segments {
            source: self.text.as_str(),
            lines,
            pending,
        }
    }

    fn header_lines(&self) -> (Vec<Line<'a>>, Option<usize>) {
        let lines: Vec<Line<'a>> = self
            .text
            .lines_from(self.start)
            .filter(|line| line.offset >= self.start)
            .collect();
        let first = lines
            .iter()
            .position(|line| split_control_header(line.text).is_some());
        (lines, first)
    }
}

/// Forward-only iterator over [`RawSegment`]s.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    source: &'a str,
    lines: Vec<Line<'a>>,
    /// Index of the next header line.
    pending: Option<usize>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = RawSegment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.pending?;
        let header = self.lines[index];
        let (control_number, heading) = split_control_header(header.text)?;

        let next_header = self.lines[index + 1..]
            .iter()
            .position(|line| split_control_header(line.text).is_some())
            .map(|pos| index + 1 + pos);
        self.pending = next_header;

        let mut body_lines = &self.lines[index + 1..next_header.unwrap_or(self.lines.len())];
        if let (Some(last), Some(next)) = (body_lines.last(), next_header) {
            let next_section = split_control_header(self.lines[next].text)
                .map(|(number, _)| section_number_of(number));
            if is_section_boundary(last.text, section_number_of(control_number), next_section) {
                body_lines = &body_lines[..body_lines.len() - 1];
            }
        }

        let source = self.source;
        let body = match (body_lines.first(), body_lines.last()) {
            (Some(first), Some(last)) => &source[first.offset..last.offset + last.text.len()],
            _ => "",
        };

        Some(RawSegment {
            control_number,
            heading,
            body,
            offset: header.offset,
            page: header.page,
        })
    }
}

/// True when `line` is the heading of the section the next header opens.
fn is_section_boundary(line: &str, current: &str, next: Option<&str>) -> bool {
    match (split_section_heading(line), next) {
        (Some((number, _)), Some(next)) => number == next && number != current,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::LabelSet;
    use crate::normalize::normalize_pages;

    fn normalized(text: &str) -> NormalizedText {
        normalize_pages(&[text.to_string()], &LabelSet::builtin(), 3)
    }

    #[test]
    fn one_segment_per_header() {
        let text = normalized("1.1 Ensure X\nDescription: foo\nRationale: bar\n1.2 Ensure Y\nDescription: baz\n");
        let segments: Vec<RawSegment<'_>> = Segmenter::new(&text, 0).segments().collect();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].control_number, "1.1");
        assert_eq!(segments[0].heading, "Ensure X");
        assert_eq!(segments[0].body, "Description: foo\nRationale: bar");
        assert_eq!(segments[1].control_number, "1.2");
        assert_eq!(segments[1].body, "Description: baz");
    }

    #[test]
    fn consecutive_headers_are_not_merged() {
        let text = normalized("1.1 Ensure X\n1.2 Ensure Y\n1.3 Ensure Z\nDescription: z");
        let segments: Vec<RawSegment<'_>> = Segmenter::new(&text, 0).segments().collect();
        assert_eq!(segments.len(), 3);
        assert!(segments[0].body.is_empty());
        assert!(segments[1].body.is_empty());
    }

    #[test]
    fn starts_at_located_offset() {
        let text = normalized("Intro text.\n1.1 Ensure X\nDescription: foo");
        let start = text.as_str().find("1.1").expect("header");
        let segments: Vec<RawSegment<'_>> = Segmenter::new(&text, start).segments().collect();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].offset, start);
    }

    #[test]
    fn next_section_heading_is_cut_from_body() {
        let text = normalized("1.9 Ensure X\nDescription: foo.\n2 Services\n2.1 Ensure Y\nDescription: bar.");
        let segments: Vec<RawSegment<'_>> = Segmenter::new(&text, 0).segments().collect();
        assert_eq!(segments[0].body, "Description: foo.");
        assert_eq!(segments[1].control_number, "2.1");
    }

    #[test]
    fn segments_restart_from_the_beginning() {
        let text = normalized("1.1 Ensure X\n1.2 Ensure Y");
        let segmenter = Segmenter::new(&text, 0);
        let mut first = segmenter.segments();
        assert!(first.next().is_some());
        assert_eq!(segmenter.segments().count(), 2);
        assert_eq!(first.count(), 1);
    }
}
