//! Page text normalization.
//!
//! Raw page texts are cleaned and stitched into one stream of logical lines:
//!
//! 1. Characters are cleaned (ligatures expanded, odd spaces unified, control
//!    characters dropped) and whitespace is collapsed inside each line.
//! 2. Running headers and footers repeated on consecutive pages are removed.
//! 3. Words hyphenated across a line break are joined.
//! 4. Physical lines are glued into logical lines. A new logical line starts
//!    at a control header, section heading, field label, list item or shell
//!    prompt, and after a blank line or a line that ends a sentence. A control
//!    header only absorbs the line that closes it with a marker, and lines
//!    under a `References:` label are never glued.

use std::collections::{BTreeMap, BTreeSet};

use cis_model::FieldName;

use crate::labels::LabelSet;
use crate::patterns::{
    COMMAND_PROMPT, HEADING_END, LIST_MARKER, SECTION_HEADING, TOC_LEADER, is_control_header,
};

/// Edge lines examined at the top and bottom of each page.
const EDGE_LINES: usize = 2;

/// Longer lines are body text, never running headers.
const MAX_EDGE_KEY_LEN: usize = 120;

/// Counters gathered while normalizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub pages: usize,
    pub header_lines_removed: usize,
    pub hyphen_joins: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineSpan {
    offset: usize,
    len: usize,
    page: usize,
}

/// One logical line of the normalized stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Byte offset of the line start in [`NormalizedText::as_str`].
    pub offset: usize,
    /// 1-based page the line starts on.
    pub page: usize,
    pub text: &'a str,
}

/// Continuous document stream with page boundaries kept for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    lines: Vec<LineSpan>,
    stats: NormalizeStats,
}

impl NormalizedText {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> NormalizeStats {
        self.stats
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Logical lines in document order.
    pub fn lines(&self) -> impl Iterator<Item = Line<'_>> + Clone + '_ {
        self.lines_from_index(0)
    }

    /// Logical lines starting at the line that contains `offset`.
    pub fn lines_from(&self, offset: usize) -> impl Iterator<Item = Line<'_>> + Clone + '_ {
        self.lines_from_index(self.line_index_at(offset))
    }

    fn lines_from_index(&self, index: usize) -> impl Iterator<Item = Line<'_>> + Clone + '_ {
        self.lines[index.min(self.lines.len())..]
            .iter()
            .map(|span| Line {
                offset: span.offset,
                page: span.page,
                text: &self.text[span.offset..span.offset + span.len],
            })
    }

    fn line_index_at(&self, offset: usize) -> usize {
        self.lines
            .partition_point(|span| span.offset <= offset)
            .saturating_sub(1)
    }

    /// 1-based page holding the character at `offset`.
    #[must_use]
    pub fn page_at(&self, offset: usize) -> usize {
        self.lines
            .get(self.line_index_at(offset))
            .map_or(0, |span| span.page)
    }
}

/// Normalize raw page texts into a single stream.
pub fn normalize_pages(pages: &[String], labels: &LabelSet, repeat_threshold: usize) -> NormalizedText {
    let mut stats = NormalizeStats {
        pages: pages.len(),
        ..NormalizeStats::default()
    };

    let mut cleaned: Vec<Vec<String>> = pages
        .iter()
        .map(|page| page.lines().map(clean_line).collect())
        .collect();

    stats.header_lines_removed = strip_running_lines(&mut cleaned, labels, repeat_threshold);

    let mut physical: Vec<(usize, String)> = Vec::new();
    for (index, page) in cleaned.into_iter().enumerate() {
        let first = page.iter().position(|line| !line.is_empty());
        let last = page.iter().rposition(|line| !line.is_empty());
        if let (Some(first), Some(last)) = (first, last) {
            physical.extend(
                page.into_iter()
                    .take(last + 1)
                    .skip(first)
                    .map(|line| (index + 1, line)),
            );
        }
    }

    stats.hyphen_joins = join_hyphenated(&mut physical);

    let mut text = String::new();
    let mut lines = Vec::new();
    for (page, block) in join_logical_lines(physical, labels) {
        if !text.is_empty() {
            text.push('\n');
        }
        lines.push(LineSpan {
            offset: text.len(),
            len: block.len(),
            page,
        });
        text.push_str(&block);
    }

    NormalizedText { text, lines, stats }
}

/// Clean characters and collapse whitespace within one physical line.
pub fn clean_line(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\u{FB00}' => out.push_str("ff"),
            '\u{FB01}' => out.push_str("fi"),
            '\u{FB02}' => out.push_str("fl"),
            '\u{FB03}' => out.push_str("ffi"),
            '\u{FB04}' => out.push_str("ffl"),
            '\u{FB05}' | '\u{FB06}' => out.push_str("st"),
            '\u{00A0}' | '\u{2007}' | '\u{202F}' | '\u{0C}' | '\t' => out.push(' '),
            '\u{00AD}' | '\u{200B}' | '\u{FEFF}' => {}
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove edge lines repeated on `threshold` or more consecutive pages.
fn strip_running_lines(pages: &mut [Vec<String>], labels: &LabelSet, threshold: usize) -> usize {
    if threshold < 2 || pages.len() < threshold {
        return 0;
    }

    let mut candidates: Vec<Vec<(usize, String)>> = Vec::with_capacity(pages.len());
    let mut occurrences: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
    for (page_index, page) in pages.iter().enumerate() {
        let edges = edge_lines(page)
            .into_iter()
            .filter(|&i| !labels.is_label_line(&page[i]) && !is_control_header(&page[i]))
            .filter_map(|i| edge_key(&page[i]).map(|key| (i, key)))
            .collect::<Vec<_>>();
        for (_, key) in &edges {
            occurrences.entry(key.clone()).or_default().insert(page_index);
        }
        candidates.push(edges);
    }

    let mut noisy: BTreeSet<(String, usize)> = BTreeSet::new();
    for (key, page_indexes) in &occurrences {
        for run in consecutive_runs(page_indexes) {
            if run.len() >= threshold {
                noisy.extend(run.into_iter().map(|p| (key.clone(), p)));
            }
        }
    }

    let mut removed = 0;
    for (page_index, edges) in candidates.into_iter().enumerate() {
        let mut drop: Vec<usize> = edges
            .into_iter()
            .filter(|(_, key)| noisy.contains(&(key.clone(), page_index)))
            .map(|(i, _)| i)
            .collect();
        drop.sort_unstable();
        drop.dedup();
        for i in drop.into_iter().rev() {
            pages[page_index].remove(i);
            removed += 1;
        }
    }
    removed
}

/// Indexes of the first and last non-empty lines of a page.
fn edge_lines(page: &[String]) -> Vec<usize> {
    let filled: Vec<usize> = page
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(i, _)| i)
        .collect();
    let mut edges: Vec<usize> = filled.iter().take(EDGE_LINES).copied().collect();
    edges.extend(filled.iter().rev().take(EDGE_LINES).copied());
    edges.sort_unstable();
    edges.dedup();
    edges
}

/// Comparison key for an edge line: lowercase with digit runs folded to `#`.
fn edge_key(line: &str) -> Option<String> {
    if line.is_empty() || line.len() > MAX_EDGE_KEY_LEN {
        return None;
    }
    let mut key = String::with_capacity(line.len());
    let mut in_digits = false;
    for c in line.chars() {
        if c.is_ascii_digit() {
            if !in_digits {
                key.push('#');
            }
            in_digits = true;
        } else {
            in_digits = false;
            key.extend(c.to_lowercase());
        }
    }
    Some(key)
}

fn consecutive_runs(indexes: &BTreeSet<usize>) -> Vec<Vec<usize>> {
    let mut runs: Vec<Vec<usize>> = Vec::new();
    for &index in indexes {
        match runs.last_mut() {
            Some(run) if run.last().is_some_and(|&last| last + 1 == index) => run.push(index),
            _ => runs.push(vec![index]),
        }
    }
    runs
}

/// Join `word-` / `continuation` pairs in place.
fn join_hyphenated(lines: &mut Vec<(usize, String)>) -> usize {
    let mut joins = 0;
    let mut i = 0;
    while i + 1 < lines.len() {
        if should_join_hyphenated(&lines[i].1, &lines[i + 1].1) {
            let (_, next) = lines.remove(i + 1);
            let current = &mut lines[i].1;
            current.pop();
            current.push_str(&next);
            joins += 1;
        } else {
            i += 1;
        }
    }
    joins
}

fn should_join_hyphenated(current: &str, next: &str) -> bool {
    let Some(stem) = current.strip_suffix('-') else {
        return false;
    };
    if !stem.chars().last().is_some_and(char::is_alphabetic) {
        return false;
    }
    if last_token(current).is_some_and(is_url) {
        return false;
    }
    next.chars().next().is_some_and(char::is_lowercase)
}

fn join_logical_lines(lines: Vec<(usize, String)>, labels: &LabelSet) -> Vec<(usize, String)> {
    let mut blocks: Vec<(usize, String)> = Vec::new();
    let mut current: Option<(usize, String)> = None;
    let mut in_references = false;

    for (page, line) in lines {
        if line.is_empty() {
            blocks.extend(current.take());
            continue;
        }
        let continues = current.as_ref().is_some_and(|(_, block)| {
            if starts_block(&line, labels) || ends_block(block) {
                false
            } else if is_control_header(block) {
                closes_header(block, &line)
            } else if in_references {
                glues_without_space(block)
            } else {
                true
            }
        });
        if continues && let Some((_, block)) = current.as_mut() {
            if !glues_without_space(block) {
                block.push(' ');
            }
            block.push_str(&line);
        } else {
            if let Some(found) = labels.match_line(&line) {
                in_references = found.field == FieldName::References;
            } else if is_control_header(&line) || SECTION_HEADING.is_match(&line) {
                in_references = false;
            }
            blocks.extend(current.take());
            current = Some((page, line));
        }
    }
    blocks.extend(current);
    blocks
}

/// A wrapped header continues only when the next line carries its closing marker.
fn closes_header(header: &str, line: &str) -> bool {
    HEADING_END.is_match(&format!("{header} {line}"))
}

fn starts_block(line: &str, labels: &LabelSet) -> bool {
    is_control_header(line)
        || SECTION_HEADING.is_match(line)
        || labels.is_label_line(line)
        || LIST_MARKER.is_match(line)
        || COMMAND_PROMPT.is_match(line)
}

fn ends_block(block: &str) -> bool {
    block.ends_with(['.', ':', ';', '!', '?'])
        || HEADING_END.is_match(block)
        || TOC_LEADER.is_match(block)
}

/// A URL wrapped after `/` or `-` continues on the next line without a space.
fn glues_without_space(block: &str) -> bool {
    last_token(block).is_some_and(|token| is_url(token) && token.ends_with(['/', '-']))
}

fn last_token(line: &str) -> Option<&str> {
    line.split_whitespace().last()
}

fn is_url(token: &str) -> bool {
    token.contains("://") || token.starts_with("www.")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| (*t).to_string()).collect()
    }

    fn normalize(texts: &[&str]) -> NormalizedText {
        normalize_pages(&pages(texts), &LabelSet::builtin(), 3)
    }

    #[test]
    fn cleans_ligatures_and_spaces() {
        assert_eq!(clean_line("con\u{FB01}gure\u{00A0}\u{00A0}the  \tﬁle"), "configure the file");
    }

    #[test]
    fn keeps_labels_and_headers_on_their_own_lines() {
        let text = normalize(&["1.1 Ensure X\nDescription: foo\nRationale: bar\n1.2 Ensure Y"]);
        let lines: Vec<&str> = text.lines().map(|line| line.text).collect();
        assert_eq!(
            lines,
            vec!["1.1 Ensure X", "Description: foo", "Rationale: bar", "1.2 Ensure Y"]
        );
    }

    #[test]
    fn glues_wrapped_sentences() {
        let text = normalize(&["Description:\nThe setting is\nenabled by default.\nNext sentence"]);
        let lines: Vec<&str> = text.lines().map(|line| line.text).collect();
        assert_eq!(
            lines,
            vec!["Description:", "The setting is enabled by default.", "Next sentence"]
        );
    }

    #[test]
    fn header_absorbs_only_its_closing_marker() {
        let text = normalize(&["1.1 Ensure X\nThis setting controls X.\n1.2 Ensure the long\ntitle is set (Automated)"]);
        let lines: Vec<&str> = text.lines().map(|line| line.text).collect();
        assert_eq!(
            lines,
            vec![
                "1.1 Ensure X",
                "This setting controls X.",
                "1.2 Ensure the long title is set (Automated)"
            ]
        );
    }

    #[test]
    fn reference_lines_stay_apart() {
        let text = normalize(&[
            "References:\nhttps://example.com/a\nhttps://example.com/docs/\nb.html\nCCE-1234\nRemediation:\nrun the\ncommand",
        ]);
        let lines: Vec<&str> = text.lines().map(|line| line.text).collect();
        assert_eq!(
            lines,
            vec![
                "References:",
                "https://example.com/a",
                "https://example.com/docs/b.html",
                "CCE-1234",
                "Remediation:",
                "run the command"
            ]
        );
    }

    #[test]
    fn joins_hyphenated_words_across_pages() {
        let text = normalize(&["The configu-", "ration is applied"]);
        assert_eq!(text.as_str(), "The configuration is applied");
        assert_eq!(text.stats().hyphen_joins, 1);
    }

    #[test]
    fn rejoins_wrapped_urls_without_space() {
        let text = normalize(&["See https://example.com/docs/\nsecurity.html"]);
        assert_eq!(text.as_str(), "See https://example.com/docs/security.html");

        let text = normalize(&["See https://example.com/hardening-\nguide"]);
        assert_eq!(text.as_str(), "See https://example.com/hardening-guide");
        assert_eq!(text.stats().hyphen_joins, 0);
    }

    #[test]
    fn strips_running_headers_on_consecutive_pages() {
        let text = normalize(&[
            "CIS Benchmark v1.0.0\nfirst body\nPage 1",
            "CIS Benchmark v1.0.0\nsecond body\nPage 2",
            "CIS Benchmark v1.0.0\nthird body\nPage 3",
        ]);
        assert_eq!(text.as_str(), "first body second body third body");
        assert_eq!(text.stats().header_lines_removed, 6);
    }

    #[test]
    fn short_repetition_is_kept() {
        let text = normalize(&["Header\nbody one.", "Header\nbody two."]);
        assert!(text.as_str().contains("Header"));
        assert_eq!(text.stats().header_lines_removed, 0);
    }

    #[test]
    fn tracks_pages_per_line() {
        let text = normalize(&["1.1 Ensure X (Automated)", "Description: foo."]);
        let offset = text.as_str().find("Description").expect("description");
        assert_eq!(text.page_at(0), 1);
        assert_eq!(text.page_at(offset), 2);
        assert_eq!(text.lines_from(offset).next().map(|l| l.text), Some("Description: foo."));
    }

    #[test]
    fn empty_pages_give_blank_text() {
        let text = normalize(&["", "  \n \n"]);
        assert!(text.is_blank());
        assert_eq!(text.line_count(), 0);
        assert_eq!(text.stats().pages, 2);
    }
}
