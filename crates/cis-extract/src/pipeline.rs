//! The extraction pipeline.
//!
//! Stages run in order, each consuming the full output of the previous one:
//! normalize, metadata, locate, segment, organize, assemble.

use std::collections::BTreeMap;
use std::time::Instant;

use cis_model::{ExtractError, Extraction, ExtractionOptions, Result};
use tracing::{info, info_span};

use crate::assemble::Assembler;
use crate::fields::FieldExtractor;
use crate::heading::parse_heading;
use crate::labels::LabelSet;
use crate::locate::locate_start;
use crate::metadata::detect_metadata;
use crate::normalize::normalize_pages;
use crate::sections::{SectionNames, infer_section_names};
use crate::segment::Segmenter;

/// Converts page texts into a [`BenchmarkDocument`](cis_model::BenchmarkDocument).
///
/// Holds its own configuration snapshot; runs share no state, so one
/// extractor can process any number of documents.
#[derive(Debug)]
pub struct Extractor {
    options: ExtractionOptions,
    labels: LabelSet,
}

impl Extractor {
    /// Build an extractor, compiling the configured label patterns.
    pub fn new(options: ExtractionOptions) -> Result<Self> {
        let labels = LabelSet::from_options(&options)?;
        Ok(Self { options, labels })
    }

    /// Replace the label recognizers.
    #[must_use]
    pub fn with_labels(mut self, labels: LabelSet) -> Self {
        self.labels = labels;
        self
    }

    #[must_use]
    pub fn options(&self) -> &ExtractionOptions {
        &self.options
    }

    #[must_use]
    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// Run every stage over the given pages.
    pub fn extract(&self, pages: &[String]) -> Result<Extraction> {
        let run_start = Instant::now();
        if pages.is_empty() {
            return Err(ExtractError::EmptyDocument);
        }

        let text = info_span!("normalize").in_scope(|| {
            let start = Instant::now();
            let text = normalize_pages(pages, &self.labels, self.options.header_repeat_threshold);
            let stats = text.stats();
            info!(
                pages = stats.pages,
                lines = text.line_count(),
                header_lines_removed = stats.header_lines_removed,
                hyphen_joins = stats.hyphen_joins,
                duration_ms = start.elapsed().as_millis(),
                "normalize complete"
            );
            text
        });
        if text.is_blank() {
            return Err(ExtractError::EmptyDocument);
        }

        let metadata = info_span!("metadata").in_scope(|| {
            let start = Instant::now();
            let metadata = detect_metadata(pages, self.options.metadata_scan_pages);
            info!(
                title = %metadata.title,
                version = %metadata.version,
                duration_ms = start.elapsed().as_millis(),
                "metadata complete"
            );
            metadata
        });

        let start_offset = info_span!("locate").in_scope(|| -> Result<usize> {
            let start = Instant::now();
            let offset = locate_start(&text)?;
            info!(
                offset,
                page = text.page_at(offset),
                duration_ms = start.elapsed().as_millis(),
                "locate complete"
            );
            Ok(offset)
        })?;
        let start_page = text.page_at(start_offset);

        let assembler = info_span!("segment").in_scope(|| {
            let start = Instant::now();
            let segmenter = Segmenter::new(&text, start_offset);
            let uses_assessment = segmenter
                .segments()
                .any(|segment| parse_heading(segment.heading).has_assessment());
            let extractor = FieldExtractor::new(&self.labels)
                .with_group_heading_detection(self.options.skip_group_headings && uses_assessment);

            let mut assembler = Assembler::new();
            let mut segments = 0usize;
            for segment in segmenter.segments() {
                segments += 1;
                assembler.push(extractor.extract(&segment));
            }
            info!(
                segments,
                uses_assessment,
                duration_ms = start.elapsed().as_millis(),
                "segment complete"
            );
            assembler
        });

        let names = info_span!("organize").in_scope(|| {
            let start = Instant::now();
            let inferred = if self.options.infer_section_names {
                infer_section_names(&text)
            } else {
                BTreeMap::new()
            };
            info!(
                configured = self.options.section_names.len(),
                inferred = inferred.len(),
                duration_ms = start.elapsed().as_millis(),
                "organize complete"
            );
            SectionNames::new(self.options.section_names.clone()).with_inferred(inferred)
        });

        info_span!("assemble").in_scope(|| -> Result<Extraction> {
            let start = Instant::now();
            let extraction = assembler.finish(metadata, &names, text.stats(), start_page)?;
            let summary = &extraction.summary;
            info!(
                recommendations = summary.recommendations,
                sections = summary.sections,
                skipped = summary.skipped,
                duplicates = summary.duplicates,
                low_confidence = summary.low_confidence,
                duration_ms = start.elapsed().as_millis(),
                total_ms = run_start.elapsed().as_millis(),
                "assemble complete"
            );
            Ok(extraction)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_page_list_is_empty_document() {
        let extractor = Extractor::new(ExtractionOptions::default()).expect("extractor");
        assert!(matches!(extractor.extract(&[]), Err(ExtractError::EmptyDocument)));
    }

    #[test]
    fn whitespace_pages_are_empty_document() {
        let extractor = Extractor::new(ExtractionOptions::default()).expect("extractor");
        let pages = vec!["  \n".to_string(), "\u{00A0}".to_string()];
        assert!(matches!(extractor.extract(&pages), Err(ExtractError::EmptyDocument)));
    }
}
