//! Model assembly: validation, de-duplication and summary reporting.

use std::collections::BTreeMap;

use cis_model::{
    BenchmarkDocument, ExtractError, Extraction, ExtractionSummary, Result, SegmentIssue,
    is_valid_control_number,
};
use tracing::{debug, warn};

use crate::fields::{ExtractedRecommendation, SegmentOutcome};
use crate::metadata::BenchmarkMetadata;
use crate::normalize::NormalizeStats;
use crate::sections::{SectionNames, organize};

/// Collects segment outcomes in document order and builds the final model.
#[derive(Debug, Default)]
pub struct Assembler {
    records: Vec<ExtractedRecommendation>,
    positions: BTreeMap<String, usize>,
    issues: Vec<SegmentIssue>,
    segments: usize,
    skipped: usize,
    duplicates: usize,
    group_headings: usize,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: SegmentOutcome) {
        self.segments += 1;
        match outcome {
            SegmentOutcome::Recommendation(extracted) => self.push_recommendation(extracted),
            SegmentOutcome::GroupHeading {
                control_number,
                title,
            } => {
                debug!(%control_number, %title, "subsection heading skipped");
                self.group_headings += 1;
            }
            SegmentOutcome::Malformed(issue) => self.skip(issue),
        }
    }

    fn push_recommendation(&mut self, extracted: ExtractedRecommendation) {
        let rec = &extracted.recommendation;
        if !is_valid_control_number(&rec.control_number) {
            self.skip(SegmentIssue::InvalidControlNumber {
                control_number: rec.control_number.clone(),
                page: extracted.page,
            });
            return;
        }
        if rec.title.trim().is_empty() {
            self.skip(SegmentIssue::MissingTitle {
                control_number: rec.control_number.clone(),
                page: extracted.page,
            });
            return;
        }

        for field in &extracted.unresolved_fields {
            warn!(control_number = %rec.control_number, %field, "label has no content");
        }

        let Some(&position) = self.positions.get(&rec.control_number) else {
            self.positions
                .insert(rec.control_number.clone(), self.records.len());
            self.records.push(extracted);
            return;
        };

        let dropped_page = if self.records[position].recommendation.is_low_confidence()
            && !rec.is_low_confidence()
        {
            std::mem::replace(&mut self.records[position], extracted).page
        } else {
            extracted.page
        };
        let control_number = self.records[position].recommendation.control_number.clone();
        debug!(%control_number, page = dropped_page, "duplicate recommendation dropped");
        self.duplicates += 1;
        self.issues.push(SegmentIssue::Duplicate {
            control_number,
            page: dropped_page,
        });
    }

    fn skip(&mut self, issue: SegmentIssue) {
        warn!(control_number = issue.control_number(), "{issue}");
        self.skipped += 1;
        self.issues.push(issue);
    }

    /// Validate, group and package the collected recommendations.
    ///
    /// Fails with [`ExtractError::RecommendationsNotFound`] when nothing
    /// survived.
    pub fn finish(
        mut self,
        metadata: BenchmarkMetadata,
        names: &SectionNames,
        normalize: NormalizeStats,
        start_page: usize,
    ) -> Result<Extraction> {
        let unresolved_fields = self
            .records
            .iter()
            .map(|record| record.unresolved_fields.len())
            .sum();
        let recommendations = std::mem::take(&mut self.records)
            .into_iter()
            .map(|record| record.recommendation)
            .collect();

        let mut sections = organize(recommendations, names);
        for section in &mut sections {
            let (kept, misplaced): (Vec<_>, Vec<_>) = std::mem::take(&mut section.recommendations)
                .into_iter()
                .partition(|rec| section.contains_control(&rec.control_number));
            for rec in misplaced {
                self.skip(SegmentIssue::SectionMismatch {
                    control_number: rec.control_number,
                    section: section.number.clone(),
                });
            }
            section.recommendations = kept;
        }
        sections.retain(|section| !section.recommendations.is_empty());

        let document = BenchmarkDocument {
            title: metadata.title,
            version: metadata.version,
            sections,
        };
        let recommendations = document.recommendation_count();
        if recommendations == 0 {
            return Err(ExtractError::RecommendationsNotFound);
        }

        let summary = ExtractionSummary {
            total_pages: normalize.pages,
            start_page,
            segments: self.segments,
            recommendations,
            skipped: self.skipped,
            duplicates: self.duplicates,
            group_headings: self.group_headings,
            low_confidence: document
                .recommendations()
                .filter(|rec| rec.is_low_confidence())
                .count(),
            unresolved_fields,
            sections: document.sections.len(),
            header_lines_removed: normalize.header_lines_removed,
            hyphen_joins: normalize.hyphen_joins,
            issues: self.issues,
        };
        Ok(Extraction { document, summary })
    }
}
