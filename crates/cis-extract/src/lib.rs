//! Text-to-record extraction engine for CIS Benchmark documents.
//!
//! The [`Extractor`] turns ordered page texts into a
//! [`BenchmarkDocument`](cis_model::BenchmarkDocument):
//!
//! - [`normalize`]: cleans pages into one stream of logical lines
//! - [`metadata`]: benchmark title and version from the front pages
//! - [`locate`]: start of the recommendation listing, past the contents
//! - [`segment`]: one raw segment per control header
//! - [`fields`]: labeled sub-fields, level, audit and references per segment
//! - [`sections`]: section grouping and naming
//! - [`assemble`]: validation, de-duplication and the run summary

pub mod assemble;
pub mod config;
pub mod fields;
pub mod heading;
pub mod labels;
pub mod locate;
pub mod metadata;
pub mod normalize;
pub mod patterns;
pub mod pipeline;
pub mod sections;
pub mod segment;

pub use assemble::Assembler;
pub use config::{ConfigError, load_options, parse_options};
pub use fields::{
    ExtractedRecommendation, FieldExtractor, SegmentOutcome, split_audit, split_references,
};
pub use heading::{ParsedHeading, parse_heading};
pub use labels::{FieldRecognizer, LabelMatch, LabelSet, RegexRecognizer};
pub use locate::locate_start;
pub use metadata::{BenchmarkMetadata, detect_metadata};
pub use normalize::{Line, NormalizeStats, NormalizedText, normalize_pages};
pub use pipeline::Extractor;
pub use sections::{
    BUILTIN_SECTION_NAMES, SectionNames, builtin_section_name, infer_section_names, organize,
};
pub use segment::{RawSegment, Segmenter, Segments};
