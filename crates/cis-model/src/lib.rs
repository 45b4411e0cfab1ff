pub mod document;
pub mod error;
pub mod options;
pub mod summary;

pub use document::{
    Assessment, BenchmarkDocument, Level, Recommendation, Section, is_valid_control_number,
    section_number_of,
};
pub use error::{ExtractError, Result, SegmentIssue};
pub use options::{
    DEFAULT_HEADER_REPEAT_THRESHOLD, DEFAULT_METADATA_SCAN_PAGES, ExtractionOptions, FieldName,
    LabelPattern,
};
pub use summary::{Extraction, ExtractionSummary};
