//! CLI library components for the CIS checklist converter.

pub mod convert;
pub mod logging;

pub use convert::{
    ConvertOutcome, ConvertRequest, OUTPUT_SUFFIX, convert, convert_pages, derive_output_path,
    load_extraction_options, read_pages,
};
