//! Page text ingestion for benchmark documents.
//!
//! Turns an input file into an ordered list of page texts:
//!
//! - **PDF** files are decoded with `lopdf`/`pdf-extract`
//! - **Text** files are split into pages on form feed characters

pub mod error;
pub mod pdf;
pub mod source;
pub mod text;

pub use error::{IngestError, Result};
pub use pdf::{pdf_pages_from_bytes, read_pdf_pages};
pub use source::{InputFormat, PageSource, PdfFile, TextFile, detect_format, open_source};
pub use text::{PAGE_SEPARATOR, read_text_pages, split_text_pages};
