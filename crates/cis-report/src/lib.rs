//! Output writers for extracted benchmark checklists.
//!
//! - [`write_workbook`] renders an XLSX workbook with an `INDEX` sheet and one
//!   sheet per section.
//! - [`write_extraction_json`] exports the document and summary as JSON.
//!
//! Both write through a temporary file that is renamed into place.

pub mod atomic;
pub mod error;
pub mod json;
pub mod options;
pub mod rows;
pub mod workbook;

pub use atomic::write_atomically;
pub use error::{ReportError, Result};
pub use json::{extraction_json, write_extraction_json};
pub use options::{LevelColors, WorkbookOptions};
pub use rows::{ChecklistRow, IndexRow, checklist_row, section_sheet_names};
pub use workbook::{build_workbook, write_workbook};
