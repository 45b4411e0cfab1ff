//! Plain-text page source.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{IngestError, Result};
use crate::source::io_error;

/// Page separator used by `pdftotext` and most text dumps.
pub const PAGE_SEPARATOR: char = '\x0C';

/// Read a UTF-8 text file and split it into pages on form feeds.
pub fn read_text_pages(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::InvalidData {
            IngestError::Decode {
                path: path.to_path_buf(),
                message: "file is not valid UTF-8".to_string(),
            }
        } else {
            io_error(path, e)
        }
    })?;
    Ok(split_text_pages(&content))
}

/// Split text into pages. A trailing separator does not open an empty page.
pub fn split_text_pages(content: &str) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }
    let mut pages: Vec<String> = content.split(PAGE_SEPARATOR).map(String::from).collect();
    if pages.len() > 1 && pages.last().is_some_and(|page| page.trim().is_empty()) {
        pages.pop();
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_form_feed() {
        let pages = split_text_pages("one\n\x0Ctwo\n\x0C");
        assert_eq!(pages, vec!["one\n".to_string(), "two\n".to_string()]);
    }

    #[test]
    fn empty_input_has_no_pages() {
        assert!(split_text_pages("").is_empty());
    }
}
