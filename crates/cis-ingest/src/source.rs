//! Page sources: anything that yields an ordered list of page texts.

use std::fs;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};
use crate::pdf::read_pdf_pages;
use crate::text::read_text_pages;

/// Input file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// Decide from the file signature, then the extension.
    #[default]
    Auto,
    Pdf,
    /// UTF-8 text with pages separated by form feed characters.
    Text,
}

/// Producer of ordered page texts for one document.
pub trait PageSource {
    /// Path of the underlying input.
    fn path(&self) -> &Path;

    /// Read every page. The input is opened, fully consumed and closed here.
    fn read_pages(&self) -> Result<Vec<String>>;
}

/// PDF file decoded with `pdf-extract`.
#[derive(Debug, Clone)]
pub struct PdfFile {
    path: PathBuf,
}

impl PdfFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PageSource for PdfFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_pages(&self) -> Result<Vec<String>> {
        read_pdf_pages(&self.path)
    }
}

/// Pre-extracted text file.
#[derive(Debug, Clone)]
pub struct TextFile {
    path: PathBuf,
}

impl TextFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PageSource for TextFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_pages(&self) -> Result<Vec<String>> {
        read_text_pages(&self.path)
    }
}

/// Open a page source for `path`, resolving [`InputFormat::Auto`].
pub fn open_source(path: &Path, format: InputFormat) -> Result<Box<dyn PageSource>> {
    let resolved = match format {
        InputFormat::Auto => detect_format(path)?,
        other => other,
    };
    Ok(match resolved {
        InputFormat::Text => Box::new(TextFile::new(path)),
        _ => Box::new(PdfFile::new(path)),
    })
}

/// Detect the format from the `%PDF` signature, falling back to the extension.
pub fn detect_format(path: &Path) -> Result<InputFormat> {
    let mut file = fs::File::open(path).map_err(|e| io_error(path, e))?;
    let mut signature = [0u8; 5];
    let read = file.read(&mut signature).map_err(|e| io_error(path, e))?;
    if signature[..read].starts_with(b"%PDF") {
        return Ok(InputFormat::Pdf);
    }
    let is_text = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
    Ok(if is_text {
        InputFormat::Text
    } else {
        InputFormat::Pdf
    })
}

pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| io_error(path, e))
}

pub(crate) fn io_error(path: &Path, source: std::io::Error) -> IngestError {
    if source.kind() == ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        }
    }
}
