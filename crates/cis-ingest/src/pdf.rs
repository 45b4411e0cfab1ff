//! PDF page text extraction.

use std::path::Path;

use lopdf::Document;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};
use crate::source::read_file;

/// Extract text from every page of a PDF file, in page order.
pub fn read_pdf_pages(path: &Path) -> Result<Vec<String>> {
    let bytes = read_file(path)?;
    pdf_pages_from_bytes(path, &bytes)
}

/// Extract page texts from an in-memory PDF.
///
/// `path` is only used for error reporting.
pub fn pdf_pages_from_bytes(path: &Path, bytes: &[u8]) -> Result<Vec<String>> {
    let document = match Document::load_mem(bytes) {
        Ok(document) => document,
        Err(_) if declares_encryption(bytes) => {
            return Err(IngestError::Encrypted {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(IngestError::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            });
        }
    };
    let encrypted = document.is_encrypted();
    let page_count = document.get_pages().len();
    debug!(path = %path.display(), page_count, encrypted, "loaded PDF");

    match pdf_extract::extract_text_from_mem_by_pages(bytes) {
        Ok(pages) => {
            if pages.len() != page_count {
                warn!(
                    path = %path.display(),
                    expected = page_count,
                    extracted = pages.len(),
                    "page count mismatch"
                );
            }
            Ok(pages)
        }
        // Permission-only encryption decrypts with the empty password; anything
        // else surfaces here.
        Err(_) if encrypted => Err(IngestError::Encrypted {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(IngestError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
    }
}

/// True when the trailer names an `/Encrypt` dictionary.
fn declares_encryption(bytes: &[u8]) -> bool {
    bytes.windows(ENCRYPT_KEY.len()).any(|window| window == ENCRYPT_KEY)
}

const ENCRYPT_KEY: &[u8] = b"/Encrypt";
