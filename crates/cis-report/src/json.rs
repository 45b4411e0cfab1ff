//! JSON export of an extraction.

use std::path::Path;

use chrono::Utc;
use cis_model::{BenchmarkDocument, Extraction, ExtractionSummary};
use serde::Serialize;
use tracing::info;

use crate::atomic::write_atomically;
use crate::error::Result;

const EXTRACTION_SCHEMA: &str = "cis-checklist.extraction";
const EXTRACTION_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct ExtractionPayload<'a> {
    schema: &'static str,
    schema_version: u32,
    generated_at: String,
    document: &'a BenchmarkDocument,
    summary: &'a ExtractionSummary,
}

/// Serialize the document and summary as pretty JSON.
pub fn extraction_json(extraction: &Extraction) -> Result<String> {
    let payload = ExtractionPayload {
        schema: EXTRACTION_SCHEMA,
        schema_version: EXTRACTION_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        document: &extraction.document,
        summary: &extraction.summary,
    };
    Ok(serde_json::to_string_pretty(&payload)?)
}

/// Write [`extraction_json`] to `path`.
pub fn write_extraction_json(path: &Path, extraction: &Extraction) -> Result<()> {
    let json = extraction_json(extraction)?;
    write_atomically(path, format!("{json}\n").as_bytes())?;
    info!(path = %path.display(), "extraction JSON written");
    Ok(())
}
