//! Conversion of one benchmark into checklist outputs.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use cis_extract::{Extractor, load_options};
use cis_ingest::{InputFormat, open_source};
use cis_model::{ExtractError, Extraction, ExtractionOptions};
use cis_report::{WorkbookOptions, write_extraction_json, write_workbook};
use tracing::{info, info_span};

/// Suffix appended to the input stem for the default workbook name.
pub const OUTPUT_SUFFIX: &str = "_Audit_Checklist.xlsx";

/// One conversion run.
#[derive(Debug, Clone, Default)]
pub struct ConvertRequest {
    pub input: PathBuf,
    /// Workbook path; derived from the input when absent.
    pub output: Option<PathBuf>,
    pub json: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub input_format: InputFormat,
    pub title: Option<String>,
    /// Extract only, write nothing.
    pub dry_run: bool,
}

/// Result of a conversion run.
#[derive(Debug)]
pub struct ConvertOutcome {
    pub input: PathBuf,
    /// Workbook written, `None` on a dry run.
    pub workbook: Option<PathBuf>,
    pub json: Option<PathBuf>,
    pub extraction: Extraction,
}

/// Default workbook path: `<input_stem>_Audit_Checklist.xlsx` in the current directory.
#[must_use]
pub fn derive_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "benchmark".into(), |stem| stem.to_string_lossy());
    PathBuf::from(format!("{stem}{OUTPUT_SUFFIX}"))
}

/// Load extraction options, using defaults when no file is given.
pub fn load_extraction_options(config: Option<&Path>) -> Result<ExtractionOptions> {
    match config {
        Some(path) => load_options(path).with_context(|| format!("load config {}", path.display())),
        None => Ok(ExtractionOptions::default()),
    }
}

/// Read every page of the input.
pub fn read_pages(input: &Path, format: InputFormat) -> Result<Vec<String>> {
    let source = open_source(input, format).map_err(ExtractError::from)?;
    let pages = source.read_pages().map_err(ExtractError::from)?;
    Ok(pages)
}

/// Load the config, then read, extract and write.
pub fn convert(request: &ConvertRequest) -> Result<ConvertOutcome> {
    let options = load_extraction_options(request.config.as_deref())?;
    let pages = read_pages(&request.input, request.input_format)?;
    convert_pages(request, options, &pages)
}

/// Extract from already-read pages and write the requested outputs.
pub fn convert_pages(
    request: &ConvertRequest,
    options: ExtractionOptions,
    pages: &[String],
) -> Result<ConvertOutcome> {
    let span = info_span!("convert", input = %request.input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let extractor = Extractor::new(options).context("build extractor")?;
    let extraction = extractor
        .extract(pages)
        .with_context(|| format!("extract {}", request.input.display()))?;

    let mut outcome = ConvertOutcome {
        input: request.input.clone(),
        workbook: None,
        json: None,
        extraction,
    };
    if request.dry_run {
        info!(
            recommendations = outcome.extraction.summary.recommendations,
            "dry run, no files written"
        );
        return Ok(outcome);
    }

    let workbook_path = request
        .output
        .clone()
        .unwrap_or_else(|| derive_output_path(&request.input));
    let mut workbook_options = WorkbookOptions::new();
    if let Some(title) = &request.title {
        workbook_options = workbook_options.with_title(title.clone());
    }
    write_workbook(
        &outcome.extraction.document,
        &workbook_path,
        &workbook_options,
    )
    .with_context(|| format!("write workbook {}", workbook_path.display()))?;
    outcome.workbook = Some(workbook_path);

    if let Some(json_path) = &request.json {
        write_extraction_json(json_path, &outcome.extraction)
            .with_context(|| format!("write JSON {}", json_path.display()))?;
        outcome.json = Some(json_path.clone());
    }

    info!(
        recommendations = outcome.extraction.summary.recommendations,
        sections = outcome.extraction.summary.sections,
        duration_ms = start.elapsed().as_millis(),
        "conversion complete"
    );
    Ok(outcome)
}
