//! XLSX rendering of a benchmark document.

use std::path::Path;
use std::time::Instant;

use cis_model::{BenchmarkDocument, Section};
use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, FormatUnderline, Url, Workbook, Worksheet,
};
use tracing::{info, info_span};

use crate::atomic::write_atomically;
use crate::error::Result;
use crate::options::WorkbookOptions;
use crate::rows::{
    INDEX_COLUMN_WIDTHS, INDEX_HEADERS, INDEX_SHEET_NAME, SECTION_COLUMN_WIDTHS,
    SECTION_HEADERS, checklist_row, index_rows, index_subtitle, section_sheet_names, sheet_link,
};

const TITLE_FILL: u32 = 0x002060;
const SECTION_TITLE_FILL: u32 = 0x00518F;
const HEADER_FILL: u32 = 0x4472C4;

/// First data row of the index sheet (below title, subtitle, spacer and header).
const INDEX_FIRST_ROW: u32 = 4;
/// First data row of a section sheet (below title and header).
const SECTION_FIRST_ROW: u32 = 2;

struct Styles {
    title: Format,
    section_title: Format,
    subtitle: Format,
    header: Format,
    index_cell: Format,
    link: Format,
    body: Format,
}

impl Styles {
    fn new() -> Self {
        let header = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(HEADER_FILL))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_border(FormatBorder::Thin);
        let index_cell = Format::new()
            .set_font_size(10)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin);
        Self {
            title: Format::new()
                .set_bold()
                .set_font_size(16)
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(TITLE_FILL))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            section_title: Format::new()
                .set_bold()
                .set_font_size(14)
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(SECTION_TITLE_FILL))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            subtitle: Format::new()
                .set_italic()
                .set_font_size(11)
                .set_align(FormatAlign::Center),
            link: index_cell
                .clone()
                .set_font_color(Color::RGB(0x0563C1))
                .set_underline(FormatUnderline::Single),
            header,
            index_cell,
            body: Format::new()
                .set_font_size(9)
                .set_align(FormatAlign::Top)
                .set_text_wrap()
                .set_border(FormatBorder::Thin),
        }
    }

    fn level(&self, fill: Option<u32>) -> Format {
        match fill {
            Some(rgb) => self.body.clone().set_bold().set_background_color(Color::RGB(rgb)),
            None => self.body.clone(),
        }
    }
}

/// Render `document` and write it to `path`.
pub fn write_workbook(
    document: &BenchmarkDocument,
    path: &Path,
    options: &WorkbookOptions,
) -> Result<()> {
    info_span!("workbook", path = %path.display()).in_scope(|| -> Result<()> {
        let start = Instant::now();
        let mut workbook = build_workbook(document, options)?;
        let bytes = workbook.save_to_buffer()?;
        write_atomically(path, &bytes)?;
        info!(
            sections = document.sections.len(),
            recommendations = document.recommendation_count(),
            bytes = bytes.len(),
            duration_ms = start.elapsed().as_millis(),
            "workbook written"
        );
        Ok(())
    })
}

/// Build the in-memory workbook: an index sheet then one sheet per section.
pub fn build_workbook(document: &BenchmarkDocument, options: &WorkbookOptions) -> Result<Workbook> {
    let styles = Styles::new();
    let title = options
        .title
        .clone()
        .unwrap_or_else(|| document.display_title());
    let sheet_names = section_sheet_names(&document.sections);

    let mut workbook = Workbook::new();
    write_index(
        workbook.add_worksheet(),
        document,
        &sheet_names,
        &title,
        options,
        &styles,
    )?;
    for (section, sheet_name) in document.sections.iter().zip(&sheet_names) {
        write_section(
            workbook.add_worksheet(),
            section,
            sheet_name,
            &title,
            options,
            &styles,
        )?;
    }
    Ok(workbook)
}

fn write_index(
    sheet: &mut Worksheet,
    document: &BenchmarkDocument,
    sheet_names: &[String],
    title: &str,
    options: &WorkbookOptions,
    styles: &Styles,
) -> Result<()> {
    let last_col = (INDEX_HEADERS.len() - 1) as u16;
    sheet.set_name(INDEX_SHEET_NAME)?;

    sheet.merge_range(0, 0, 0, last_col, title, &styles.title)?;
    sheet.set_row_height(0, 40)?;
    sheet.merge_range(
        1,
        0,
        1,
        last_col,
        &index_subtitle(options.generated_on),
        &styles.subtitle,
    )?;
    sheet.set_row_height(1, 25)?;

    let header_row = INDEX_FIRST_ROW - 1;
    for (col, header) in (0u16..).zip(INDEX_HEADERS) {
        sheet.write_string_with_format(header_row, col, header, &styles.header)?;
    }
    for (col, width) in (0u16..).zip(INDEX_COLUMN_WIDTHS) {
        sheet.set_column_width(col, width)?;
    }

    for (row, entry) in (INDEX_FIRST_ROW..).zip(index_rows(document, sheet_names)) {
        sheet.write_string_with_format(row, 0, &entry.section, &styles.index_cell)?;
        sheet.write_string_with_format(row, 1, &entry.name, &styles.index_cell)?;
        sheet.write_number_with_format(row, 2, entry.control_count as f64, &styles.index_cell)?;
        let link = Url::new(sheet_link(&entry.sheet)).set_text(&entry.sheet);
        sheet.write_url_with_format(row, 3, link, &styles.link)?;
        sheet.set_row_height(row, 30)?;
    }
    sheet.set_freeze_panes(INDEX_FIRST_ROW, 0)?;
    Ok(())
}

fn write_section(
    sheet: &mut Worksheet,
    section: &Section,
    sheet_name: &str,
    title: &str,
    options: &WorkbookOptions,
    styles: &Styles,
) -> Result<()> {
    let last_col = (SECTION_HEADERS.len() - 1) as u16;
    sheet.set_name(sheet_name)?;

    let heading = format!("{title} - Section {}: {}", section.number, section.name);
    sheet.merge_range(0, 0, 0, last_col, &heading, &styles.section_title)?;
    sheet.set_row_height(0, 35)?;

    let header_row = SECTION_FIRST_ROW - 1;
    for (col, header) in (0u16..).zip(SECTION_HEADERS) {
        sheet.write_string_with_format(header_row, col, header, &styles.header)?;
    }
    sheet.set_row_height(header_row, 40)?;
    for (col, width) in (0u16..).zip(SECTION_COLUMN_WIDTHS) {
        sheet.set_column_width(col, width)?;
    }

    let mut last_row = header_row;
    for (row, rec) in (SECTION_FIRST_ROW..).zip(&section.recommendations) {
        let cells = checklist_row(rec);
        let level_format = styles.level(options.level_colors.for_level(rec.level));
        for (col, text) in (0u16..).zip(cells.cells()) {
            let format = if col == 2 { &level_format } else { &styles.body };
            sheet.write_string_with_format(row, col, text, format)?;
        }
        sheet.set_row_height(row, cells.height())?;
        last_row = row;
    }

    sheet.set_freeze_panes(SECTION_FIRST_ROW, 0)?;
    sheet.autofilter(header_row, 0, last_row, last_col)?;
    Ok(())
}
