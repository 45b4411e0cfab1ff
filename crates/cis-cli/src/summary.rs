use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use cis_cli::ConvertOutcome;
use cis_model::{ExtractionSummary, Level, SegmentIssue};

pub fn print_summary(outcome: &ConvertOutcome) {
    let document = &outcome.extraction.document;
    println!("Benchmark: {}", document.display_title());
    println!("Input: {}", outcome.input.display());
    match &outcome.workbook {
        Some(path) => println!("Workbook: {}", path.display()),
        None => println!("Workbook: not written (dry run)"),
    }
    if let Some(path) = &outcome.json {
        println!("JSON: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Section"),
        header_cell("Name"),
        header_cell("Controls"),
        header_cell("Level 1"),
        header_cell("Level 2"),
        header_cell("Unknown"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let mut totals = [0usize; 4];
    for section in &document.sections {
        let counts = [
            section.recommendations.len(),
            section.count_by_level(Level::Level1),
            section.count_by_level(Level::Level2),
            section.count_by_level(Level::Unknown),
        ];
        for (total, count) in totals.iter_mut().zip(counts) {
            *total += count;
        }
        table.add_row(vec![
            Cell::new(&section.number)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&section.name),
            Cell::new(counts[0]),
            count_cell(Some(counts[1]), Color::Yellow),
            count_cell(Some(counts[2]), Color::Yellow),
            count_cell(Some(counts[3]), Color::Red),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("All sections")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(totals[0]).add_attribute(Attribute::Bold),
        count_cell(Some(totals[1]), Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(Some(totals[2]), Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(Some(totals[3]), Color::Red).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_diagnostics(&outcome.extraction.summary);
    print_issue_table(&outcome.extraction.summary.issues);
}

fn print_diagnostics(summary: &ExtractionSummary) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Diagnostic"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let neutral = [
        ("Pages", summary.total_pages),
        ("First recommendation page", summary.start_page),
        ("Segments", summary.segments),
        ("Recommendations", summary.recommendations),
        ("Group headings", summary.group_headings),
        ("Header/footer lines removed", summary.header_lines_removed),
        ("Hyphenated words joined", summary.hyphen_joins),
    ];
    for (label, count) in neutral {
        table.add_row(vec![Cell::new(label), Cell::new(count)]);
    }
    let flagged = [
        ("Duplicates dropped", summary.duplicates, Color::Yellow),
        ("Malformed segments skipped", summary.skipped, Color::Red),
        ("Low-confidence records", summary.low_confidence, Color::Yellow),
        ("Unresolved fields", summary.unresolved_fields, Color::Yellow),
    ];
    for (label, count, color) in flagged {
        table.add_row(vec![Cell::new(label), count_cell(Some(count), color)]);
    }
    println!();
    println!("Diagnostics:");
    println!("{table}");
}

fn print_issue_table(issues: &[SegmentIssue]) {
    if issues.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Control"),
        header_cell("Kind"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    for issue in issues {
        table.add_row(vec![
            Cell::new(issue.control_number())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            issue_kind_cell(issue),
            Cell::new(issue.to_string()),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
}

fn issue_kind_cell(issue: &SegmentIssue) -> Cell {
    if issue.is_duplicate() {
        Cell::new("DUPLICATE").fg(Color::Yellow)
    } else {
        Cell::new("SKIPPED").fg(Color::Red)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(120);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Percentage(50)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
        ]);
    }
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
