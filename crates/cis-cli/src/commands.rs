use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::Result;
use comfy_table::{Cell, Table};
use indicatif::{ProgressBar, ProgressStyle};

use cis_cli::{ConvertOutcome, ConvertRequest, convert_pages, load_extraction_options, read_pages};
use cis_extract::{BUILTIN_SECTION_NAMES, SectionNames};

use crate::cli::{ConvertArgs, SectionsArgs};
use crate::summary::{apply_table_style, dim_cell, header_cell};

pub fn run_convert(args: &ConvertArgs) -> Result<ConvertOutcome> {
    let request = ConvertRequest {
        input: args.input.clone(),
        output: args.output_path(),
        json: args.json.clone(),
        config: args.config.clone(),
        input_format: args.input_format.into(),
        title: args.title.clone(),
        dry_run: args.dry_run,
    };

    let options = load_extraction_options(request.config.as_deref())?;
    let spinner = spinner(&format!("Reading {}", request.input.display()));
    let pages = read_pages(&request.input, request.input_format);
    spinner.finish_and_clear();
    convert_pages(&request, options, &pages?)
}

pub fn run_sections(args: &SectionsArgs) -> Result<()> {
    let options = load_extraction_options(args.config.as_deref())?;
    let names = SectionNames::new(options.section_names.clone());

    let mut numbers: Vec<String> = BUILTIN_SECTION_NAMES
        .iter()
        .map(|(number, _)| (*number).to_string())
        .collect();
    for number in options.section_names.keys() {
        if !numbers.contains(number) {
            numbers.push(number.clone());
        }
    }
    numbers.sort_by_key(|number| (number.parse::<u64>().unwrap_or(u64::MAX), number.clone()));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Section"),
        header_cell("Name"),
        header_cell("Source"),
    ]);
    apply_table_style(&mut table);
    for number in numbers {
        let source = if options.section_names.contains_key(&number) {
            Cell::new("config")
        } else {
            dim_cell("built-in")
        };
        table.add_row(vec![Cell::new(&number), Cell::new(names.resolve(&number)), source]);
    }
    println!("{table}");
    Ok(())
}

/// Spinner on stderr, hidden when stderr is not a terminal.
fn spinner(message: &str) -> ProgressBar {
    if !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]") {
        spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
