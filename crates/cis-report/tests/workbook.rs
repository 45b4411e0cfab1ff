//! Integration tests for workbook and JSON output.

use chrono::NaiveDate;
use cis_model::{
    BenchmarkDocument, Extraction, ExtractionSummary, Level, Recommendation, Section,
};
use cis_report::{
    ReportError, WorkbookOptions, extraction_json, write_extraction_json, write_workbook,
};

fn document() -> BenchmarkDocument {
    let mut cramfs = Recommendation::new("1.1.1", "Ensure cramfs is disabled");
    cramfs.level = Level::Level1;
    cramfs.description = "The cramfs filesystem type is compressed.".to_string();
    cramfs.audit_cli = "# modprobe -n -v cramfs".to_string();
    cramfs.references = vec!["https://example.com/cramfs".to_string()];

    let mut xinetd = Recommendation::new("2.1", "Ensure xinetd is not installed");
    xinetd.level = Level::Level2;

    BenchmarkDocument {
        title: "CIS Example Linux Benchmark".to_string(),
        version: "v1.2.0".to_string(),
        sections: vec![
            Section {
                number: "1".to_string(),
                name: "Initial Setup".to_string(),
                recommendations: vec![cramfs],
            },
            Section {
                number: "2".to_string(),
                name: "Services: Daemons".to_string(),
                recommendations: vec![xinetd],
            },
        ],
    }
}

fn options() -> WorkbookOptions {
    WorkbookOptions::new().with_generated_on(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
}

#[test]
fn workbook_is_written_as_zip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checklist.xlsx");

    write_workbook(&document(), &path, &options()).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"PK"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn workbook_with_no_sections_has_index_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.xlsx");
    write_workbook(&BenchmarkDocument::default(), &path, &options()).unwrap();
    assert!(path.exists());
}

#[test]
fn missing_output_directory_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("checklist.xlsx");

    let err = write_workbook(&document(), &path, &options()).unwrap_err();
    assert!(matches!(err, ReportError::Io { .. }));
    assert!(!path.exists());
}

#[test]
fn json_export_round_trips_document() {
    let extraction = Extraction {
        document: document(),
        summary: ExtractionSummary {
            total_pages: 4,
            recommendations: 2,
            ..ExtractionSummary::default()
        },
    };
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checklist.json");
    write_extraction_json(&path, &extraction).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["schema"], "cis-checklist.extraction");
    assert_eq!(value["schema_version"], 1);
    assert_eq!(value["summary"]["total_pages"], 4);

    let parsed: BenchmarkDocument = serde_json::from_value(value["document"].clone()).unwrap();
    assert_eq!(parsed, extraction.document);
}

#[test]
fn json_text_is_pretty_printed() {
    let extraction = Extraction {
        document: document(),
        summary: ExtractionSummary::default(),
    };
    let json = extraction_json(&extraction).unwrap();
    assert!(json.contains("\n  \"schema\": \"cis-checklist.extraction\""));
}
