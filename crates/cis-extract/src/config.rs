//! Loading extraction options from a TOML file.
//!
//! ```toml
//! metadata_scan_pages = 3
//! header_repeat_threshold = 4
//!
//! [section_names]
//! 1 = "Initial Setup"
//! 6 = "System Maintenance"
//!
//! [[label_patterns]]
//! field = "audit"
//! pattern = '^(?:Audit|Verification)\s*:'
//! ```

use std::path::{Path, PathBuf};

use cis_model::ExtractionOptions;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Read extraction options. Missing keys take their defaults.
pub fn load_options(path: &Path) -> Result<ExtractionOptions, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_options(&contents).map_err(|e| ConfigError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Parse extraction options from TOML text.
pub fn parse_options(contents: &str) -> Result<ExtractionOptions, toml::de::Error> {
    toml::from_str(contents)
}

#[cfg(test)]
mod tests {
    use cis_model::FieldName;

    use super::*;

    #[test]
    fn parses_partial_config() {
        let options = parse_options(
            r#"
metadata_scan_pages = 3

[section_names]
1 = "Setup"

[[label_patterns]]
field = "audit"
pattern = '^Verification\s*:'
"#,
        )
        .expect("parse");
        assert_eq!(options.metadata_scan_pages, 3);
        assert_eq!(options.header_repeat_threshold, 3);
        assert_eq!(options.section_names.get("1").map(String::as_str), Some("Setup"));
        assert_eq!(options.pattern_for(FieldName::Audit), r"^Verification\s*:");
        assert!(options.infer_section_names);
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(parse_options("").expect("parse"), ExtractionOptions::default());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_options(&dir.path().join("absent.toml")).expect_err("missing");
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn unknown_field_name_is_rejected() {
        let err = parse_options("[[label_patterns]]\nfield = \"summary\"\npattern = \"x\"\n");
        assert!(err.is_err());
    }
}
