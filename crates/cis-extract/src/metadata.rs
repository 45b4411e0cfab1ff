//! Benchmark title and version detection from the front pages.

use std::sync::LazyLock;

use regex::Regex;

/// `CIS <name> Benchmark`, with the name capped so running prose is not taken.
static TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bCIS\s+(\S(?:.{0,98}?\S)?)\s+Benchmark\b").expect("Invalid title regex")
});

/// `v2.0.0` or `Version 2.0.0`.
static VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:v|version\s*)(\d+\.\d+(?:\.\d+)*)\b").expect("Invalid version regex")
});

/// Best-effort document metadata. Empty strings when undetected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BenchmarkMetadata {
    pub title: String,
    pub version: String,
}

/// Scan the first `scan_pages` raw pages for title and version.
///
/// The first page carrying a title wins. The version prefers a token after
/// the title on that page, then the first token anywhere in the window.
pub fn detect_metadata(pages: &[String], scan_pages: usize) -> BenchmarkMetadata {
    let window: Vec<String> = pages
        .iter()
        .take(scan_pages)
        .map(|page| page.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect();

    let mut metadata = BenchmarkMetadata::default();
    for page in &window {
        if let Some(captures) = TITLE.captures(page)
            && let (Some(whole), Some(name)) = (captures.get(0), captures.get(1))
        {
            metadata.title = format!("CIS {} Benchmark", name.as_str().trim());
            if let Some(version) = first_version(&page[whole.end()..]) {
                metadata.version = version;
            }
            break;
        }
    }

    if metadata.version.is_empty()
        && let Some(version) = window.iter().find_map(|page| first_version(page))
    {
        metadata.version = version;
    }
    metadata
}

fn first_version(text: &str) -> Option<String> {
    VERSION
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|number| format!("v{}", number.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn detects_title_and_version_on_cover() {
        let meta = detect_metadata(
            &pages(&["CIS Ubuntu Linux 22.04 LTS\nBenchmark\nv2.0.0 - 06-28-2024"]),
            5,
        );
        assert_eq!(meta.title, "CIS Ubuntu Linux 22.04 LTS Benchmark");
        assert_eq!(meta.version, "v2.0.0");
    }

    #[test]
    fn version_may_precede_title_page() {
        let meta = detect_metadata(
            &pages(&["Version 1.1.0", "Terms of use", "CIS Apache Tomcat 9 Benchmark"]),
            5,
        );
        assert_eq!(meta.title, "CIS Apache Tomcat 9 Benchmark");
        assert_eq!(meta.version, "v1.1.0");
    }

    #[test]
    fn scan_window_is_respected() {
        let meta = detect_metadata(
            &pages(&["cover", "legal", "CIS Debian Benchmark v1.0.0"]),
            2,
        );
        assert_eq!(meta, BenchmarkMetadata::default());
    }

    #[test]
    fn missing_metadata_is_empty() {
        let meta = detect_metadata(&pages(&["1.1 Ensure X"]), 5);
        assert!(meta.title.is_empty());
        assert!(meta.version.is_empty());
    }
}
