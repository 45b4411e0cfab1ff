//! Workbook rendering options.

use chrono::{Local, NaiveDate};
use cis_model::Level;

/// Fill colors for Level cells, as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelColors {
    pub level1: Option<u32>,
    pub level2: Option<u32>,
    pub unknown: Option<u32>,
}

impl Default for LevelColors {
    fn default() -> Self {
        Self {
            level1: Some(0xFFC000),
            level2: Some(0xFFFF00),
            unknown: None,
        }
    }
}

impl LevelColors {
    #[must_use]
    pub fn for_level(&self, level: Level) -> Option<u32> {
        match level {
            Level::Level1 => self.level1,
            Level::Level2 => self.level2,
            Level::Unknown => self.unknown,
        }
    }
}

/// Options for workbook output.
#[derive(Debug, Clone)]
pub struct WorkbookOptions {
    /// Replaces the detected benchmark title in sheet title rows.
    pub title: Option<String>,
    /// Date printed in the index subtitle.
    pub generated_on: NaiveDate,
    pub level_colors: LevelColors,
}

impl Default for WorkbookOptions {
    fn default() -> Self {
        Self {
            title: None,
            generated_on: Local::now().date_naive(),
            level_colors: LevelColors::default(),
        }
    }
}

impl WorkbookOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_generated_on(mut self, date: NaiveDate) -> Self {
        self.generated_on = date;
        self
    }

    #[must_use]
    pub fn with_level_colors(mut self, colors: LevelColors) -> Self {
        self.level_colors = colors;
        self
    }
}
