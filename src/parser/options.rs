//! Layout and table detection options.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};

use super::table_detector::TableDetectorConfig;

/// Options for layout analysis.
#[derive(Debug, Clone)]
pub struct LayoutParams {
    /// Maximum vertical gap between two lines of the same block, as a
    /// fraction of the line's font size.
    pub line_margin: f32,

    /// Split two-column pages into one container per column
    pub detect_columns: bool,
}

impl LayoutParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line margin.
    pub fn with_line_margin(mut self, margin: f32) -> Self {
        self.line_margin = margin.max(0.0);
        self
    }

    /// Enable or disable column detection.
    pub fn with_columns(mut self, detect: bool) -> Self {
        self.detect_columns = detect;
        self
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            line_margin: 0.8,
            detect_columns: true,
        }
    }
}

/// Options for table extraction.
#[derive(Debug, Clone, Default)]
pub struct TableParams {
    /// Pages to scan for tables
    pub pages: PageSelection,

    /// Stream-mode detector configuration
    pub detector: TableDetectorConfig,
}

impl TableParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set the detector configuration.
    pub fn with_detector(mut self, detector: TableDetectorConfig) -> Self {
        self.detector = detector;
        self
    }
}

/// Page selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "all", "1-10", "1,3,5-7").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        let invalid = || Error::InvalidPageRange(s.to_string());
        let page = |p: &str| -> Result<u32> {
            match p.trim().parse::<u32>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(invalid()),
            }
        };

        if !s.contains(',') {
            if let Some((start, end)) = s.split_once('-') {
                let (start, end) = (page(start)?, page(end)?);
                if start > end {
                    return Err(invalid());
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let (start, end) = match part.split_once('-') {
                Some((start, end)) => (page(start)?, page(end)?),
                None => {
                    let p = page(part)?;
                    (p, p)
                }
            };
            if start > end {
                return Err(invalid());
            }
            for p in start..=end {
                if !pages.contains(&p) {
                    pages.push(p);
                }
            }
        }
        pages.sort_unstable();

        Ok(PageSelection::Pages(pages))
    }
}

impl std::str::FromStr for PageSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
