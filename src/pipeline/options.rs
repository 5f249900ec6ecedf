//! Pipeline configuration.

use std::path::PathBuf;

use crate::ocr::OcrOptions;
use crate::parser::{LayoutParams, TableParams};
use crate::preprocess::PreprocessOptions;

/// Default rasterization resolution for OCR.
pub const DEFAULT_DPI: u32 = 300;

/// Options shared by every stage of a batch run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Detect tables and search them
    pub extract_tables: bool,

    /// Process documents (and OCR pages) in parallel
    pub parallel: bool,

    /// Rasterization resolution for the OCR fallback
    pub dpi: u32,

    /// Parent directory of the run's scratch area; `None` uses the system temp dir
    pub scratch_root: Option<PathBuf>,

    /// Layout analysis parameters
    pub layout: LayoutParams,

    /// Table extraction parameters
    pub tables: TableParams,

    /// OCR configuration
    pub ocr: OcrOptions,

    /// Image preprocessing configuration
    pub preprocess: PreprocessOptions,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            extract_tables: true,
            parallel: true,
            dpi: DEFAULT_DPI,
            scratch_root: None,
            layout: LayoutParams::default(),
            tables: TableParams::default(),
            ocr: OcrOptions::default(),
            preprocess: PreprocessOptions::default(),
        }
    }
}

impl PipelineOptions {
    /// Create new pipeline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable table extraction.
    pub fn with_tables(mut self, extract: bool) -> Self {
        self.extract_tables = extract;
        self
    }

    /// Process documents one after another.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the rasterization resolution.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Place the scratch area under `root`.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Set layout parameters.
    pub fn with_layout(mut self, layout: LayoutParams) -> Self {
        self.layout = layout;
        self
    }

    /// Set table extraction parameters.
    pub fn with_table_params(mut self, tables: TableParams) -> Self {
        self.tables = tables;
        self
    }

    /// Set OCR options.
    pub fn with_ocr(mut self, ocr: OcrOptions) -> Self {
        self.ocr = ocr;
        self
    }

    /// Set preprocessing options.
    pub fn with_preprocess(mut self, preprocess: PreprocessOptions) -> Self {
        self.preprocess = preprocess;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = PipelineOptions::default();
        assert!(options.extract_tables);
        assert!(options.parallel);
        assert_eq!(options.dpi, 300);
        assert!(options.scratch_root.is_none());
        assert_eq!(options.layout.line_margin, 0.8);
    }

    #[test]
    fn test_builder() {
        let options = PipelineOptions::new()
            .with_tables(false)
            .sequential()
            .with_dpi(150)
            .with_scratch_root("/var/tmp");
        assert!(!options.extract_tables);
        assert!(!options.parallel);
        assert_eq!(options.dpi, 150);
        assert_eq!(options.scratch_root, Some(PathBuf::from("/var/tmp")));
    }
}
