//! OCR: engine contract, page rasterization and language detection.
//!
//! The default engine and rasterizer drive the `tesseract` and `pdftoppm`
//! command line tools. Failing to start either tool, or either tool failing
//! on a page, is reported with the fatal OCR error variants.

mod language;
mod raster;
mod tesseract;

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::error::{Error, Result};

pub use language::{detect_language, resolve_language};
pub use raster::{PageRasterizer, PdftoppmRasterizer};
pub use tesseract::TesseractEngine;

/// Contract for an OCR engine.
pub trait OcrEngine: Send + Sync {
    /// Recognize the plain text of an image.
    ///
    /// `languages` uses the engine's `+`-joined notation (e.g. `eng+slv`).
    fn recognize_text(&self, image: &Path, languages: &str, page_segmentation: u8) -> Result<String>;

    /// Recognize an image into a searchable single-page PDF written to `output`.
    fn recognize_to_pdf(
        &self,
        image: &Path,
        language: &str,
        page_segmentation: u8,
        output: &Path,
    ) -> Result<()>;
}

/// OCR configuration.
#[derive(Debug, Clone)]
pub struct OcrOptions {
    /// Directory holding trained language data; `None` uses the engine default
    pub tessdata_dir: Option<PathBuf>,

    /// Page segmentation mode used for the searchable PDF pass
    pub page_segmentation: u8,

    /// Page segmentation mode used for language detection
    pub detection_segmentation: u8,

    /// Languages loaded for the language detection pass
    pub detection_languages: String,

    /// Languages the OCR pass may be run with
    pub supported_languages: Vec<String>,

    /// Language used when detection yields an unsupported one
    pub default_language: String,
}

impl OcrOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tessdata directory.
    pub fn with_tessdata_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tessdata_dir = Some(dir.into());
        self
    }

    /// Set the page segmentation mode for the PDF pass.
    pub fn with_page_segmentation(mut self, psm: u8) -> Self {
        self.page_segmentation = psm;
        self
    }

    /// Replace the supported languages and the fallback language.
    pub fn with_languages<I, S>(mut self, supported: I, default: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_languages = supported.into_iter().map(Into::into).collect();
        self.default_language = default.into();
        self.detection_languages = self.supported_languages.join("+");
        self
    }
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            tessdata_dir: None,
            page_segmentation: 1,
            detection_segmentation: 6,
            detection_languages: "eng+slv".to_string(),
            supported_languages: vec!["eng".to_string(), "slv".to_string()],
            default_language: "eng".to_string(),
        }
    }
}

/// Run an external tool, mapping launch and exit failures to OCR errors.
fn run_tool(command: &mut Command, tool: &str) -> Result<Output> {
    log::debug!("Running {:?}", command);

    let output = command
        .output()
        .map_err(|e| Error::OcrEngineUnavailable(format!("failed to run {}: {}", tool, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::OcrOperationFailed(format!(
            "{} exited with {}: {}",
            tool,
            output.status,
            stderr.trim()
        )));
    }

    Ok(output)
}
