//! Tesseract command line engine.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

use super::{run_tool, OcrEngine};

/// [`OcrEngine`] backed by the `tesseract` executable.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
    tessdata_dir: Option<PathBuf>,
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            tessdata_dir: None,
        }
    }
}

impl TesseractEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific tesseract executable.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Pass `--tessdata-dir` to every invocation.
    pub fn with_tessdata_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.tessdata_dir = dir;
        self
    }

    /// Check whether the executable can be started.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary).arg("--version").output().is_ok()
    }

    fn command(&self, image: &Path, output_base: &Path, languages: &str, psm: u8) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg(image)
            .arg(output_base)
            .arg("-l")
            .arg(languages)
            .arg("--psm")
            .arg(psm.to_string());
        if let Some(dir) = &self.tessdata_dir {
            command.arg("--tessdata-dir").arg(dir);
        }
        command
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize_text(&self, image: &Path, languages: &str, page_segmentation: u8) -> Result<String> {
        let output = run_tool(
            &mut self.command(image, Path::new("stdout"), languages, page_segmentation),
            "tesseract",
        )?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn recognize_to_pdf(
        &self,
        image: &Path,
        language: &str,
        page_segmentation: u8,
        output: &Path,
    ) -> Result<()> {
        // tesseract appends ".pdf" to the output base itself
        let base = output.with_extension("");
        let mut command = self.command(image, &base, language, page_segmentation);
        command.arg("pdf");
        run_tool(&mut command, "tesseract")?;

        let produced = base.with_extension("pdf");
        if produced != output {
            std::fs::rename(&produced, output)?;
        }
        if !output.exists() {
            return Err(Error::OcrOperationFailed(format!(
                "tesseract produced no PDF for {}",
                image.display()
            )));
        }
        Ok(())
    }
}
