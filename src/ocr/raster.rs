//! Rendering PDF pages to raster images.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::DynamicImage;

use crate::error::{Error, Result};

use super::run_tool;

/// Contract for rendering a single PDF page to an image.
pub trait PageRasterizer: Send + Sync {
    /// Render page `page` (1-indexed) of `pdf` at `dpi`.
    ///
    /// `workdir` is a scratch directory the implementation may write into.
    fn rasterize(&self, pdf: &Path, page: u32, dpi: u32, workdir: &Path) -> Result<DynamicImage>;
}

/// [`PageRasterizer`] backed by poppler's `pdftoppm`.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    binary: PathBuf,
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("pdftoppm"),
        }
    }
}

impl PdftoppmRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific pdftoppm executable.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    fn command(&self, pdf: &Path, page: u32, dpi: u32, prefix: &Path) -> Command {
        let page = page.to_string();
        let mut command = Command::new(&self.binary);
        command
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-png")
            .arg("-f")
            .arg(&page)
            .arg("-l")
            .arg(&page)
            .arg("-singlefile")
            .arg(pdf)
            .arg(prefix);
        command
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    fn rasterize(&self, pdf: &Path, page: u32, dpi: u32, workdir: &Path) -> Result<DynamicImage> {
        let prefix = workdir.join(format!("raster-{}", page));
        run_tool(&mut self.command(pdf, page, dpi, &prefix), "pdftoppm")?;

        // -singlefile writes exactly "<prefix>.png"
        let output = prefix.with_extension("png");
        if !output.exists() {
            return Err(Error::OcrOperationFailed(format!(
                "pdftoppm produced no image for page {} of {}",
                page,
                pdf.display()
            )));
        }
        Ok(image::open(&output)?)
    }
}
