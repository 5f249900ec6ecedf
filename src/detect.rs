//! Input classification: PDF header sniffing and extension-based document kinds.

use crate::error::{Error, Result};
use crate::model::DocumentKind;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// PDF format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFormat {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
}

impl std::fmt::Display for PdfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Raster image extensions accepted as OCR input (lowercase, without dot).
pub const RASTER_EXTENSIONS: &[&str] = &[
    "bmp", "jpg", "pbm", "pgm", "ppm", "jpeg", "jpe", "jp2", "tiff", "tif", "png",
];

/// Classify a path by its extension, case-insensitively.
///
/// Returns `None` for anything that is neither a PDF nor a supported raster image.
///
/// ```
/// use pdfsearch::detect::kind_from_path;
/// use pdfsearch::model::DocumentKind;
///
/// assert_eq!(kind_from_path("scan.TIF"), Some(DocumentKind::Raster));
/// assert_eq!(kind_from_path("report.pdf"), Some(DocumentKind::Pdf));
/// assert_eq!(kind_from_path("notes.txt"), None);
/// ```
pub fn kind_from_path<P: AsRef<Path>>(path: P) -> Option<DocumentKind> {
    let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
    if ext == "pdf" {
        Some(DocumentKind::Pdf)
    } else if RASTER_EXTENSIONS.contains(&ext.as_str()) {
        Some(DocumentKind::Raster)
    } else {
        None
    }
}

/// Detect PDF format from a file path.
///
/// # Returns
/// * `Ok(PdfFormat)` if the file is a valid PDF
/// * `Err(Error::UnknownFormat)` if the file is not a PDF
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<PdfFormat> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; 16];
    let read = reader.read(&mut header)?;
    detect_format_from_bytes(&header[..read])
}

/// Detect PDF format from bytes.
///
/// `data` must hold at least the first 8 bytes of the file.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PdfFormat> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN {
        return Err(Error::UnknownFormat);
    }

    if !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfFormat { version })
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

/// Check if a file is a valid PDF.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}
