//! Error types for the pdfsearch library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfsearch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while discovering, extracting or searching documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The discovery path does not exist.
    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The structural parser refused text extraction for this document.
    #[error("Document is not extractable: {}", .0.display())]
    NotExtractable(PathBuf),

    /// The document has no outline (bookmarks).
    #[error("Document has no outline")]
    MissingOutline,

    /// The OCR engine could not be started at all.
    #[error("OCR engine unavailable: {0}")]
    OcrEngineUnavailable(String),

    /// The OCR engine ran but failed on a page.
    #[error("OCR operation failed: {0}")]
    OcrOperationFailed(String),

    /// Error decoding or encoding raster images.
    #[error("Image error: {0}")]
    Image(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Search combinator is neither an AND nor an OR spelling.
    #[error("Invalid search combinator: {0:?} (expected \"and\" or \"or\")")]
    InvalidSearchCombinator(String),

    /// Search query could not be built.
    #[error("Invalid search query: {0}")]
    InvalidSearchQuery(String),

    /// Error while rendering a report.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error must stop the whole batch rather than a single document.
    ///
    /// OCR availability is a process-wide precondition, so both OCR failures are fatal.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::OcrEngineUnavailable(_) | Error::OcrOperationFailed(_)
        )
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Error::Io(e),
            _ => Error::Image(err.to_string()),
        }
    }
}
