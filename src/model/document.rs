//! Document-level types.

use super::{BoundingBox, TableRegion};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Placeholder used for metadata fields the source does not provide.
pub const UNKNOWN: &str = "unknown";

/// Origin of a discovered input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// A PDF file (native text or scanned)
    Pdf,
    /// A raster image (png, jpeg, tiff, ...)
    Raster,
}

/// A document moving through the extraction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Source path as discovered
    pub path: PathBuf,

    /// PDF or raster origin
    pub kind: DocumentKind,

    /// File stem of the source path
    pub filename: String,

    /// Number of pages (1 for raster images)
    pub page_count: u32,

    /// Document metadata
    pub metadata: Metadata,

    /// Whether the structural parser allows text extraction
    pub extractable: bool,

    /// OCR-derived PDF that supersedes `path` once populated
    pub ocr_path: Option<PathBuf>,

    /// Extracted paragraphs in reading order
    pub paragraphs: Vec<String>,

    /// Placed images
    pub images: Vec<ImageElement>,

    /// Retained tables
    pub tables: Vec<TableRegion>,

    /// Outline entries as (level, title)
    pub table_of_contents: Vec<TocEntry>,
}

impl Document {
    /// Create a new document handle for a discovered input.
    pub fn new(path: impl Into<PathBuf>, kind: DocumentKind) -> Self {
        let path = path.into();
        let filename = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let page_count = match kind {
            DocumentKind::Pdf => 0,
            DocumentKind::Raster => 1,
        };
        Self {
            path,
            kind,
            filename,
            page_count,
            metadata: Metadata::default(),
            extractable: false,
            ocr_path: None,
            paragraphs: Vec::new(),
            images: Vec::new(),
            tables: Vec::new(),
            table_of_contents: Vec::new(),
        }
    }

    /// Create a PDF document handle.
    pub fn pdf(path: impl Into<PathBuf>) -> Self {
        Self::new(path, DocumentKind::Pdf)
    }

    /// Create a raster image document handle.
    pub fn raster(path: impl Into<PathBuf>) -> Self {
        Self::new(path, DocumentKind::Raster)
    }

    pub fn is_pdf(&self) -> bool {
        self.kind == DocumentKind::Pdf
    }

    /// Artifact used for structural parsing: the OCR output if present.
    pub fn source_path(&self) -> &Path {
        self.ocr_path.as_deref().unwrap_or(&self.path)
    }

    /// Check if nothing has been extracted.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty() && self.tables.is_empty()
    }

    /// Get plain text content of the document.
    pub fn plain_text(&self) -> String {
        self.paragraphs.join("\n\n")
    }

    /// Render the table of contents one entry per line.
    pub fn table_of_contents_text(&self) -> String {
        self.table_of_contents
            .iter()
            .map(|entry| format!("{}: {}", entry.level, entry.title))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Document metadata. Text fields default to [`UNKNOWN`] instead of being absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: String,

    /// Document author
    pub author: String,

    /// Document subject
    pub subject: String,

    /// Creator application
    pub creator: String,

    /// PDF producer
    pub producer: String,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,

    /// PDF version (e.g., "1.7"), empty for raster images
    pub pdf_version: String,

    /// Whether the document is encrypted
    pub encrypted: bool,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: UNKNOWN.to_string(),
            author: UNKNOWN.to_string(),
            subject: UNKNOWN.to_string(),
            creator: UNKNOWN.to_string(),
            producer: UNKNOWN.to_string(),
            created: None,
            modified: None,
            pdf_version: String::new(),
            encrypted: false,
        }
    }
}

impl From<RawMetadata> for Metadata {
    fn from(raw: RawMetadata) -> Self {
        fn or_unknown(value: Option<String>) -> String {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string())
        }

        Self {
            title: or_unknown(raw.title),
            author: or_unknown(raw.author),
            subject: or_unknown(raw.subject),
            creator: or_unknown(raw.creator),
            producer: or_unknown(raw.producer),
            created: raw.created,
            modified: raw.modified,
            pdf_version: raw.pdf_version,
            encrypted: raw.encrypted,
        }
    }
}

impl std::fmt::Display for Metadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Author: {}", self.author)?;
        writeln!(f, "Creator: {}", self.creator)?;
        writeln!(f, "Producer: {}", self.producer)?;
        writeln!(f, "Subject: {}", self.subject)?;
        write!(f, "Title: {}", self.title)
    }
}

/// Metadata exactly as the structural parser reports it.
#[derive(Debug, Clone, Default)]
pub struct RawMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    pub pdf_version: String,
    pub encrypted: bool,
}

/// A single table-of-contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Nesting level (1 = top level)
    pub level: u8,
    /// Entry title
    pub title: String,
}

impl TocEntry {
    pub fn new(level: u8, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
        }
    }
}

/// An image placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageElement {
    /// Page number (1-indexed)
    pub page: u32,
    /// Placement bounds in normalized page space
    pub bbox: BoundingBox,
    /// Resource name of the image
    pub name: String,
}
