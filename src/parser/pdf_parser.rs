//! Structural PDF parsing: page count, metadata, outline and page layouts.

use std::collections::HashSet;
use std::path::Path;

use lopdf::{Dictionary, Object, ObjectId};

use crate::detect::detect_format_from_path;
use crate::error::{Error, Result};
use crate::model::{PageLayout, RawMetadata, TocEntry};

use super::backend::{decode_text_simple, LopdfBackend, PdfBackend};
use super::layout::LayoutAnalyzer;
use super::options::LayoutParams;

/// Opens PDF artifacts for structural inspection.
pub trait StructuralParser: Send + Sync {
    /// Open the PDF at `path`.
    fn open(&self, path: &Path) -> Result<Box<dyn ParsedDocument>>;
}

/// An opened PDF.
pub trait ParsedDocument {
    /// Number of pages.
    fn page_count(&self) -> u32;

    /// Info dictionary values, absent keys left as `None`.
    fn metadata(&self) -> RawMetadata;

    /// Whether text extraction is permitted.
    fn is_extractable(&self) -> bool;

    /// Flattened outline with levels starting at 1.
    ///
    /// Returns [`Error::MissingOutline`] when the document has no outline.
    fn outline(&self) -> Result<Vec<TocEntry>>;

    /// Layout trees of every page, in page order.
    fn page_layouts(&self, params: &LayoutParams) -> Result<Vec<PageLayout>>;
}

/// Default [`StructuralParser`] backed by lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfParser;

impl StructuralParser for LopdfParser {
    fn open(&self, path: &Path) -> Result<Box<dyn ParsedDocument>> {
        Ok(Box::new(PdfParser::open(path)?))
    }
}

/// An opened PDF document.
pub struct PdfParser {
    backend: LopdfBackend,
}

impl PdfParser {
    /// Open a PDF file, verifying its header first.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        detect_format_from_path(path)?;
        let backend = LopdfBackend::load_file(path)?;
        Ok(Self { backend })
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self {
            backend: LopdfBackend::load_bytes(data)?,
        })
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.backend.is_encrypted()
    }

    /// Get PDF version.
    pub fn version(&self) -> String {
        self.backend.version()
    }

    fn doc(&self) -> &lopdf::Document {
        self.backend.raw_doc()
    }

    fn dictionary<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match obj {
            Object::Reference(id) => self.doc().get_dictionary(*id).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Walk an outline sibling chain starting at `first`.
    fn collect_outline(
        &self,
        first: ObjectId,
        level: u8,
        visited: &mut HashSet<ObjectId>,
        entries: &mut Vec<TocEntry>,
    ) {
        let mut next = Some(first);

        while let Some(id) = next.take() {
            if !visited.insert(id) {
                log::debug!("Outline cycle at object {:?}", id);
                return;
            }
            let Ok(item) = self.doc().get_dictionary(id) else {
                return;
            };

            let title = get_string_from_dict(item, b"Title").unwrap_or_default();
            entries.push(TocEntry::new(level, title.trim()));

            if let Ok(child) = item.get(b"First").and_then(Object::as_reference) {
                self.collect_outline(child, level.saturating_add(1), visited, entries);
            }

            next = item.get(b"Next").and_then(Object::as_reference).ok();
        }
    }
}

impl ParsedDocument for PdfParser {
    fn page_count(&self) -> u32 {
        self.backend.pages().len() as u32
    }

    fn metadata(&self) -> RawMetadata {
        let mut metadata = RawMetadata {
            pdf_version: self.version(),
            encrypted: self.is_encrypted(),
            ..Default::default()
        };

        let info = self
            .doc()
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|obj| self.dictionary(obj));

        if let Some(info) = info {
            metadata.title = get_string_from_dict(info, b"Title");
            metadata.author = get_string_from_dict(info, b"Author");
            metadata.subject = get_string_from_dict(info, b"Subject");
            metadata.creator = get_string_from_dict(info, b"Creator");
            metadata.producer = get_string_from_dict(info, b"Producer");
            metadata.created =
                get_string_from_dict(info, b"CreationDate").and_then(|d| parse_pdf_date(&d));
            metadata.modified =
                get_string_from_dict(info, b"ModDate").and_then(|d| parse_pdf_date(&d));
        }

        metadata
    }

    fn is_extractable(&self) -> bool {
        !self.is_encrypted()
    }

    fn outline(&self) -> Result<Vec<TocEntry>> {
        let first = self
            .doc()
            .catalog()
            .ok()
            .and_then(|catalog| catalog.get(b"Outlines").ok())
            .and_then(|obj| self.dictionary(obj))
            .and_then(|outlines| outlines.get(b"First").ok())
            .and_then(|first| first.as_reference().ok())
            .ok_or(Error::MissingOutline)?;

        let mut entries = Vec::new();
        self.collect_outline(first, 1, &mut HashSet::new(), &mut entries);
        Ok(entries)
    }

    fn page_layouts(&self, params: &LayoutParams) -> Result<Vec<PageLayout>> {
        LayoutAnalyzer::new(&self.backend, params.clone()).page_layouts()
    }
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(decode_text_simple(bytes)),
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm').
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:").unwrap_or(s);

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let field = |range: std::ops::Range<usize>, default: u32| {
        s.get(range).and_then(|v| v.parse().ok()).unwrap_or(default)
    };

    chrono::NaiveDate::from_ymd_opt(year, field(4..6, 1), field(6..8, 1))
        .and_then(|date| date.and_hms_opt(field(8..10, 0), field(10..12, 0), field(12..14, 0)))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}
