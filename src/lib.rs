//! # pdfsearch
//!
//! Text and table extraction from PDFs and scanned images, with an OCR
//! fallback and multi-term fuzzy search over the extracted content.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfsearch::{Combinator, PdfSearch, SearchQuery};
//!
//! fn main() -> pdfsearch::Result<()> {
//!     let query = SearchQuery::parse("revenue,forecast", Combinator::All)?;
//!
//!     let results = PdfSearch::new()
//!         .with_tessdata("/usr/share/tessdata")
//!         .run("./reports", &query)?;
//!
//!     for doc in &results.matches {
//!         println!("{}: {} paragraph(s)", doc.path.display(), doc.paragraphs.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Discovery**: PDFs and raster images found under a path
//! - **Native extraction**: layout analysis and stream-mode table detection via lopdf
//! - **OCR fallback**: pages rasterized, denoised, binarized and deskewed,
//!   then recognized into a searchable PDF
//! - **Reconciliation**: text covered by a detected table is not reported twice
//! - **Search**: fuzzy AND/OR matching over sentences and table columns
//! - **Parallel processing**: documents and OCR pages run on Rayon

pub mod detect;
pub mod discover;
pub mod error;
pub mod model;
pub mod ocr;
pub mod parser;
pub mod pipeline;
pub mod preprocess;
pub mod reconcile;
pub mod render;
pub mod search;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, PdfFormat};
pub use discover::find_documents;
pub use error::{Error, Result};
pub use model::{
    BoundingBox, Document, DocumentKind, ImageElement, LayoutElement, Metadata, PageLayout,
    TableCell, TableRegion, TableRow, TocEntry,
};
pub use ocr::{OcrEngine, OcrOptions, PageRasterizer};
pub use parser::{
    LayoutParams, PageSelection, PdfParser, StructuralParser, TableExtractor, TableParams,
};
pub use pipeline::{
    BatchReport, BatchRunner, Collaborators, DocumentOutcome, ExtractionState, PipelineOptions,
};
pub use preprocess::PreprocessOptions;
pub use render::{to_html, write_summary, JsonFormat};
pub use search::{Combinator, DocumentMatches, FuzzyScorer, SearchMatcher, SearchQuery};

use std::path::{Path, PathBuf};

use parser::ParsedDocument;

/// Read the structure of a PDF without extracting content.
///
/// Fills page count, metadata, extractability and the table of contents.
/// A missing outline leaves the table of contents empty.
///
/// # Example
///
/// ```no_run
/// let doc = pdfsearch::inspect("document.pdf").unwrap();
/// println!("{}", doc.metadata);
/// ```
pub fn inspect<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    let parser = PdfParser::open(path)?;

    let mut doc = Document::pdf(path);
    doc.page_count = parser.page_count();
    doc.metadata = Metadata::from(parser.metadata());
    doc.extractable = parser.is_extractable();
    match parser.outline() {
        Ok(entries) => doc.table_of_contents = entries,
        Err(Error::MissingOutline) => {}
        Err(e) => return Err(e),
    }
    Ok(doc)
}

/// Discover and extract every document under `path`.
///
/// # Example
///
/// ```no_run
/// use pdfsearch::{extract, PipelineOptions};
///
/// let report = extract("./scans", &PipelineOptions::default()).unwrap();
/// println!("{} document(s) skipped", report.skipped_count());
/// ```
pub fn extract<P: AsRef<Path>>(path: P, options: &PipelineOptions) -> Result<BatchReport> {
    pipeline::extract_path(path.as_ref(), options)
}

/// Run `query` over already extracted documents, keeping those that match.
pub fn search<'a, I>(documents: I, query: &SearchQuery) -> Vec<DocumentMatches>
where
    I: IntoIterator<Item = &'a Document>,
{
    let matcher = SearchMatcher::new(query);
    documents
        .into_iter()
        .map(|doc| matcher.search(doc))
        .filter(|m| !m.is_empty())
        .collect()
}

/// Builder for extracting and searching a directory of documents.
///
/// # Example
///
/// ```no_run
/// use pdfsearch::{Combinator, PdfSearch, SearchQuery};
///
/// let query = SearchQuery::parse("invoice", Combinator::Any)?;
/// let results = PdfSearch::new()
///     .with_tables(false)
///     .sequential()
///     .run("./inbox", &query)?;
/// results.write_html("./out")?;
/// # Ok::<(), pdfsearch::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PdfSearch {
    options: PipelineOptions,
}

impl PdfSearch {
    /// Create a new builder with default pipeline options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use fully specified pipeline options.
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Enable or disable table extraction and table search.
    pub fn with_tables(mut self, extract: bool) -> Self {
        self.options = self.options.with_tables(extract);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Set the tesseract language data directory.
    pub fn with_tessdata(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.ocr = self.options.ocr.with_tessdata_dir(dir);
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Extract everything under `path` and search it.
    pub fn run<P: AsRef<Path>>(&self, path: P, query: &SearchQuery) -> Result<SearchResults> {
        let report = extract(path, &self.options)?;
        let matches = search(report.documents(), query);
        Ok(SearchResults { report, matches })
    }

    /// Search with custom collaborators (e.g. another OCR engine).
    pub fn run_with<P: AsRef<Path>>(
        &self,
        path: P,
        query: &SearchQuery,
        collaborators: &Collaborators,
    ) -> Result<SearchResults> {
        let documents = find_documents(path)?;
        let report = BatchRunner::new(collaborators, &self.options).run(documents, |_| {})?;
        let matches = search(report.documents(), query);
        Ok(SearchResults { report, matches })
    }
}

/// Extraction report and search matches of one run.
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub report: BatchReport,
    pub matches: Vec<DocumentMatches>,
}

impl SearchResults {
    /// Render the matches as an HTML summary.
    pub fn to_html(&self) -> String {
        render::to_html(&self.matches)
    }

    /// Write `summary.html` into `out_dir`.
    pub fn write_html<P: AsRef<Path>>(&self, out_dir: P) -> Result<PathBuf> {
        render::write_summary(out_dir.as_ref(), &self.matches)
    }

    /// Serialize the matches as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.matches, format)
    }
}
