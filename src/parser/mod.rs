//! PDF parsing module.

mod backend;
mod layout;
mod merge;
mod options;
mod pdf_parser;
mod table_detector;

pub use backend::{
    decode_text_simple, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue, DEFAULT_PAGE_SIZE,
};
pub use layout::{Column, LayoutAnalyzer, Matrix, PageContent, PlacedImage, TextLine, TextSpan};
pub use merge::{merge_documents, merge_files};
pub use options::{LayoutParams, PageSelection, TableParams};
pub use pdf_parser::{LopdfParser, ParsedDocument, PdfParser, StructuralParser};
pub use table_detector::{
    DetectedTable, StreamTableExtractor, TableDetector, TableDetectorConfig, TableExtractor,
    TableRowData,
};
