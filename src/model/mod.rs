//! Document model types.
//!
//! Documents are created once per discovered input and mutated in place by
//! the pipeline. Layout trees are transient and only live between layout
//! analysis and reconciliation.

mod document;
mod layout;
mod table;

pub use document::{
    Document, DocumentKind, ImageElement, Metadata, RawMetadata, TocEntry, UNKNOWN,
};
pub use layout::{rects_overlap, BoundingBox, LayoutElement, PageLayout, Point};
pub use table::{retain_confident, TableCell, TableRegion, TableRow, MIN_TABLE_CONFIDENCE};
