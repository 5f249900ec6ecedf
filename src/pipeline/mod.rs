//! Document extraction pipeline: native extraction with OCR fallback.

mod batch;
mod options;
mod orchestrator;
mod scratch;

pub use batch::{extract_documents, extract_path, BatchReport, BatchRunner, DocumentOutcome};
pub use options::{PipelineOptions, DEFAULT_DPI};
pub use orchestrator::{AbortReason, Collaborators, ExtractionOrchestrator, ExtractionState};
pub use scratch::{JobScratch, ScratchArea};
