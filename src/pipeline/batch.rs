//! Running many documents through extraction.

use std::path::Path;

use rayon::prelude::*;

use crate::error::Result;
use crate::model::Document;

use super::options::PipelineOptions;
use super::orchestrator::{Collaborators, ExtractionOrchestrator, ExtractionState};
use super::scratch::ScratchArea;

/// What happened to one document.
#[derive(Debug, Clone)]
pub enum DocumentOutcome {
    /// Extraction reached a terminal state
    Processed {
        document: Document,
        state: ExtractionState,
    },
    /// A non-fatal error stopped this document
    Skipped { document: Document, reason: String },
}

impl DocumentOutcome {
    pub fn document(&self) -> &Document {
        match self {
            DocumentOutcome::Processed { document, .. } => document,
            DocumentOutcome::Skipped { document, .. } => document,
        }
    }

    pub fn into_document(self) -> Document {
        match self {
            DocumentOutcome::Processed { document, .. } => document,
            DocumentOutcome::Skipped { document, .. } => document,
        }
    }

    /// Terminal state, if extraction was not skipped.
    pub fn state(&self) -> Option<ExtractionState> {
        match self {
            DocumentOutcome::Processed { state, .. } => Some(*state),
            DocumentOutcome::Skipped { .. } => None,
        }
    }

    /// Whether the document ended without usable content.
    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            DocumentOutcome::Skipped { .. }
                | DocumentOutcome::Processed {
                    state: ExtractionState::Aborted(_),
                    ..
                }
        )
    }
}

/// Outcomes of a batch run, in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchReport {
    /// Documents in input order, including skipped ones.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.outcomes.iter().map(DocumentOutcome::document)
    }

    pub fn into_documents(self) -> Vec<Document> {
        self.outcomes
            .into_iter()
            .map(DocumentOutcome::into_document)
            .collect()
    }

    pub fn processed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_skipped()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    /// Documents that needed the OCR path.
    pub fn ocr_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.state().is_some_and(|s| s.used_ocr()))
            .count()
    }
}

/// Runs extraction over a batch of documents.
pub struct BatchRunner<'a> {
    collaborators: &'a Collaborators,
    options: &'a PipelineOptions,
}

impl<'a> BatchRunner<'a> {
    pub fn new(collaborators: &'a Collaborators, options: &'a PipelineOptions) -> Self {
        Self {
            collaborators,
            options,
        }
    }

    /// Run with a scratch area that lives exactly as long as the batch.
    pub fn run<F>(&self, documents: Vec<Document>, on_done: F) -> Result<BatchReport>
    where
        F: Fn(&DocumentOutcome) + Sync,
    {
        let scratch = ScratchArea::new(self.options.scratch_root.as_deref())?;
        let report = self.run_in(&scratch, documents, on_done);
        if let Err(e) = scratch.close() {
            log::warn!("Could not remove scratch area: {}", e);
        }
        report
    }

    /// Run inside an existing scratch area.
    ///
    /// The first fatal error stops the batch and discards finished results.
    pub fn run_in<F>(
        &self,
        scratch: &ScratchArea,
        documents: Vec<Document>,
        on_done: F,
    ) -> Result<BatchReport>
    where
        F: Fn(&DocumentOutcome) + Sync,
    {
        let orchestrator = ExtractionOrchestrator::new(self.collaborators, self.options, scratch);
        log::info!("Processing {} document(s)", documents.len());

        let process = |document: Document| -> Result<DocumentOutcome> {
            let outcome = process_one(&orchestrator, document)?;
            on_done(&outcome);
            Ok(outcome)
        };

        let outcomes = if self.options.parallel {
            documents
                .into_par_iter()
                .map(process)
                .collect::<Result<Vec<_>>>()?
        } else {
            documents
                .into_iter()
                .map(process)
                .collect::<Result<Vec<_>>>()?
        };

        let report = BatchReport { outcomes };
        log::info!(
            "Finished: {} processed, {} skipped, {} via OCR",
            report.processed_count(),
            report.skipped_count(),
            report.ocr_count()
        );
        Ok(report)
    }
}

fn process_one(
    orchestrator: &ExtractionOrchestrator<'_>,
    mut document: Document,
) -> Result<DocumentOutcome> {
    match orchestrator.run(&mut document) {
        Ok(state) => Ok(DocumentOutcome::Processed { document, state }),
        Err(e) if e.is_fatal() => {
            log::error!("Stopping: {} failed with {}", document.path.display(), e);
            Err(e)
        }
        Err(e) => {
            log::warn!("Skipping {}: {}", document.path.display(), e);
            Ok(DocumentOutcome::Skipped {
                document,
                reason: e.to_string(),
            })
        }
    }
}

/// Run a batch over `documents` with the standard collaborators.
pub fn extract_documents(
    documents: Vec<Document>,
    options: &PipelineOptions,
) -> Result<BatchReport> {
    let collaborators = Collaborators::standard(options);
    BatchRunner::new(&collaborators, options).run(documents, |_| {})
}

/// Discover documents under `root` and extract them.
pub fn extract_path(root: &Path, options: &PipelineOptions) -> Result<BatchReport> {
    let documents = crate::discover::find_documents(root)?;
    extract_documents(documents, options)
}
