//! Per-document extraction state machine.
//!
//! ```text
//! Start -> Classified -> NativeAttempted -> ReconciledNative
//!                |                               |
//!                |                         (no paragraphs)
//!                v                               v
//!           OcrFallback <------------------------+
//!                |
//!                v
//!         ReconciledFinal
//! ```
//!
//! Raster inputs skip the native attempt. A document the structural parser
//! refuses ends in `Aborted`.

use std::fmt;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{retain_confident, Document, Metadata};
use crate::ocr::{
    resolve_language, OcrEngine, OcrOptions, PageRasterizer, PdftoppmRasterizer, TesseractEngine,
};
use crate::parser::{
    merge_files, LopdfParser, ParsedDocument, StreamTableExtractor, StructuralParser,
    TableExtractor,
};
use crate::preprocess::ImagePreprocessor;
use crate::reconcile::reconcile_into;

use super::options::PipelineOptions;
use super::scratch::{JobScratch, ScratchArea};

/// Why extraction stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The source PDF does not allow text extraction
    NotExtractable,
    /// The merged OCR artifact does not allow text extraction
    OcrArtifactNotExtractable,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::NotExtractable => write!(f, "document is not extractable"),
            AbortReason::OcrArtifactNotExtractable => {
                write!(f, "OCR output is not extractable")
            }
        }
    }
}

/// Extraction progress of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionState {
    Start,
    Classified,
    NativeAttempted,
    ReconciledNative,
    OcrFallback,
    ReconciledFinal,
    Aborted(AbortReason),
}

impl ExtractionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExtractionState::ReconciledNative
                | ExtractionState::ReconciledFinal
                | ExtractionState::Aborted(_)
        )
    }

    /// Whether the OCR path produced the final content.
    pub fn used_ocr(&self) -> bool {
        matches!(self, ExtractionState::ReconciledFinal)
    }
}

impl fmt::Display for ExtractionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionState::Start => write!(f, "start"),
            ExtractionState::Classified => write!(f, "classified"),
            ExtractionState::NativeAttempted => write!(f, "native attempted"),
            ExtractionState::ReconciledNative => write!(f, "reconciled (native)"),
            ExtractionState::OcrFallback => write!(f, "OCR fallback"),
            ExtractionState::ReconciledFinal => write!(f, "reconciled (OCR)"),
            ExtractionState::Aborted(reason) => write!(f, "aborted: {}", reason),
        }
    }
}

/// The external components the orchestrator drives.
pub struct Collaborators {
    pub parser: Box<dyn StructuralParser>,
    pub tables: Box<dyn TableExtractor>,
    pub ocr: Box<dyn OcrEngine>,
    pub rasterizer: Box<dyn PageRasterizer>,
}

impl Collaborators {
    /// lopdf parsing, stream table detection, tesseract and pdftoppm.
    pub fn standard(options: &PipelineOptions) -> Self {
        Self {
            parser: Box::new(LopdfParser),
            tables: Box::new(StreamTableExtractor::new().with_layout(options.layout.clone())),
            ocr: Box::new(
                TesseractEngine::new().with_tessdata_dir(options.ocr.tessdata_dir.clone()),
            ),
            rasterizer: Box::new(PdftoppmRasterizer::new()),
        }
    }
}

/// Runs one document through the extraction state machine.
pub struct ExtractionOrchestrator<'a> {
    collaborators: &'a Collaborators,
    options: &'a PipelineOptions,
    scratch: &'a ScratchArea,
    preprocessor: ImagePreprocessor,
}

impl<'a> ExtractionOrchestrator<'a> {
    pub fn new(
        collaborators: &'a Collaborators,
        options: &'a PipelineOptions,
        scratch: &'a ScratchArea,
    ) -> Self {
        Self {
            collaborators,
            options,
            scratch,
            preprocessor: ImagePreprocessor::new(options.preprocess.clone()),
        }
    }

    fn advance(&self, document: &Document, state: &mut ExtractionState, next: ExtractionState) {
        log::debug!("{}: {} -> {}", document.path.display(), state, next);
        *state = next;
    }

    /// Drive `document` to a terminal state.
    ///
    /// Errors are returned as-is; the caller decides whether they are fatal
    /// via [`Error::is_fatal`].
    pub fn run(&self, document: &mut Document) -> Result<ExtractionState> {
        let mut state = ExtractionState::Start;
        self.advance(document, &mut state, ExtractionState::Classified);

        if document.is_pdf() {
            let parsed = self.collaborators.parser.open(document.source_path())?;
            self.load_structure(document, parsed.as_ref());
            if !document.extractable {
                log::warn!(
                    "Skipping {}: document is not extractable",
                    document.path.display()
                );
                let aborted = ExtractionState::Aborted(AbortReason::NotExtractable);
                self.advance(document, &mut state, aborted);
                return Ok(state);
            }
            self.advance(document, &mut state, ExtractionState::NativeAttempted);

            self.extract_content(document, parsed.as_ref())?;
            self.advance(document, &mut state, ExtractionState::ReconciledNative);

            if !document.paragraphs.is_empty() {
                return Ok(state);
            }
        }

        log::info!(
            "Regular text extraction is not possible for {}, trying OCR",
            document.path.display()
        );
        self.advance(document, &mut state, ExtractionState::OcrFallback);

        let job = self.scratch.job()?;
        let artifact = self.ocr_to_pdf(document, &job)?;
        document.ocr_path = Some(artifact);

        let parsed = self.collaborators.parser.open(document.source_path())?;
        document.extractable = parsed.is_extractable();
        if !document.extractable {
            log::warn!(
                "Skipping {}: OCR output is not extractable",
                document.path.display()
            );
            let aborted = ExtractionState::Aborted(AbortReason::OcrArtifactNotExtractable);
            self.advance(document, &mut state, aborted);
            return Ok(state);
        }

        document.paragraphs.clear();
        document.images.clear();
        document.tables.clear();
        self.extract_content(document, parsed.as_ref())?;
        self.advance(document, &mut state, ExtractionState::ReconciledFinal);

        Ok(state)
    }

    /// Fill page count, metadata, extractability and the outline.
    fn load_structure(&self, document: &mut Document, parsed: &dyn ParsedDocument) {
        document.page_count = parsed.page_count();
        document.metadata = Metadata::from(parsed.metadata());
        document.extractable = parsed.is_extractable();
        if !document.extractable {
            return;
        }
        log::debug!("Document information:\n{}", document.metadata);

        match parsed.outline() {
            Ok(entries) => document.table_of_contents = entries,
            Err(e) => log::warn!(
                "Could not get table of contents for {}: {}",
                document.path.display(),
                e
            ),
        }
    }

    /// Tables first, then layouts reconciled against them.
    fn extract_content(&self, document: &mut Document, parsed: &dyn ParsedDocument) -> Result<()> {
        if self.options.extract_tables {
            match self
                .collaborators
                .tables
                .extract_tables(document.source_path(), &self.options.tables)
            {
                Ok(tables) => document.tables = retain_confident(tables),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => log::warn!(
                    "Table extraction failed for {}: {}",
                    document.path.display(),
                    e
                ),
            }
        }

        let layouts = parsed.page_layouts(&self.options.layout)?;
        reconcile_into(document, &layouts);
        log::debug!(
            "{}: {} paragraphs, {} tables, {} images",
            document.path.display(),
            document.paragraphs.len(),
            document.tables.len(),
            document.images.len()
        );
        Ok(())
    }

    /// Rasterize, preprocess and OCR every page, then merge the page PDFs.
    fn ocr_to_pdf(&self, document: &Document, job: &JobScratch) -> Result<PathBuf> {
        let pages = if document.is_pdf() {
            document.page_count
        } else {
            1
        };
        if pages == 0 {
            return Err(Error::PdfParse(format!(
                "{} has no pages",
                document.path.display()
            )));
        }

        // The first page decides the language for the whole document.
        let first = self.prepare_page(document, 0, job)?;
        let language = self.detect_language(&first)?;
        log::info!(
            "Running OCR on {} page(s) of {} ({})",
            pages,
            document.path.display(),
            language
        );

        let mut page_pdfs = vec![self.recognize_page(document, &first, 0, &language, job)?];
        let rest: Vec<PathBuf> = if self.options.parallel {
            (1..pages)
                .into_par_iter()
                .map(|page| self.ocr_page(document, page, &language, job))
                .collect::<Result<_>>()?
        } else {
            (1..pages)
                .map(|page| self.ocr_page(document, page, &language, job))
                .collect::<Result<_>>()?
        };
        page_pdfs.extend(rest);

        let artifact = job.artifact_path(&document.filename);
        merge_files(&page_pdfs, &artifact)?;
        log::info!("OCR output for {} at {}", document.path.display(), artifact.display());
        Ok(artifact)
    }

    fn ocr_page(
        &self,
        document: &Document,
        page: u32,
        language: &str,
        job: &JobScratch,
    ) -> Result<PathBuf> {
        let image = self.prepare_page(document, page, job)?;
        self.recognize_page(document, &image, page, language, job)
    }

    /// Render (or decode) one page and write its preprocessed PNG.
    fn prepare_page(&self, document: &Document, page: u32, job: &JobScratch) -> Result<PathBuf> {
        let image = self.page_image(document, page, job)?;
        let output = job.page_file(&document.filename, page, "png");
        self.preprocessor.process_to_file(&image, &output)?;
        Ok(output)
    }

    fn page_image(&self, document: &Document, page: u32, job: &JobScratch) -> Result<DynamicImage> {
        if document.is_pdf() {
            self.collaborators.rasterizer.rasterize(
                &document.path,
                page + 1,
                self.options.dpi,
                job.pages_dir(),
            )
        } else {
            Ok(image::open(&document.path)?)
        }
    }

    fn detect_language(&self, image: &Path) -> Result<String> {
        let ocr: &OcrOptions = &self.options.ocr;
        let text = self.collaborators.ocr.recognize_text(
            image,
            &ocr.detection_languages,
            ocr.detection_segmentation,
        )?;
        Ok(resolve_language(&text, ocr))
    }

    fn recognize_page(
        &self,
        document: &Document,
        image: &Path,
        page: u32,
        language: &str,
        job: &JobScratch,
    ) -> Result<PathBuf> {
        let output = job.page_file(&document.filename, page, "pdf");
        self.collaborators.ocr.recognize_to_pdf(
            image,
            language,
            self.options.ocr.page_segmentation,
            &output,
        )?;
        Ok(output)
    }
}
