//! Scratch directories for intermediate OCR files.
//!
//! A [`ScratchArea`] lives for one batch run. Each document that needs OCR
//! takes a [`JobScratch`] inside it: per-page files go into a temporary
//! directory that disappears with the job, while the merged artifact stays
//! in the job directory until the whole area is removed.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use uuid::Uuid;

use crate::error::Result;

/// Run-scoped scratch root, removed on drop or [`ScratchArea::close`].
#[derive(Debug)]
pub struct ScratchArea {
    dir: TempDir,
}

impl ScratchArea {
    /// Create the scratch root under `parent`, or the system temp dir.
    pub fn new(parent: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("pdfsearch-");
        let dir = match parent {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                builder.tempdir_in(parent)?
            }
            None => builder.tempdir()?,
        };
        log::debug!("Scratch area at {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Open a fresh per-document namespace.
    pub fn job(&self) -> Result<JobScratch> {
        let root = self.dir.path().join(Uuid::new_v4().to_string());
        fs::create_dir_all(&root)?;
        let pages = tempfile::Builder::new().prefix("pages-").tempdir_in(&root)?;
        Ok(JobScratch { root, pages })
    }

    /// Remove the scratch root and everything in it.
    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close()?;
        log::debug!("Removed scratch area {}", path.display());
        Ok(())
    }
}

/// Per-document scratch namespace.
#[derive(Debug)]
pub struct JobScratch {
    root: PathBuf,
    pages: TempDir,
}

impl JobScratch {
    /// Directory that outlives the job (until run teardown).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for per-page intermediates, removed when the job is dropped.
    pub fn pages_dir(&self) -> &Path {
        self.pages.path()
    }

    /// Path of an intermediate page file.
    pub fn page_file(&self, stem: &str, page: u32, extension: &str) -> PathBuf {
        self.pages
            .path()
            .join(format!("{}_{}.{}", stem, page, extension))
    }

    /// Path of the merged OCR artifact.
    pub fn artifact_path(&self, stem: &str) -> PathBuf {
        self.root.join(format!("{}.pdf", stem))
    }
}
