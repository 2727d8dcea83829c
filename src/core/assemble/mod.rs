//! Document assembly
//!
//! Rasterized pages become either a single PDF, a PNG, or a ZIP archive of
//! per-poster PDFs plus one combined document.

pub mod archive;
pub mod document;
pub mod filename;

pub use archive::{archive_file_name, ArchiveBuilder};
pub use document::PdfDocument;
pub use filename::{sanitize_file_stem, FileNamer, FALLBACK_STEM};

use sha2::{Digest, Sha256};

/// What an artifact contains
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactKind {
    /// A PDF
    Document { page_count: usize },
    /// A single poster bitmap
    Image { width: u32, height: u32 },
    /// Per-poster PDFs followed by the combined document
    Archive {
        entries: Vec<String>,
        combined_pages: usize,
    },
}

/// A finished export, held in memory until it is written or uploaded
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub kind: ArtifactKind,
    /// Source product index of each page, in page order
    pub sources: Vec<usize>,
    /// Hex SHA-256 of `bytes`
    pub sha256: String,
}

impl ExportArtifact {
    pub fn new(filename: String, bytes: Vec<u8>, kind: ArtifactKind, sources: Vec<usize>) -> Self {
        let sha256 = format!("{:x}", Sha256::digest(&bytes));
        Self {
            filename,
            bytes,
            kind,
            sources,
            sha256,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self.kind {
            ArtifactKind::Document { .. } => "application/pdf",
            ArtifactKind::Image { .. } => "image/png",
            ArtifactKind::Archive { .. } => "application/zip",
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Pages in the (combined) document
    pub fn page_count(&self) -> usize {
        match &self.kind {
            ArtifactKind::Document { page_count } => *page_count,
            ArtifactKind::Image { .. } => 1,
            ArtifactKind::Archive { combined_pages, .. } => *combined_pages,
        }
    }
}
