//! Multi-file ZIP exports
//!
//! An archive holds one single-page PDF per poster plus a combined document
//! with every page, in input order.

use super::document::PdfDocument;
use super::filename::{sanitize_file_stem, FileNamer};
use super::{ArtifactKind, ExportArtifact};
use crate::core::raster::RasterizedPage;
use crate::domain::style::{Orientation, PageSize};
use crate::domain::{AppError, Result};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Archive file name for a label (`Cartazes_loja_12.zip`)
pub fn archive_file_name(prefix: &str, label: &str, max_len: usize) -> String {
    format!("{prefix}_{}.zip", sanitize_file_stem(label, max_len))
}

/// Builds a ZIP archive page by page
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    combined: PdfDocument,
    combined_file_name: String,
    namer: FileNamer,
    entries: Vec<String>,
    page_size: PageSize,
    orientation: Orientation,
}

impl ArchiveBuilder {
    pub fn new(
        page_size: PageSize,
        orientation: Orientation,
        combined_file_name: impl Into<String>,
        max_filename_len: usize,
    ) -> Self {
        let combined_file_name = combined_file_name.into();
        let mut namer = FileNamer::new(max_filename_len);
        namer.reserve(&combined_file_name);

        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            combined: PdfDocument::new(page_size, orientation),
            combined_file_name,
            namer,
            entries: Vec::new(),
            page_size,
            orientation,
        }
    }

    /// Adds a poster as its own file and as the next combined page
    ///
    /// Returns the entry name.
    pub fn add(&mut self, page: &RasterizedPage) -> Result<String> {
        let mut single = PdfDocument::new(self.page_size, self.orientation);
        single.add_page(page)?;
        let bytes = single.finish()?;

        let name = self.namer.pdf_name(&page.product);
        self.write_entry(&name, &bytes)?;
        self.combined.add_page(page)?;
        self.entries.push(name.clone());
        Ok(name)
    }

    /// Number of posters added so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the combined document and closes the archive
    pub fn finish(mut self, archive_name: String) -> Result<ExportArtifact> {
        let combined = self.combined.finish()?;
        let combined_file_name = self.combined_file_name.clone();
        self.write_entry(&combined_file_name, &combined)?;

        let combined_pages = self.combined.page_count();
        let sources = self.combined.sources();
        let mut entries = self.entries;
        entries.push(combined_file_name);

        let bytes = self.writer.finish()?.into_inner();

        Ok(ExportArtifact::new(
            archive_name,
            bytes,
            ArtifactKind::Archive {
                entries,
                combined_pages,
            },
            sources,
        ))
    }

    fn write_entry(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.writer.start_file(name, self.options)?;
        self.writer
            .write_all(bytes)
            .map_err(|e| AppError::Assembly(format!("cannot write '{name}' to archive: {e}")))
    }
}
