//! Paginated PDF documents
//!
//! Each page holds exactly one full-bleed poster bitmap. JPEG pages are
//! embedded as-is (DCTDecode); PNG pages are decoded and re-compressed with
//! zlib (FlateDecode).

use crate::core::raster::{Encoding, RasterizedPage};
use crate::domain::style::{Orientation, PageSize};
use crate::domain::{AppError, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref};
use std::io::Write;

const IMAGE_NAME: Name<'static> = Name(b"Im0");

/// Image data ready to be written as an XObject
#[derive(Debug, Clone)]
struct EmbeddedImage {
    data: Vec<u8>,
    filter: Filter,
    width: u32,
    height: u32,
    index: usize,
}

/// A PDF under construction
///
/// Pages are kept in insertion order.
///
/// # Examples
///
/// ```no_run
/// use cartaz::core::assemble::PdfDocument;
/// use cartaz::domain::{Orientation, PageSize};
/// # fn example(page: cartaz::core::raster::RasterizedPage) -> cartaz::domain::Result<()> {
/// let mut document = PdfDocument::new(PageSize::A4, Orientation::Portrait);
/// document.add_page(&page)?;
/// let bytes = document.finish()?;
/// assert!(bytes.starts_with(b"%PDF"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PdfDocument {
    page_size: PageSize,
    orientation: Orientation,
    pages: Vec<EmbeddedImage>,
}

impl PdfDocument {
    pub fn new(page_size: PageSize, orientation: Orientation) -> Self {
        Self {
            page_size,
            orientation,
            pages: Vec::new(),
        }
    }

    /// Appends a page holding the bitmap
    pub fn add_page(&mut self, page: &RasterizedPage) -> Result<()> {
        if page.width == 0 || page.height == 0 {
            return Err(AppError::Assembly(format!(
                "page for '{}' has no pixels",
                page.product
            )));
        }

        let (data, filter) = match page.encoding {
            Encoding::Jpeg { .. } => (page.bytes.clone(), Filter::DctDecode),
            Encoding::Png => (deflate_png(&page.bytes)?, Filter::FlateDecode),
        };

        self.pages.push(EmbeddedImage {
            data,
            filter,
            width: page.width,
            height: page.height,
            index: page.index,
        });
        Ok(())
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Source product index of each page, in page order
    pub fn sources(&self) -> Vec<usize> {
        self.pages.iter().map(|p| p.index).collect()
    }

    /// Page box in PDF points
    pub fn page_points(&self) -> (f32, f32) {
        self.page_size.points(self.orientation)
    }

    /// Writes the document
    pub fn finish(&self) -> Result<Vec<u8>> {
        if self.pages.is_empty() {
            return Err(AppError::Assembly("document has no pages".to_string()));
        }

        let (width, height) = self.page_points();
        let mut alloc = Ref::new(1);
        let catalog_id = alloc.bump();
        let tree_id = alloc.bump();

        let ids: Vec<(Ref, Ref, Ref)> = self
            .pages
            .iter()
            .map(|_| (alloc.bump(), alloc.bump(), alloc.bump()))
            .collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.pages(tree_id)
            .kids(ids.iter().map(|(page_id, _, _)| *page_id))
            .count(ids.len() as i32);

        for (image, (page_id, image_id, content_id)) in self.pages.iter().zip(&ids) {
            {
                let mut page = pdf.page(*page_id);
                page.media_box(Rect::new(0.0, 0.0, width, height));
                page.parent(tree_id);
                page.contents(*content_id);
                page.resources().x_objects().pair(IMAGE_NAME, *image_id);
            }

            {
                let mut xobject = pdf.image_xobject(*image_id, &image.data);
                xobject.filter(image.filter);
                xobject.width(image.width as i32);
                xobject.height(image.height as i32);
                xobject.color_space().device_rgb();
                xobject.bits_per_component(8);
            }

            let mut content = Content::new();
            content.save_state();
            content.transform([width, 0.0, 0.0, height, 0.0, 0.0]);
            content.x_object(IMAGE_NAME);
            content.restore_state();
            pdf.stream(*content_id, &content.finish());
        }

        Ok(pdf.finish())
    }
}

/// Decodes a PNG and zlib-compresses its RGB samples
fn deflate_png(bytes: &[u8]) -> Result<Vec<u8>> {
    let image = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .map_err(|e| AppError::Assembly(format!("cannot decode page bitmap: {e}")))?
        .to_rgb8();

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(image.as_raw())
        .and_then(|_| encoder.finish())
        .map_err(|e| AppError::Assembly(format!("cannot compress page bitmap: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn png_page(index: usize) -> RasterizedPage {
        let mut bytes = Vec::new();
        RgbImage::from_pixel(8, 11, Rgb([200, 10, 10]))
            .write_with_encoder(image::codecs::png::PngEncoder::new(&mut bytes))
            .unwrap();
        RasterizedPage {
            bytes,
            encoding: Encoding::Png,
            width: 8,
            height: 11,
            index,
            product: format!("item {index}"),
        }
    }

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn test_pages_in_insertion_order() {
        let mut document = PdfDocument::new(PageSize::A4, Orientation::Portrait);
        for index in [2, 0, 1] {
            document.add_page(&png_page(index)).unwrap();
        }

        assert_eq!(document.sources(), vec![2, 0, 1]);

        let bytes = document.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(count(&bytes, b"/Type /Page") - count(&bytes, b"/Type /Pages"), 3);
        assert_eq!(count(&bytes, b"/FlateDecode"), 3);
    }

    #[test]
    fn test_empty_document_is_an_error() {
        let document = PdfDocument::new(PageSize::A4, Orientation::Portrait);
        assert!(matches!(document.finish(), Err(AppError::Assembly(_))));
    }

    #[test]
    fn test_invalid_png_is_an_assembly_error() {
        let mut document = PdfDocument::new(PageSize::A4, Orientation::Portrait);
        let mut page = png_page(0);
        page.bytes = b"not a png".to_vec();
        assert!(matches!(document.add_page(&page), Err(AppError::Assembly(_))));
    }

    #[test]
    fn test_landscape_media_box() {
        let document = PdfDocument::new(PageSize::A4, Orientation::Landscape);
        let (w, h) = document.page_points();
        assert!(w > h);
    }
}
