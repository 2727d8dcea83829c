//! Software rasterizer built on `image` and `imageproc`

use super::{Encoding, RasterOptions, RasterizedPage, Rasterizer};
use crate::adapters::assets::AssetCache;
use crate::core::render::{Align, ElementKind, Fill, RenderTarget, Rgb, TextBlock};
use crate::core::render::layout::approx_text_width;
use crate::domain::RenderError;
use ab_glyph::{FontArc, PxScale};
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Rasterizer that paints render targets in memory
///
/// Text is drawn with the configured TrueType/OpenType font. Without a font,
/// every text line is painted as a solid bar of its approximate extent, which
/// keeps the layout visible and the output independent of installed fonts.
#[derive(Clone, Default)]
pub struct ImageRasterizer {
    font: Option<FontArc>,
}

impl ImageRasterizer {
    /// Creates a rasterizer without a font
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a rasterizer that draws text with the font at `path`
    pub fn with_font_file(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| RenderError::Font(format!("cannot read {}: {e}", path.display())))?;
        let font = FontArc::try_from_vec(data)
            .map_err(|e| RenderError::Font(format!("{}: {e}", path.display())))?;
        Ok(Self { font: Some(font) })
    }

    /// Returns true if text is drawn with glyphs
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }
}

impl std::fmt::Debug for ImageRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageRasterizer")
            .field("font", &self.font.is_some())
            .finish()
    }
}

#[async_trait]
impl Rasterizer for ImageRasterizer {
    async fn rasterize(
        &self,
        target: &RenderTarget,
        options: &RasterOptions,
        assets: &AssetCache,
    ) -> Result<RasterizedPage, RenderError> {
        let mut images = HashMap::new();
        for reference in target.image_refs() {
            let image = assets
                .get(reference)
                .ok_or_else(|| RenderError::AssetUnavailable(reference.to_string()))?;
            images.insert(reference.to_string(), image);
        }

        let painter = Painter {
            font: self.font.clone(),
            scale: options.scale,
            images,
        };
        let target = target.clone();
        let encoding = options.encoding;

        tokio::task::spawn_blocking(move || {
            let canvas = painter.paint(&target)?;
            encode(canvas, encoding)
        })
        .await
        .map_err(|e| RenderError::Encode(format!("rasterizer task failed: {e}")))?
    }
}

struct Painter {
    font: Option<FontArc>,
    scale: f32,
    images: HashMap<String, Arc<DynamicImage>>,
}

impl Painter {
    fn paint(&self, target: &RenderTarget) -> Result<RgbaImage, RenderError> {
        let width = self.px(target.dimensions.width as f32).max(1);
        let height = self.px(target.dimensions.height as f32).max(1);

        let mut canvas = match &target.background {
            Fill::Color(color) => RgbaImage::from_pixel(width, height, rgba(*color)),
            Fill::Image(source) => self.image(source)?.resize_to_fill(width, height, FilterType::Triangle).to_rgba8(),
        };

        for element in &target.elements {
            let x = (element.x as f32 * self.scale).round() as i32;
            let y = (element.y as f32 * self.scale).round() as i32;
            let w = self.px(element.width as f32);
            let h = self.px(element.height as f32);

            match &element.kind {
                ElementKind::Panel { color } => fill_rect(&mut canvas, x, y, w, h, *color),
                ElementKind::Image { source } => {
                    if w == 0 || h == 0 {
                        continue;
                    }
                    let image = self
                        .image(source)?
                        .resize_to_fill(w, h, FilterType::Triangle)
                        .to_rgba8();
                    imageops::overlay(&mut canvas, &image, x as i64, y as i64);
                }
                ElementKind::Text(block) => self.text(&mut canvas, x, y, w, block),
            }
        }

        Ok(canvas)
    }

    fn text(&self, canvas: &mut RgbaImage, x: i32, y: i32, width: u32, block: &TextBlock) {
        let size = block.size * self.scale;
        let line_height = block.line_height * self.scale;

        for (i, line) in block.lines.iter().enumerate() {
            let top = y + (i as f32 * line_height).round() as i32;
            let (line_width, glyph_height) = match &self.font {
                Some(font) => text_size(PxScale::from(size), font, line),
                None => (
                    (approx_text_width(line, block.size) * self.scale).round() as u32,
                    (size * 0.7).round() as u32,
                ),
            };
            let left = match block.align {
                Align::Left => x,
                Align::Center => x + (width as i32 - line_width as i32) / 2,
            };

            match &self.font {
                Some(font) => draw_text_mut(
                    canvas,
                    rgba(block.color),
                    left,
                    top,
                    PxScale::from(size),
                    font,
                    line,
                ),
                None => fill_rect(
                    canvas,
                    left,
                    top + (size * 0.15).round() as i32,
                    line_width,
                    glyph_height,
                    block.color,
                ),
            }

            if block.strikethrough {
                let thickness = ((size * 0.06).round() as u32).max(2);
                let middle = top + (size * 0.5).round() as i32;
                fill_rect(canvas, left, middle, line_width, thickness, block.color);
            }
        }
    }

    fn image(&self, source: &str) -> Result<&DynamicImage, RenderError> {
        self.images
            .get(source)
            .map(|image| image.as_ref())
            .ok_or_else(|| RenderError::AssetUnavailable(source.to_string()))
    }

    fn px(&self, value: f32) -> u32 {
        (value * self.scale).round().max(0.0) as u32
    }
}

fn fill_rect(canvas: &mut RgbaImage, x: i32, y: i32, width: u32, height: u32, color: Rgb) {
    if width == 0 || height == 0 {
        return;
    }
    draw_filled_rect_mut(canvas, Rect::at(x, y).of_size(width, height), rgba(color));
}

fn rgba([r, g, b]: Rgb) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

fn encode(canvas: RgbaImage, encoding: Encoding) -> Result<RasterizedPage, RenderError> {
    let (width, height) = canvas.dimensions();
    let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
    let mut bytes = Vec::new();

    let result = match encoding {
        Encoding::Png => rgb.write_with_encoder(PngEncoder::new(&mut bytes)),
        Encoding::Jpeg { quality } => {
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100)))
        }
    };
    result.map_err(|e| RenderError::Encode(e.to_string()))?;

    Ok(RasterizedPage {
        bytes,
        encoding,
        width,
        height,
        index: 0,
        product: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::render;
    use crate::domain::{ProductRecord, StyleConfig};

    fn target(style: &StyleConfig) -> RenderTarget {
        let product = ProductRecord::new("ARROZ TIPO 1", "9,99", "Kg").with_old_price("12,49");
        render(Some(&product), style, style.dimensions()).unwrap()
    }

    #[tokio::test]
    async fn test_png_output_is_scaled() {
        let style = StyleConfig::default();
        let options = RasterOptions {
            scale: 0.5,
            encoding: Encoding::Png,
        };

        let page = ImageRasterizer::new()
            .rasterize(&target(&style), &options, &AssetCache::new())
            .await
            .unwrap();

        assert_eq!((page.width, page.height), (397, 562));
        assert_eq!(&page.bytes[..4], b"\x89PNG");
    }

    #[tokio::test]
    async fn test_jpeg_output() {
        let style = StyleConfig::default();
        let options = RasterOptions {
            scale: 0.25,
            encoding: Encoding::Jpeg { quality: 70 },
        };

        let page = ImageRasterizer::new()
            .rasterize(&target(&style), &options, &AssetCache::new())
            .await
            .unwrap();

        assert_eq!(&page.bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(page.encoding, Encoding::Jpeg { quality: 70 });
    }

    #[tokio::test]
    async fn test_missing_asset_is_an_error() {
        let mut style = StyleConfig::default();
        style.images.banner = Some("https://cdn.example.com/banner.png".to_string());
        let options = RasterOptions {
            scale: 0.25,
            encoding: Encoding::Png,
        };

        let result = ImageRasterizer::new()
            .rasterize(&target(&style), &options, &AssetCache::new())
            .await;

        assert_eq!(
            result,
            Err(RenderError::AssetUnavailable(
                "https://cdn.example.com/banner.png".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_loaded_assets_are_painted() {
        let mut style = StyleConfig::default();
        style.images.background = Some("bg.png".to_string());
        let mut assets = AssetCache::new();
        assets.insert(
            "bg.png",
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]))),
        );
        let options = RasterOptions {
            scale: 0.25,
            encoding: Encoding::Png,
        };

        let page = ImageRasterizer::new()
            .rasterize(&target(&style), &options, &assets)
            .await
            .unwrap();

        let decoded = image::load_from_memory(&page.bytes).unwrap().to_rgb8();
        // Left edge between banner and name band is background
        assert_eq!(decoded.get_pixel(2, 60).0, [0, 0, 255]);
    }

    #[test]
    fn test_missing_font_file() {
        let result = ImageRasterizer::with_font_file("/nonexistent/font.ttf");
        assert!(matches!(result, Err(RenderError::Font(_))));
    }
}
