//! Render targets and the default poster geometry
//!
//! A [`RenderTarget`] is a flat, positioned description of one poster. It is not
//! a bitmap; a [`Rasterizer`](crate::core::raster::Rasterizer) turns it into one.

use crate::domain::style::{Dimensions, ElementKey, Orientation};

/// RGB colour
pub type Rgb = [u8; 3];

/// Canvas background
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fill {
    Color(Rgb),
    /// Image reference, scaled to cover the canvas
    Image(String),
}

/// Horizontal alignment of a text block inside its box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// One or more lines of text sharing a style
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    /// Glyph height in canvas pixels
    pub size: f32,
    pub line_height: f32,
    pub color: Rgb,
    pub align: Align,
    pub strikethrough: bool,
}

impl TextBlock {
    pub fn single(text: impl Into<String>, size: f32, color: Rgb) -> Self {
        Self {
            lines: vec![text.into()],
            size,
            line_height: size * 1.1,
            color,
            align: Align::Left,
            strikethrough: false,
        }
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn struck(mut self) -> Self {
        self.strikethrough = true;
        self
    }

    /// Lines joined with a space
    pub fn text(&self) -> String {
        self.lines.join(" ")
    }
}

/// What an element paints
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Text(TextBlock),
    /// Image reference scaled to cover the element box
    Image { source: String },
    /// Solid rectangle
    Panel { color: Rgb },
}

/// A positioned poster element
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub key: ElementKey,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub kind: ElementKind,
}

impl Element {
    /// Text of a text element
    pub fn text(&self) -> Option<String> {
        match &self.kind {
            ElementKind::Text(block) => Some(block.text()),
            _ => None,
        }
    }
}

/// A laid-out poster ready for rasterization
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTarget {
    pub dimensions: Dimensions,
    pub background: Fill,
    /// Elements in paint order
    pub elements: Vec<Element>,
}

impl RenderTarget {
    /// First element for a key
    pub fn element(&self, key: ElementKey) -> Option<&Element> {
        self.elements.iter().find(|e| e.key == key)
    }

    /// All elements for a key
    pub fn elements_for(&self, key: ElementKey) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(move |e| e.key == key)
    }

    /// Texts painted for a key, in paint order
    pub fn texts_for(&self, key: ElementKey) -> Vec<String> {
        self.elements_for(key).filter_map(Element::text).collect()
    }

    /// Every image reference the rasterizer will need
    pub fn image_refs(&self) -> Vec<&str> {
        let background = match &self.background {
            Fill::Image(source) => Some(source.as_str()),
            Fill::Color(_) => None,
        };
        background
            .into_iter()
            .chain(self.elements.iter().filter_map(|e| match &e.kind {
                ElementKind::Image { source } => Some(source.as_str()),
                _ => None,
            }))
            .collect()
    }
}

/// Axis-aligned box in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    fn rows(width: u32, top: f32, bottom: f32, height: u32, pad: u32) -> Self {
        let h = height as f32;
        Self {
            x: pad as i32,
            y: (top * h).round() as i32,
            width: width.saturating_sub(pad * 2),
            height: ((bottom - top) * h).round() as u32,
        }
    }
}

/// Height of the footer band in canvas pixels
pub const FOOTER_BAND: u32 = 60;

/// Average glyph advance relative to font size, for a heavy sans-serif face
const GLYPH_ADVANCE: f32 = 0.56;

/// Approximate rendered width of a text run
pub fn approx_text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_ADVANCE
}

/// Default region geometry and base font sizes for one orientation
#[derive(Debug, Clone, Copy)]
pub struct BaseLayout {
    pub banner: Rect,
    pub name: Rect,
    pub subtitle: Rect,
    pub offer: Rect,
    pub old_price: Rect,
    pub price: Rect,
    pub limit: Rect,
    pub footer: Rect,
    pub name_size: f32,
    pub price_size: f32,
}

impl BaseLayout {
    /// Default layout for a canvas
    ///
    /// Regions are horizontal bands expressed as fractions of the canvas height:
    /// a 16% banner on top, a fixed footer band at the bottom and the name and
    /// price blocks stacked in between.
    pub fn for_canvas(dimensions: Dimensions, orientation: Orientation) -> Self {
        let Dimensions { width, height } = dimensions;
        let pad = 40;
        let footer_top = height.saturating_sub(FOOTER_BAND);

        let (name_size, price_size) = match orientation {
            Orientation::Portrait => (80.0, 280.0),
            Orientation::Landscape => (90.0, 220.0),
        };

        Self {
            banner: Rect {
                x: 0,
                y: 0,
                width,
                height: (height as f32 * 0.16).round() as u32,
            },
            name: Rect::rows(width, 0.18, 0.40, height, pad),
            subtitle: Rect::rows(width, 0.40, 0.44, height, pad),
            offer: Rect::rows(width, 0.44, 0.49, height, pad),
            old_price: Rect::rows(width, 0.49, 0.54, height, pad),
            price: Rect::rows(width, 0.54, 0.82, height, pad),
            limit: Rect {
                x: pad as i32,
                y: footer_top as i32 - 55,
                width: width.saturating_sub(pad * 2),
                height: 40,
            },
            footer: Rect {
                x: 0,
                y: footer_top as i32,
                width,
                height: FOOTER_BAND,
            },
            name_size,
            price_size,
        }
    }
}

/// Greedy word wrap against an approximate glyph width
pub fn wrap_text(text: &str, size: f32, max_width: u32) -> Vec<String> {
    let max_chars = ((max_width as f32 / (size * GLYPH_ADVANCE)).floor() as usize).max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
