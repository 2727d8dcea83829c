//! Poster style configuration
//!
//! A [`StyleConfig`] is an immutable value applied uniformly to every poster of
//! a batch. It is passed explicitly into the renderer; there is no ambient style.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// CSS pixels per millimetre (96 dpi)
const PX_PER_MM: f64 = 96.0 / 25.4;

/// Output paper format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    A3,
    #[default]
    A4,
    A5,
    Letter,
}

impl PageSize {
    /// Portrait width and height in millimetres
    pub fn millimetres(&self) -> (f64, f64) {
        match self {
            PageSize::A3 => (297.0, 420.0),
            PageSize::A4 => (210.0, 297.0),
            PageSize::A5 => (148.0, 210.0),
            PageSize::Letter => (215.9, 279.4),
        }
    }

    /// Page size in PDF points for the given orientation
    pub fn points(&self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = orientation.apply(self.millimetres());
        ((w * 72.0 / 25.4) as f32, (h * 72.0 / 25.4) as f32)
    }

    /// Canvas size in CSS pixels (96 dpi) for the given orientation
    ///
    /// A4 portrait yields the familiar 794x1123 canvas.
    pub fn canvas(&self, orientation: Orientation) -> Dimensions {
        let (w, h) = orientation.apply(self.millimetres());
        Dimensions::new((w * PX_PER_MM).round() as u32, (h * PX_PER_MM).round() as u32)
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "a3" => Ok(PageSize::A3),
            "a4" => Ok(PageSize::A4),
            "a5" => Ok(PageSize::A5),
            "letter" => Ok(PageSize::Letter),
            other => Err(format!(
                "Invalid page size '{other}'. Must be one of: a3, a4, a5, letter"
            )),
        }
    }
}

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    fn apply(&self, (short, long): (f64, f64)) -> (f64, f64) {
        match self {
            Orientation::Portrait => (short, long),
            Orientation::Landscape => (long, short),
        }
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            other => Err(format!(
                "Invalid orientation '{other}'. Must be portrait or landscape"
            )),
        }
    }
}

/// Layout variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FactoryType {
    /// Unit price poster
    #[default]
    Standard,
    /// Bulk bundle poster: quantity-based offer instead of a unit price
    Mega,
}

/// Named, individually positionable poster regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKey {
    Banner,
    Name,
    Subtitle,
    OldPrice,
    Price,
    Unit,
    Offer,
    Limit,
    Footer,
}

impl ElementKey {
    /// All keys, in paint order
    pub const ALL: [ElementKey; 9] = [
        ElementKey::Banner,
        ElementKey::Name,
        ElementKey::Subtitle,
        ElementKey::OldPrice,
        ElementKey::Price,
        ElementKey::Unit,
        ElementKey::Offer,
        ElementKey::Limit,
        ElementKey::Footer,
    ];

    /// Key as used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKey::Banner => "banner",
            ElementKey::Name => "name",
            ElementKey::Subtitle => "subtitle",
            ElementKey::OldPrice => "old_price",
            ElementKey::Price => "price",
            ElementKey::Unit => "unit",
            ElementKey::Offer => "offer",
            ElementKey::Limit => "limit",
            ElementKey::Footer => "footer",
        }
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown poster element '{s}'"))
    }
}

/// Pixel offset applied on top of the default layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Offset {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
}

/// Canvas size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Text colours
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorConfig {
    #[serde(default = "default_name_color")]
    pub name: String,
    #[serde(default = "default_price_color")]
    pub price: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            name: default_name_color(),
            price: default_price_color(),
        }
    }
}

/// Banner and background image references (file paths or http(s) URLs)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ImageRefs {
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
}

impl ImageRefs {
    /// Iterates over the configured references
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.banner
            .as_deref()
            .into_iter()
            .chain(self.background.as_deref())
    }
}

/// Font scale factors in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleFactors {
    #[serde(default = "default_scale")]
    pub name: u32,
    #[serde(default = "default_scale")]
    pub price: u32,
    #[serde(default = "default_scale")]
    pub limit: u32,
}

impl Default for ScaleFactors {
    fn default() -> Self {
        Self {
            name: default_scale(),
            price: default_scale(),
            limit: default_scale(),
        }
    }
}

/// Visual parameters applied to a whole batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    pub page_size: PageSize,

    #[serde(default)]
    pub orientation: Orientation,

    #[serde(default)]
    pub factory_type: FactoryType,

    #[serde(default)]
    pub colors: ColorConfig,

    #[serde(default)]
    pub images: ImageRefs,

    /// Used when no background image is set
    #[serde(default = "default_background_color")]
    pub background_color: String,

    #[serde(default)]
    pub scale: ScaleFactors,

    /// Per-element offsets keyed by element name (see [`ElementKey::as_str`])
    #[serde(default)]
    pub positions: BTreeMap<String, Offset>,

    #[serde(default = "default_true")]
    pub show_old_price: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            orientation: Orientation::default(),
            factory_type: FactoryType::default(),
            colors: ColorConfig::default(),
            images: ImageRefs::default(),
            background_color: default_background_color(),
            scale: ScaleFactors::default(),
            positions: BTreeMap::new(),
            show_old_price: true,
        }
    }
}

impl StyleConfig {
    /// Offset configured for an element, zero if none
    pub fn offset(&self, key: ElementKey) -> Offset {
        self.positions.get(key.as_str()).copied().unwrap_or_default()
    }

    /// Canvas size for this style's page format
    pub fn dimensions(&self) -> Dimensions {
        self.page_size.canvas(self.orientation)
    }

    /// Validates the style
    ///
    /// Scale factors must be positive percentages; colours must be `#rrggbb`.
    /// Offsets are not bounded.
    pub fn validate(&self) -> Result<(), String> {
        for (label, value) in [
            ("name", self.scale.name),
            ("price", self.scale.price),
            ("limit", self.scale.limit),
        ] {
            if !(1..=400).contains(&value) {
                return Err(format!(
                    "style.scale.{label} must be between 1 and 400 percent, got {value}"
                ));
            }
        }

        for (label, value) in [
            ("colors.name", &self.colors.name),
            ("colors.price", &self.colors.price),
            ("background_color", &self.background_color),
        ] {
            if parse_hex_color(value).is_none() {
                return Err(format!(
                    "style.{label} must be a #rrggbb colour, got '{value}'"
                ));
            }
        }

        for key in self.positions.keys() {
            ElementKey::from_str(key)?;
        }

        Ok(())
    }
}

/// Parses `#rrggbb` (or `rrggbb`) into RGB components
///
/// # Examples
///
/// ```
/// use cartaz::domain::style::parse_hex_color;
///
/// assert_eq!(parse_hex_color("#cc0000"), Some([0xcc, 0x00, 0x00]));
/// assert_eq!(parse_hex_color("red"), None);
/// ```
pub fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

fn default_name_color() -> String {
    "#000000".to_string()
}

fn default_price_color() -> String {
    "#cc0000".to_string()
}

fn default_background_color() -> String {
    "#ffffff".to_string()
}

fn default_scale() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_canvas_matches_screen_layout() {
        assert_eq!(
            PageSize::A4.canvas(Orientation::Portrait),
            Dimensions::new(794, 1123)
        );
        assert_eq!(
            PageSize::A4.canvas(Orientation::Landscape),
            Dimensions::new(1123, 794)
        );
    }

    #[test]
    fn test_a4_points() {
        let (w, h) = PageSize::A4.points(Orientation::Portrait);
        assert!((w - 595.28).abs() < 0.1);
        assert!((h - 841.89).abs() < 0.1);
    }

    #[test]
    fn test_validate_rejects_zero_scale() {
        let mut style = StyleConfig::default();
        style.scale.price = 0;
        assert!(style.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_element() {
        let mut style = StyleConfig::default();
        style.positions.insert("logo".to_string(), Offset { x: 1, y: 1 });
        assert!(style.validate().is_err());
    }

    #[test]
    fn test_offsets_are_unbounded() {
        let mut style = StyleConfig::default();
        style
            .positions
            .insert("price".to_string(), Offset { x: -5000, y: 9000 });
        assert!(style.validate().is_ok());
        assert_eq!(style.offset(ElementKey::Price), Offset { x: -5000, y: 9000 });
        assert_eq!(style.offset(ElementKey::Name), Offset::default());
    }

    #[test]
    fn test_style_from_toml() {
        let style: StyleConfig = toml::from_str(
            r##"
page_size = "a5"
orientation = "landscape"
factory_type = "mega"

[colors]
price = "#0000ff"

[positions.name]
y = -40
"##,
        )
        .unwrap();

        assert_eq!(style.page_size, PageSize::A5);
        assert_eq!(style.orientation, Orientation::Landscape);
        assert_eq!(style.factory_type, FactoryType::Mega);
        assert_eq!(style.colors.name, "#000000");
        assert_eq!(style.offset(ElementKey::Name), Offset { x: 0, y: -40 });
    }
}
