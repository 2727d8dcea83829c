//! Poster template
//!
//! Turns a product and a style into a [`RenderTarget`]. Every region starts at
//! its default position for the orientation and is then moved by the style's
//! per-element offset.

use super::layout::{
    approx_text_width, wrap_text, Align, BaseLayout, Element, ElementKind, Fill, Rect, RenderTarget,
    Rgb, TextBlock,
};
use super::price::split_price;
use crate::domain::style::{parse_hex_color, Dimensions, ElementKey, FactoryType, StyleConfig};
use crate::domain::{ProductRecord, RenderError};

const BANNER_FILL: Rgb = [220, 38, 38];
const FOOTER_FILL: Rgb = [250, 204, 21];
const FOOTER_TEXT: Rgb = [153, 27, 27];
const MUTED_TEXT: Rgb = [100, 116, 139];
const UNIT_TAG_FILL: Rgb = [226, 232, 240];
const UNIT_TAG_TEXT: Rgb = [51, 65, 85];
const WHITE: Rgb = [255, 255, 255];

const CURRENCY: &str = "R$";
const DEFAULT_BANNER_TEXT: &str = "OFERTA ESPECIAL";
const DEFAULT_FOOTER_TEXT: &str = "Oferta válida enquanto durarem os estoques";

/// Smallest font the name is shrunk to when it does not fit its band
const MIN_NAME_SIZE: f32 = 24.0;

/// Lays out one poster
///
/// Returns `None` when there is no product to draw.
///
/// # Examples
///
/// ```
/// use cartaz::core::render::render;
/// use cartaz::domain::{ElementKey, ProductRecord, StyleConfig};
///
/// let style = StyleConfig::default();
/// let product = ProductRecord::new("ARROZ TIPO 1", "9,99", "Kg");
/// let target = render(Some(&product), &style, style.dimensions()).unwrap();
///
/// assert_eq!(target.texts_for(ElementKey::Price), vec!["R$", "9", ",99"]);
/// assert!(render(None, &style, style.dimensions()).is_none());
/// ```
pub fn render(
    product: Option<&ProductRecord>,
    style: &StyleConfig,
    dimensions: Dimensions,
) -> Option<RenderTarget> {
    let product = product?;
    let base = BaseLayout::for_canvas(dimensions, style.orientation);
    let mut canvas = Canvas::new(style);

    let name_color = parse_hex_color(&style.colors.name).unwrap_or([0, 0, 0]);
    let price_color = parse_hex_color(&style.colors.price).unwrap_or([204, 0, 0]);

    // Banner
    match &style.images.banner {
        Some(source) => canvas.push(
            ElementKey::Banner,
            base.banner,
            ElementKind::Image {
                source: source.clone(),
            },
        ),
        None => {
            canvas.push(
                ElementKey::Banner,
                base.banner,
                ElementKind::Panel { color: BANNER_FILL },
            );
            let size = (base.banner.height as f32 * 0.35).min(60.0);
            canvas.push_text(
                ElementKey::Banner,
                base.banner,
                TextBlock::single(DEFAULT_BANNER_TEXT, size, WHITE).centered(),
            );
        }
    }

    // Name
    let name = product.name.trim().to_uppercase();
    let name_block = fit_name(
        &name,
        base.name_size * percent(style.scale.name),
        base.name,
        name_color,
    );
    canvas.push_text(ElementKey::Name, base.name, name_block);

    if let Some(subtitle) = product.subtitle_text() {
        let size = (base.subtitle.height as f32 * 0.8).min(36.0);
        canvas.push_text(
            ElementKey::Subtitle,
            base.subtitle,
            TextBlock::single(subtitle, size, name_color).centered(),
        );
    }

    // Mega posters sell a bundle: the offer line replaces the unit tag
    let is_mega = style.factory_type == FactoryType::Mega;
    if is_mega {
        let quantity = product.quantity_text().unwrap_or("1");
        let offer = format!("LEVE {} {}", quantity, product.unit.trim().to_uppercase());
        let size = (base.offer.height as f32 * 0.9).min(48.0);
        canvas.push_text(
            ElementKey::Offer,
            base.offer,
            TextBlock::single(offer.trim_end(), size, price_color).centered(),
        );
    }

    // Presence of the value matters, not just the flag
    if style.show_old_price {
        if let Some(old_price) = product.old_price_text() {
            canvas.push_text(
                ElementKey::OldPrice,
                base.old_price,
                TextBlock::single(format!("De {CURRENCY} {old_price}"), 40.0, MUTED_TEXT)
                    .centered()
                    .struck(),
            );
        }
    }

    layout_price(
        &mut canvas,
        product,
        &base,
        percent(style.scale.price),
        price_color,
        !is_mega,
    );

    if let Some(limit) = product.limit_text() {
        let size = 26.0 * percent(style.scale.limit);
        canvas.push_text(
            ElementKey::Limit,
            base.limit,
            TextBlock::single(format!("LIMITE: {}", limit.to_uppercase()), size, MUTED_TEXT)
                .centered(),
        );
    }

    // Footer band
    canvas.push(
        ElementKey::Footer,
        base.footer,
        ElementKind::Panel { color: FOOTER_FILL },
    );
    let footer = product.footer_text().unwrap_or(DEFAULT_FOOTER_TEXT);
    canvas.push_text(
        ElementKey::Footer,
        Rect {
            y: base.footer.y + (base.footer.height as i32 - 22) / 2,
            ..base.footer
        },
        TextBlock::single(footer, 20.0, FOOTER_TEXT).centered(),
    );

    Some(canvas.finish(dimensions, style))
}

/// Checks that a product can be laid out with a style
pub fn check_renderable(product: &ProductRecord, style: &StyleConfig) -> Result<(), RenderError> {
    product.validate().map_err(RenderError::InvalidProduct)?;
    if style.factory_type == FactoryType::Mega && product.quantity_text().is_none() {
        return Err(RenderError::InvalidProduct(format!(
            "'{}' has no bundle quantity for the mega layout",
            product.name.trim()
        )));
    }
    Ok(())
}

/// Currency, integer digits, fraction and unit tag, centred as one group
fn layout_price(
    canvas: &mut Canvas<'_>,
    product: &ProductRecord,
    base: &BaseLayout,
    scale: f32,
    color: Rgb,
    with_unit: bool,
) {
    let parts = split_price(&product.price);
    let fraction = parts.fraction_label();
    let unit = product.unit.trim().to_uppercase();
    let row = base.price;

    let integer_size = (base.price_size * scale).min(row.height as f32);
    let fraction_size = integer_size * (100.0 / 280.0);
    let currency_size = integer_size * 0.25;
    let unit_size = 30.0;

    let currency_width = approx_text_width(CURRENCY, currency_size);
    let integer_width = approx_text_width(&parts.integer, integer_size);
    let unit_width = if with_unit {
        approx_text_width(&unit, unit_size) + 20.0
    } else {
        0.0
    };
    let tail_width = approx_text_width(&fraction, fraction_size).max(unit_width);
    let total = currency_width + 15.0 + integer_width + 10.0 + tail_width;

    let mut x = row.x as f32 + (row.width as f32 - total) / 2.0;
    let top = row.y;

    place(
        canvas,
        ElementKey::Price,
        x,
        top,
        (integer_size * 0.07) as i32,
        currency_width,
        TextBlock::single(CURRENCY, currency_size, color),
    );
    x += currency_width + 15.0;

    place(
        canvas,
        ElementKey::Price,
        x,
        top,
        0,
        integer_width,
        TextBlock::single(parts.integer.clone(), integer_size, color),
    );
    x += integer_width + 10.0;

    let fraction_top = (integer_size * 0.1) as i32;
    place(
        canvas,
        ElementKey::Price,
        x,
        top,
        fraction_top,
        tail_width,
        TextBlock::single(fraction, fraction_size, color),
    );

    if with_unit && !unit.is_empty() {
        let tag = Rect {
            x: x.round() as i32,
            y: top + fraction_top + (fraction_size * 1.1) as i32 + 10,
            width: unit_width.ceil() as u32,
            height: (unit_size * 1.4) as u32,
        };
        canvas.push(ElementKey::Unit, tag, ElementKind::Panel { color: UNIT_TAG_FILL });
        canvas.push_text(
            ElementKey::Unit,
            Rect {
                y: tag.y + (unit_size * 0.2) as i32,
                ..tag
            },
            TextBlock::single(unit, unit_size, UNIT_TAG_TEXT).centered(),
        );
    }
}

/// Pushes a single-line text block whose box sits `dy` below the price row top
fn place(
    canvas: &mut Canvas<'_>,
    key: ElementKey,
    x: f32,
    top: i32,
    dy: i32,
    width: f32,
    block: TextBlock,
) {
    let rect = Rect {
        x: x.round() as i32,
        y: top + dy,
        width: width.ceil().max(1.0) as u32,
        height: (block.line_height.ceil() as u32).max(1),
    };
    canvas.push_text(key, rect, block);
}

/// Wraps the name and shrinks it until it fits the name band
fn fit_name(name: &str, size: f32, band: Rect, color: Rgb) -> TextBlock {
    let mut size = size;
    loop {
        let lines = wrap_text(name, size, band.width);
        let line_height = size * 1.1;
        let fits = lines.len() as f32 * line_height <= band.height as f32;
        if fits || size <= MIN_NAME_SIZE {
            return TextBlock {
                lines,
                size,
                line_height,
                color,
                align: Align::Center,
                strikethrough: false,
            };
        }
        size = (size * 0.9).max(MIN_NAME_SIZE);
    }
}

fn percent(value: u32) -> f32 {
    value as f32 / 100.0
}

/// Collects elements and applies per-element offsets
struct Canvas<'a> {
    style: &'a StyleConfig,
    elements: Vec<Element>,
}

impl<'a> Canvas<'a> {
    fn new(style: &'a StyleConfig) -> Self {
        Self {
            style,
            elements: Vec::new(),
        }
    }

    fn push(&mut self, key: ElementKey, rect: Rect, kind: ElementKind) {
        let offset = self.style.offset(key);
        self.elements.push(Element {
            key,
            x: rect.x.saturating_add(offset.x),
            y: rect.y.saturating_add(offset.y),
            width: rect.width,
            height: rect.height,
            kind,
        });
    }

    fn push_text(&mut self, key: ElementKey, rect: Rect, block: TextBlock) {
        self.push(key, rect, ElementKind::Text(block));
    }

    fn finish(self, dimensions: Dimensions, style: &StyleConfig) -> RenderTarget {
        let background = match &style.images.background {
            Some(source) => Fill::Image(source.clone()),
            None => Fill::Color(parse_hex_color(&style.background_color).unwrap_or(WHITE)),
        };
        RenderTarget {
            dimensions,
            background,
            elements: self.elements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::style::{Offset, Orientation};

    fn picanha() -> ProductRecord {
        ProductRecord::new("Picanha Bovina Corte Premium", "69,90", "Kg")
            .with_old_price("89,90")
            .with_limit("5 un/cliente")
    }

    #[test]
    fn test_price_is_split_for_display() {
        let style = StyleConfig::default();
        let target = render(Some(&picanha()), &style, style.dimensions()).unwrap();

        assert_eq!(target.texts_for(ElementKey::Price), vec!["R$", "69", ",90"]);
        assert_eq!(target.texts_for(ElementKey::Unit), vec!["KG"]);
    }

    #[test]
    fn test_old_price_needs_flag_and_value() {
        let mut style = StyleConfig::default();
        let without_old = ProductRecord::new("LEITE", "4,99", "Un");
        let target = render(Some(&without_old), &style, style.dimensions()).unwrap();
        assert!(target.element(ElementKey::OldPrice).is_none());

        let target = render(Some(&picanha()), &style, style.dimensions()).unwrap();
        assert_eq!(
            target.texts_for(ElementKey::OldPrice),
            vec!["De R$ 89,90".to_string()]
        );

        style.show_old_price = false;
        let target = render(Some(&picanha()), &style, style.dimensions()).unwrap();
        assert!(target.element(ElementKey::OldPrice).is_none());
    }

    #[test]
    fn test_offsets_move_elements() {
        let style = StyleConfig::default();
        let moved = {
            let mut s = style.clone();
            s.positions
                .insert("limit".to_string(), Offset { x: 12, y: -30 });
            s
        };

        let base = render(Some(&picanha()), &style, style.dimensions()).unwrap();
        let shifted = render(Some(&picanha()), &moved, moved.dimensions()).unwrap();

        let a = base.element(ElementKey::Limit).unwrap();
        let b = shifted.element(ElementKey::Limit).unwrap();
        assert_eq!(b.x - a.x, 12);
        assert_eq!(b.y - a.y, -30);
        assert_eq!(
            base.element(ElementKey::Name).unwrap().y,
            shifted.element(ElementKey::Name).unwrap().y
        );
    }

    #[test]
    fn test_landscape_uses_landscape_canvas() {
        let style = StyleConfig {
            orientation: Orientation::Landscape,
            ..StyleConfig::default()
        };
        let target = render(Some(&picanha()), &style, style.dimensions()).unwrap();
        assert_eq!(target.dimensions, Dimensions::new(1123, 794));
    }

    #[test]
    fn test_mega_layout_replaces_unit_with_offer() {
        let style = StyleConfig {
            factory_type: FactoryType::Mega,
            ..StyleConfig::default()
        };
        let product = ProductRecord::new("Refrigerante 2L", "19,90", "Un").with_quantity("3");
        let target = render(Some(&product), &style, style.dimensions()).unwrap();

        assert_eq!(target.texts_for(ElementKey::Offer), vec!["LEVE 3 UN"]);
        assert!(target.element(ElementKey::Unit).is_none());
    }

    #[test]
    fn test_check_renderable() {
        let style = StyleConfig {
            factory_type: FactoryType::Mega,
            ..StyleConfig::default()
        };
        let product = ProductRecord::new("Refrigerante 2L", "19,90", "Un");
        assert!(matches!(
            check_renderable(&product, &style),
            Err(RenderError::InvalidProduct(_))
        ));
        assert!(check_renderable(&product, &StyleConfig::default()).is_ok());
    }

    #[test]
    fn test_long_name_shrinks_to_fit() {
        let style = StyleConfig::default();
        let product = ProductRecord::new(
            "Sabao em po concentrado lavagem perfeita com amaciante embalagem economica",
            "29,90",
            "Un",
        );
        let target = render(Some(&product), &style, style.dimensions()).unwrap();
        let name = target.element(ElementKey::Name).unwrap();
        match &name.kind {
            ElementKind::Text(block) => {
                assert!(block.size < 80.0);
                assert!(block.lines.len() > 1);
            }
            other => panic!("unexpected element {other:?}"),
        }
    }

    #[test]
    fn test_image_refs_are_collected() {
        let mut style = StyleConfig::default();
        style.images.banner = Some("assets/banner.png".to_string());
        style.images.background = Some("assets/bg.png".to_string());
        let target = render(Some(&picanha()), &style, style.dimensions()).unwrap();

        assert_eq!(
            target.image_refs(),
            vec!["assets/bg.png", "assets/banner.png"]
        );
    }
}
