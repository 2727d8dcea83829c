//! Price formatting
//!
//! Prices are printed as a large integer part followed by a smaller fractional
//! part (`"69,90"` is drawn as `"69"` and `",90"`).

/// Decimal separator used in price strings
pub const DECIMAL_SEPARATOR: char = ',';

/// A price split for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceParts {
    /// Integer digits, printed large
    pub integer: String,
    /// Fractional digits without the separator
    pub fraction: String,
}

impl PriceParts {
    /// Fractional part as printed, including the separator (`",90"`)
    pub fn fraction_label(&self) -> String {
        format!("{DECIMAL_SEPARATOR}{}", self.fraction)
    }
}

/// Splits a locale-formatted price on its decimal separator
///
/// A missing separator (or empty fraction) defaults the fractional part to `"00"`;
/// an empty price is treated as `"0,00"`.
///
/// # Examples
///
/// ```
/// use cartaz::core::render::price::split_price;
///
/// let parts = split_price("69,90");
/// assert_eq!(parts.integer, "69");
/// assert_eq!(parts.fraction_label(), ",90");
///
/// assert_eq!(split_price("10").fraction, "00");
/// ```
pub fn split_price(price: &str) -> PriceParts {
    let price = price.trim();
    let (integer, fraction) = match price.split_once(DECIMAL_SEPARATOR) {
        Some((integer, fraction)) => (integer.trim(), fraction.trim()),
        None => (price, ""),
    };

    PriceParts {
        integer: if integer.is_empty() { "0" } else { integer }.to_string(),
        fraction: if fraction.is_empty() { "00" } else { fraction }.to_string(),
    }
}

/// Formats a numeric cell value as a price string (`9.9` becomes `"9,90"`)
pub fn format_price(value: f64) -> String {
    format!("{value:.2}").replace('.', &DECIMAL_SEPARATOR.to_string())
}
