//! Product records
//!
//! A [`ProductRecord`] is the data printed on one poster. Records are transient:
//! they come from a spreadsheet import or a JSON file and are only persisted as
//! part of a campaign snapshot.

use serde::{Deserialize, Serialize};

/// One product to be printed on a poster
///
/// Prices are kept as locale-formatted strings (`"69,90"`), exactly as typed by
/// the user or read from the spreadsheet.
///
/// # Examples
///
/// ```
/// use cartaz::domain::ProductRecord;
///
/// let product = ProductRecord::new("ARROZ TIPO 1", "9,99", "Kg")
///     .with_old_price("12,49")
///     .with_limit("5 un/cliente");
/// assert_eq!(product.old_price.as_deref(), Some("12,49"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product name (printed upper-case)
    pub name: String,

    /// Current price, comma decimal separator
    pub price: String,

    /// Previous price shown struck through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<String>,

    /// Sale unit (Un, Kg, 100g, ...)
    #[serde(default = "default_unit")]
    pub unit: String,

    /// Per-customer purchase limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,

    /// Line printed below the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Footer / validity date text
    #[serde(default, alias = "date", skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,

    /// Bundle quantity for the mega layout ("3" prints "LEVE 3")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
}

impl ProductRecord {
    /// Creates a product with the required fields
    pub fn new(name: impl Into<String>, price: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            old_price: None,
            unit: unit.into(),
            limit: None,
            subtitle: None,
            footer: None,
            quantity: None,
        }
    }

    /// Sets the old price
    pub fn with_old_price(mut self, old_price: impl Into<String>) -> Self {
        self.old_price = Some(old_price.into());
        self
    }

    /// Sets the purchase limit
    pub fn with_limit(mut self, limit: impl Into<String>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    /// Sets the subtitle
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Sets the footer text
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Sets the bundle quantity
    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = Some(quantity.into());
        self
    }

    /// Returns the old price only if it carries text
    pub fn old_price_text(&self) -> Option<&str> {
        non_blank(self.old_price.as_deref())
    }

    /// Returns the limit only if it carries text
    pub fn limit_text(&self) -> Option<&str> {
        non_blank(self.limit.as_deref())
    }

    /// Returns the subtitle only if it carries text
    pub fn subtitle_text(&self) -> Option<&str> {
        non_blank(self.subtitle.as_deref())
    }

    /// Returns the footer only if it carries text
    pub fn footer_text(&self) -> Option<&str> {
        non_blank(self.footer.as_deref())
    }

    /// Returns the bundle quantity only if it carries text
    pub fn quantity_text(&self) -> Option<&str> {
        non_blank(self.quantity.as_deref())
    }

    /// Checks that the record can be laid out
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("product name cannot be empty".to_string());
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn default_unit() -> String {
    "Un".to_string()
}
