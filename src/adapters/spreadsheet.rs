//! Product list import
//!
//! Products come from the first sheet of a spreadsheet (xlsx, xls, ods) whose
//! first row holds the column headers, or from a JSON array of product records.
//! Headers are matched ignoring case, accents and surrounding whitespace, so
//! `PREÇO`, `Preco` and `preço` all map to the price column.

use crate::core::render::format_price;
use crate::domain::{AppError, ProductRecord, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate};
use std::path::Path;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const DEFAULT_NAME: &str = "Produto";
const DEFAULT_UNIT: &str = "Un";
const DEFAULT_PRICE: &str = "0,00";

/// Product field a spreadsheet column feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    Price,
    Cents,
    OldPrice,
    Unit,
    Limit,
    Footer,
    Subtitle,
    Quantity,
}

impl Column {
    fn from_header(header: &str) -> Option<Self> {
        let column = match normalize_header(header).as_str() {
            "produto" | "nome" => Column::Name,
            "preco" => Column::Price,
            "preco cent." | "preco cent" | "centavos" => Column::Cents,
            "de" | "preco de" => Column::OldPrice,
            "unidade" => Column::Unit,
            "limite" => Column::Limit,
            "data" => Column::Footer,
            "subtitulo" => Column::Subtitle,
            "quantidade" | "leve" => Column::Quantity,
            _ => return None,
        };
        Some(column)
    }
}

/// Lower-cases a header and strips its accents
fn normalize_header(header: &str) -> String {
    header
        .trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Imports products from a spreadsheet or a JSON file
///
/// The format is chosen by file extension. Nothing is returned unless the whole
/// file is readable.
///
/// # Errors
///
/// Returns [`AppError::Import`] if the file cannot be opened or parsed, or if
/// the sheet has no recognizable product columns.
pub fn import_products(path: impl AsRef<Path>) -> Result<Vec<ProductRecord>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let products = match extension.as_str() {
        "json" => import_json(path)?,
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => import_sheet(path)?,
        other => {
            return Err(AppError::Import(format!(
                "Unsupported product file type '{other}' ({})",
                path.display()
            )))
        }
    };

    tracing::info!(
        file = %path.display(),
        products = products.len(),
        "Imported product list"
    );

    Ok(products)
}

fn import_json(path: &Path) -> Result<Vec<ProductRecord>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Import(format!("Failed to read {}: {e}", path.display()))
    })?;
    serde_json::from_str(&contents)
        .map_err(|e| AppError::Import(format!("Invalid product list {}: {e}", path.display())))
}

fn import_sheet(path: &Path) -> Result<Vec<ProductRecord>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| AppError::Import(format!("Failed to open {}: {e}", path.display())))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::Import(format!("{} has no sheets", path.display())))??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };

    let columns: Vec<Option<Column>> = header_row
        .iter()
        .map(|cell| Column::from_header(&cell.to_string()))
        .collect();

    if !columns
        .iter()
        .any(|c| matches!(c, Some(Column::Name) | Some(Column::Price)))
    {
        return Err(AppError::Import(format!(
            "{} has no product or price column in its first row",
            path.display()
        )));
    }

    let mut products = Vec::new();
    for (row_index, row) in rows.enumerate() {
        if row.iter().all(|cell| cell_text(cell).is_none()) {
            tracing::debug!(row = row_index + 2, "Skipping blank row");
            continue;
        }
        products.push(read_row(row, &columns));
    }

    Ok(products)
}

fn read_row(row: &[Data], columns: &[Option<Column>]) -> ProductRecord {
    let mut product = ProductRecord::new(DEFAULT_NAME, DEFAULT_PRICE, DEFAULT_UNIT);
    let mut price_cell: Option<&Data> = None;
    let mut cents: Option<String> = None;

    for (cell, column) in row.iter().zip(columns) {
        let Some(column) = column else { continue };
        match column {
            Column::Price => price_cell = Some(cell),
            Column::Cents => cents = cents_text(cell),
            Column::Name => {
                if let Some(name) = cell_text(cell) {
                    product.name = name;
                }
            }
            Column::Unit => {
                if let Some(unit) = cell_text(cell) {
                    product.unit = unit;
                }
            }
            Column::OldPrice => product.old_price = price_text(cell),
            Column::Limit => product.limit = cell_text(cell),
            Column::Footer => product.footer = date_text(cell),
            Column::Subtitle => product.subtitle = cell_text(cell),
            Column::Quantity => product.quantity = cell_text(cell),
        }
    }

    product.price = match (price_cell, cents) {
        (Some(cell), Some(cents)) => {
            let integer = match cell {
                Data::Float(f) => format!("{}", f.trunc() as i64),
                Data::Int(i) => i.to_string(),
                other => cell_text(other)
                    .map(|s| s.split(',').next().unwrap_or_default().to_string())
                    .unwrap_or_else(|| "0".to_string()),
            };
            format!("{integer},{cents}")
        }
        (Some(cell), None) => price_text(cell).unwrap_or_else(|| DEFAULT_PRICE.to_string()),
        (None, _) => DEFAULT_PRICE.to_string(),
    };

    product
}

/// Text content of a cell, `None` when blank
///
/// Whole numbers print without decimals (`3.0` is `"3"`).
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
    };
    (!text.is_empty()).then_some(text)
}

/// Cents cells always print as two digits
///
/// A fractional number is read as a fraction of the unit (`0.9` is `"90"`).
fn cents_text(cell: &Data) -> Option<String> {
    let cents = match cell {
        Data::Float(f) if f.fract() != 0.0 => (f.fract().abs() * 100.0).round() as i64,
        Data::Float(f) => *f as i64,
        Data::Int(i) => *i,
        other => {
            let digits: String = cell_text(other)?
                .chars()
                .filter(char::is_ascii_digit)
                .take(2)
                .collect();
            return (!digits.is_empty()).then(|| format!("{digits:0>2}"));
        }
    };
    Some(format!("{:02}", cents.clamp(0, 99)))
}

/// Price cells: numbers are formatted with two decimals and a comma
fn price_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Float(f) => Some(format_price(*f)),
        Data::Int(i) => Some(format_price(*i as f64)),
        other => cell_text(other),
    }
}

/// Date cells print as `dd/mm/yyyy`; anything else is kept as typed
fn date_text(cell: &Data) -> Option<String> {
    match cell {
        Data::DateTime(dt) => excel_serial_date(dt.as_f64())
            .map(|date| date.format("%d/%m/%Y").to_string())
            .or_else(|| cell_text(cell)),
        other => cell_text(other),
    }
}

/// Converts an Excel serial day number (1900 date system)
fn excel_serial_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::try_days(serial.trunc() as i64)?)
}
