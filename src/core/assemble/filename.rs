//! Output file naming

use std::collections::HashSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Stem used when a product name has no usable characters
pub const FALLBACK_STEM: &str = "cartaz";

/// Turns a product name into a safe, ASCII-only file stem
///
/// Diacritics are stripped, letters lower-cased and every run of other
/// characters collapsed into a single `_`. The result never exceeds `max_len`
/// and never contains a path separator.
///
/// # Examples
///
/// ```
/// use cartaz::core::assemble::sanitize_file_stem;
///
/// assert_eq!(sanitize_file_stem("Feijão Carioca 1kg", 50), "feijao_carioca_1kg");
/// assert_eq!(sanitize_file_stem("../..", 50), "cartaz");
/// ```
pub fn sanitize_file_stem(name: &str, max_len: usize) -> String {
    let mut stem = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.nfd().filter(|c| !is_combining_mark(*c)) {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !stem.is_empty() {
                stem.push('_');
            }
            pending_separator = false;
            stem.push(c);
        } else {
            pending_separator = true;
        }
    }

    stem.truncate(max_len.max(1));
    let stem = stem.trim_end_matches('_');
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem.to_string()
    }
}

/// Hands out unique file names inside one archive
///
/// The first use of a stem keeps it as is; later uses get `_2`, `_3`, ...
/// Names are compared case-insensitively.
#[derive(Debug, Default)]
pub struct FileNamer {
    used: HashSet<String>,
    max_len: usize,
}

impl FileNamer {
    pub fn new(max_len: usize) -> Self {
        Self {
            used: HashSet::new(),
            max_len,
        }
    }

    /// Unique `.pdf` file name for a product
    ///
    /// The stem, suffix included, never exceeds `max_len`.
    pub fn pdf_name(&mut self, product: &str) -> String {
        let stem = sanitize_file_stem(product, self.max_len);
        let mut n = 1;
        loop {
            let candidate = if n == 1 {
                format!("{stem}.pdf")
            } else {
                let suffix = format!("_{n}");
                let room = self.max_len.max(1).saturating_sub(suffix.len()).max(1);
                let mut base = stem.clone();
                base.truncate(room);
                let base = base.trim_end_matches('_');
                let base = if base.is_empty() { FALLBACK_STEM } else { base };
                format!("{base}{suffix}.pdf")
            };
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Reserves a name so products can never collide with it
    pub fn reserve(&mut self, file_name: &str) {
        self.used.insert(file_name.to_ascii_lowercase());
    }
}
