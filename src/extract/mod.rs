//! Extraction of records and the revision date from the source page
//!
//! Both extractors are infallible: malformed markup yields fewer records or
//! no date, never an error. The caller decides what an empty result means.

mod date;
mod patterns;
mod table;

pub use date::extract_source_date;
pub use table::{extract_records, Extraction, TableSource};

use scraper::{ElementRef, Selector};

/// Parses a CSS selector, `None` if it is invalid
fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Text of an element: every descendant text node trimmed, empty ones
/// dropped, the rest concatenated without separators
fn stripped_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}
