//! Regular expressions shared by the extractors
//!
//! Digit classes are ASCII-only so captured tax IDs always satisfy
//! [`TaxId`](crate::record::TaxId).

use regex::Regex;
use std::sync::LazyLock;

macro_rules! pattern {
    ($name:ident, $regex_str:expr) => {
        pub static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

// ── Tax ID annotation inside an organization name ─────────────────────────
pattern!(TAX_ID, r"(?i)(?:MST|MS|MST số)[\s:.]*([0-9]+)");

// ── The same annotation with leading space and enclosing brackets ─────────
pattern!(
    TAX_ID_ANNOTATION,
    r"(?i)\s*[(\[]?(?:MST|MS|MST số)[\s:.]*[0-9]+[\])]?"
);

// ── "Last updated" date: DD/MM then optional slash and a 4-digit year ─────
pattern!(SOURCE_DATE, r"([0-9]{2})/([0-9]{2})\s*/?\s*([0-9]{4})");
