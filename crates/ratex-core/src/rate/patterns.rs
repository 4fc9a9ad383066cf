//! Common regex patterns and fixed tables for rate extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Canonical extras vocabulary.
pub const EXTRAS_VOCABULARY: [&str; 10] = [
    "breakfast",
    "wifi",
    "parking",
    "airport pickup",
    "spa",
    "pool",
    "free cancellation",
    "non-refundable",
    "min stay",
    "late checkout",
];

/// Currency spellings the postprocessor maps directly, with their code.
pub const CURRENCY_ALIASES: [(&str, &str); 5] = [
    ("AUD", "AUD"),
    ("AU$", "AUD"),
    ("$", "AUD"),
    ("NZD", "NZD"),
    ("NZ$", "NZD"),
];

/// Raw-text markers that suggest a New Zealand rate.
pub const NZ_MARKERS: [&str; 3] = [" NZD ", "New Zealand", "NZ "];

lazy_static! {
    // Text normalization
    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    // "1–15 Dec 2025", "10 - 20 Jan 2026"
    pub static ref DASH_DATE_RANGE: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\s*[-–]\s*(\d{1,2})\s*(\w+)\s*(\d{4})\b"
    ).unwrap();

    // JSON repair
    pub static ref TRAILING_COMMA: Regex = Regex::new(r",\s*([}\]])").unwrap();

    // Schema
    pub static ref CURRENCY_CODE: Regex = Regex::new(r"^[A-Z]{3}$").unwrap();

    // Free-text extras separators: comma, semicolon, newline, pipe, slash
    pub static ref EXTRAS_DELIMITER: Regex = Regex::new(r",|;|\n|\||/").unwrap();
}
