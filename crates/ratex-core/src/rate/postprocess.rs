//! Canonicalization of currency codes and extras.

use std::collections::BTreeSet;

use crate::models::rate::SupplierRate;

use super::patterns::{CURRENCY_ALIASES, EXTRAS_DELIMITER, EXTRAS_VOCABULARY, NZ_MARKERS};

/// Currencies a postprocessed record can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    Aud,
    Nzd,
}

impl Currency {
    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Aud => "AUD",
            Currency::Nzd => "NZD",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "AUD" => Some(Currency::Aud),
            "NZD" => Some(Currency::Nzd),
            _ => None,
        }
    }
}

/// Rewrite currency and extras of a validated record.
///
/// `raw_text` is the input as received, before normalization.
pub fn postprocess(rate: SupplierRate, raw_text: &str) -> SupplierRate {
    let currency = canonical_currency(&rate.currency, raw_text);
    let extras = canonical_extras(&rate.extras);

    SupplierRate {
        currency: currency.code().to_string(),
        extras,
        ..rate
    }
}

/// Map a currency value onto AUD or NZD.
///
/// Known aliases map directly. Anything else is NZD when the raw text carries
/// a New Zealand marker, and AUD otherwise.
pub fn canonical_currency(value: &str, raw_text: &str) -> Currency {
    let value = value.trim().to_uppercase();

    if let Some(currency) = CURRENCY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == value)
        .and_then(|(_, code)| Currency::from_code(code))
    {
        return currency;
    }

    if NZ_MARKERS.iter().any(|marker| raw_text.contains(marker)) {
        Currency::Nzd
    } else {
        Currency::Aud
    }
}

/// Split a free-text extras value on `,` `;` newline `|` and `/`.
pub fn split_extras(text: &str) -> Vec<String> {
    EXTRAS_DELIMITER.split(text).map(str::to_string).collect()
}

/// Reduce extras to the canonical vocabulary, sorted and deduplicated.
///
/// A phrase matches when it appears as whole words anywhere in the
/// space-joined, lowercased items.
pub fn canonical_extras<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    let joined = items
        .iter()
        .map(|item| item.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let haystack = format!(" {} ", joined);

    EXTRAS_VOCABULARY
        .iter()
        .filter(|token| haystack.contains(&format!(" {} ", token)))
        .map(|token| token.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
