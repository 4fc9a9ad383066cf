//! Deterministic lexical cleanup of raw rate text.

use super::patterns::{DASH_DATE_RANGE, WHITESPACE};

/// Normalize raw text before it is placed in a prompt.
///
/// Collapses whitespace, rewrites currency symbols into three-letter hints
/// and expands shared-month date ranges. Accepts any input, including empty.
pub fn normalize(raw: &str) -> String {
    let text = normalize_whitespace(raw);
    let text = normalize_currency_symbols(&text);
    normalize_date_ranges(&text)
}

/// Collapse every whitespace run to a single space and trim.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Rewrite currency symbols as padded codes.
///
/// `NZ$` becomes ` NZD `, `AU$` becomes ` AUD `, and a bare `$` that does not
/// follow an uppercase ASCII letter becomes ` AUD ` together with any
/// whitespace after it.
pub fn normalize_currency_symbols(text: &str) -> String {
    let text = text.replace("NZ$", " NZD ").replace("AU$", " AUD ");

    let mut out = String::with_capacity(text.len() + 8);
    let mut prev: Option<char> = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && !prev.is_some_and(|p| p.is_ascii_uppercase()) {
            out.push_str(" AUD ");
            prev = Some(c);
            while let Some(&next) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                prev = Some(next);
                chars.next();
            }
            continue;
        }
        out.push(c);
        prev = Some(c);
    }

    out
}

/// Expand `D-D Month Year` into `D Month Year to D Month Year`.
pub fn normalize_date_ranges(text: &str) -> String {
    DASH_DATE_RANGE
        .replace_all(text, "$1 $3 $4 to $2 $3 $4")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(normalize_whitespace("  a \n\t b  "), "a b");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(normalize_currency_symbols("NZ$250"), " NZD 250");
        assert_eq!(normalize_currency_symbols("AU$ 99"), " AUD  99");
        assert_eq!(normalize_currency_symbols("Rate: $ 180"), "Rate:  AUD 180");
        assert_eq!(normalize_currency_symbols("$250/night"), " AUD 250/night");
    }

    #[test]
    fn test_dollar_after_uppercase_kept() {
        assert_eq!(normalize_currency_symbols("US$100"), "US$100");
    }

    #[test]
    fn test_repeated_dollars_all_rewritten() {
        assert_eq!(normalize_currency_symbols("$$"), " AUD  AUD ");
    }

    #[test]
    fn test_date_range_expansion() {
        assert_eq!(
            normalize_date_ranges("Valid: 1–15 Dec 2025."),
            "Valid: 1 Dec 2025 to 15 Dec 2025."
        );
        assert_eq!(
            normalize_date_ranges("10 - 20 jan 2026"),
            "10 jan 2026 to 20 jan 2026"
        );
    }

    #[test]
    fn test_month_first_range_untouched() {
        let text = "Dates: Jan 10 - Jan 20, 2026";
        assert_eq!(normalize_date_ranges(text), text);
    }

    #[test]
    fn test_normalize_full() {
        let raw = "Luxury Stay Hotel, Queenstown\nDeluxe Suite $250/night (NZD). Valid: 1–15 Dec 2025. Includes breakfast, WiFi.";
        assert_eq!(
            normalize(raw),
            "Luxury Stay Hotel, Queenstown Deluxe Suite  AUD 250/night (NZD). Valid: 1 Dec 2025 to 15 Dec 2025. Includes breakfast, WiFi."
        );
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent_without_symbols() {
        let inputs = [
            "Ocean Breeze Resort - Gold Coast\nOcean View King | AUD 320 per night",
            "  Family Room   NZD 199 per night\n\nExtras: spa; pool ",
            "Stay window 2026/03/01 to 2026/03/09.",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }
}
