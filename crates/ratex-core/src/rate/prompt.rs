//! Few-shot completion prompt construction.

use std::io;

use lazy_static::lazy_static;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::ser::Formatter;

use crate::models::rate::SupplierRate;

/// Fixed instruction block naming every output field.
pub const INSTRUCTIONS: &str = "You are a tourism supplier parser.\n\
Extract the following fields and return ONLY valid JSON (no prose):\n\
supplier_name (string), location (string), room_type (string), price (number), currency (3-letter code), \
valid_from (YYYY-MM-DD), valid_to (YYYY-MM-DD), extras (list of strings).\n\n\
Use the examples to match the exact JSON shape.\n\n";

/// Suffix appended for the strict retry.
pub const STRICT_SUFFIX: &str = "\nReturn ONLY JSON. No comments. No backticks. No extra text.\n";

/// An input text paired with the record it should produce.
#[derive(Debug, Clone)]
pub struct FewShotExample {
    pub input: &'static str,
    pub output: SupplierRate,
}

impl FewShotExample {
    fn render(&self) -> String {
        // Serializing a plain struct of strings and numbers cannot fail.
        let output = to_spaced_json(&self.output).unwrap_or_default();
        format!(
            "### Example Input\n{}\n### Example Output\n{}",
            self.input, output
        )
    }
}

/// Single-line JSON with `", "` and `": "` separators.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

fn to_spaced_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

lazy_static! {
    pub static ref FEW_SHOT_EXAMPLES: [FewShotExample; 2] = [
        FewShotExample {
            input: "Luxury Stay Hotel, Queenstown\nDeluxe Suite $250/night (NZD). Valid: 1–15 Dec 2025. Includes breakfast, WiFi.",
            output: SupplierRate {
                supplier_name: "Luxury Stay Hotel".to_string(),
                location: "Queenstown, NZ".to_string(),
                room_type: "Deluxe Suite".to_string(),
                price: Decimal::from(250),
                currency: "NZD".to_string(),
                valid_from: "2025-12-01".to_string(),
                valid_to: "2025-12-15".to_string(),
                extras: vec!["breakfast".to_string(), "wifi".to_string()],
            },
        },
        FewShotExample {
            input: "Ocean Breeze Resort - Gold Coast\nOcean View King | AUD 320 per night\nDates: Jan 10 - Jan 20, 2026\nExtras: Parking included. Free cancellation before Jan 5.",
            output: SupplierRate {
                supplier_name: "Ocean Breeze Resort".to_string(),
                location: "Gold Coast, AU".to_string(),
                room_type: "Ocean View King".to_string(),
                price: Decimal::from(320),
                currency: "AUD".to_string(),
                valid_from: "2026-01-10".to_string(),
                valid_to: "2026-01-20".to_string(),
                extras: vec!["parking".to_string(), "free cancellation".to_string()],
            },
        },
    ];

    static ref RENDERED_SHOTS: String = FEW_SHOT_EXAMPLES
        .iter()
        .map(FewShotExample::render)
        .collect::<Vec<_>>()
        .join("\n\n");
}

/// Build the completion prompt for already-normalized text.
pub fn build_prompt(text: &str) -> String {
    format!(
        "{}{}\n\n### Now Parse This\n{}\n### JSON Output\n",
        INSTRUCTIONS, *RENDERED_SHOTS, text
    )
}

/// Append the strict-retry instruction to a prompt.
pub fn strict_prompt(prompt: &str) -> String {
    format!("{}{}", prompt, STRICT_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_layout() {
        let prompt = build_prompt("Some Lodge, Cairns");

        assert!(prompt.starts_with("You are a tourism supplier parser."));
        assert_eq!(prompt.matches("### Example Input").count(), 2);
        assert_eq!(prompt.matches("### Example Output").count(), 2);
        assert!(prompt.ends_with("### Now Parse This\nSome Lodge, Cairns\n### JSON Output\n"));

        let instructions_end = prompt.find("### Example Input").unwrap();
        let now_parse = prompt.find("### Now Parse This").unwrap();
        assert!(instructions_end < now_parse);
    }

    #[test]
    fn test_examples_rendered_as_spaced_json() {
        let prompt = build_prompt("x");
        assert!(prompt.contains(
            r#"{"supplier_name": "Ocean Breeze Resort", "location": "Gold Coast, AU", "room_type": "Ocean View King", "price": 320, "currency": "AUD", "valid_from": "2026-01-10", "valid_to": "2026-01-20", "extras": ["parking", "free cancellation"]}"#
        ));
    }

    #[test]
    fn test_spaced_json_nested() {
        let value = serde_json::json!({"a": [1, 2], "b": {"c": "x, y"}});
        assert_eq!(
            to_spaced_json(&value).unwrap(),
            r#"{"a": [1, 2], "b": {"c": "x, y"}}"#
        );
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(build_prompt("abc"), build_prompt("abc"));
    }

    #[test]
    fn test_strict_prompt_extends_prompt() {
        let prompt = build_prompt("abc");
        let strict = strict_prompt(&prompt);
        assert!(strict.starts_with(&prompt));
        assert!(strict.ends_with("Return ONLY JSON. No comments. No backticks. No extra text.\n"));
    }
}
