//! Recovery of a JSON object from noisy model output.

use super::patterns::TRAILING_COMMA;

/// JSON-like text recovered from a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredJson {
    /// Best-effort JSON text. Not guaranteed to parse.
    pub text: String,
    /// Whether an object boundary (`{` ... `}`) was found.
    pub bounded: bool,
}

/// Locate the span from the first `{` to the last `}`.
pub fn find_json_block(text: &str) -> Option<&str> {
    let first = text.find('{')?;
    let last = text.rfind('}')?;
    if last > first {
        Some(&text[first..=last])
    } else {
        None
    }
}

/// Return the first-`{`-to-last-`}` span, or the whole text if there is none.
pub fn extract_json_block(text: &str) -> &str {
    find_json_block(text).unwrap_or(text)
}

/// Repair common syntax defects in model-emitted JSON.
///
/// Removes trailing commas before `}` or `]`. Text with no double quotes has
/// every single quote turned into a double quote; text mixing both has its
/// single-quoted string literals re-quoted.
pub fn repair_json(text: &str) -> String {
    let text = TRAILING_COMMA.replace_all(text, "$1");

    if !text.contains('\'') {
        return text.into_owned();
    }
    if !text.contains('"') {
        return text.replace('\'', "\"");
    }
    requote_single_quoted(&text)
}

/// Block extraction followed by syntax repair.
pub fn recover_json(completion: &str) -> RecoveredJson {
    match find_json_block(completion) {
        Some(block) => RecoveredJson {
            text: repair_json(block),
            bounded: true,
        },
        None => RecoveredJson {
            text: repair_json(completion),
            bounded: false,
        },
    }
}

/// Turn `'...'` literals that sit outside double-quoted strings into
/// `"..."` literals. Apostrophes inside double-quoted strings are kept.
fn requote_single_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                out.push('"');
                let mut escaped = false;
                for inner in chars.by_ref() {
                    out.push(inner);
                    if escaped {
                        escaped = false;
                    } else if inner == '\\' {
                        escaped = true;
                    } else if inner == '"' {
                        break;
                    }
                }
            }
            '\'' => {
                out.push('"');
                let mut escaped = false;
                for inner in chars.by_ref() {
                    if escaped {
                        if inner != '\'' {
                            out.push('\\');
                        }
                        out.push(inner);
                        escaped = false;
                    } else if inner == '\\' {
                        escaped = true;
                    } else if inner == '\'' {
                        break;
                    } else if inner == '"' {
                        out.push_str("\\\"");
                    } else {
                        out.push(inner);
                    }
                }
                out.push('"');
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_block_extraction() {
        assert_eq!(
            extract_json_block("Here you go: {\"a\": {\"b\": 1}} thanks"),
            "{\"a\": {\"b\": 1}}"
        );
        assert_eq!(extract_json_block("```json\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn test_block_extraction_without_boundary() {
        assert_eq!(extract_json_block("no json here"), "no json here");
        assert_eq!(extract_json_block("} backwards {"), "} backwards {");
        assert_eq!(extract_json_block(""), "");
    }

    #[test]
    fn test_balanced_object_returned_exactly() {
        let inputs = [
            ("prefix {\"x\": [1, 2]} suffix", "{\"x\": [1, 2]}"),
            ("{}", "{}"),
            ("text {\"a\": {\"b\": {\"c\": 3}}}", "{\"a\": {\"b\": {\"c\": 3}}}"),
        ];
        for (input, expected) in inputs {
            assert_eq!(extract_json_block(input), expected);
        }
    }

    #[test]
    fn test_trailing_commas_removed() {
        assert_eq!(
            repair_json(r#"{"a": 1, "b": [1,2,],}"#),
            r#"{"a": 1, "b": [1,2]}"#
        );
        assert_eq!(repair_json("[1, 2 ,\n ]"), "[1, 2 ]");
    }

    #[test]
    fn test_single_quotes_replaced_when_no_double_quotes() {
        assert_eq!(
            repair_json("{'supplier_name': 'X', 'price': 10}"),
            r#"{"supplier_name": "X", "price": 10}"#
        );
    }

    #[test]
    fn test_mixed_quotes_requoted() {
        assert_eq!(
            repair_json(r#"{"supplier_name": 'X', 'currency': 'nzd'}"#),
            r#"{"supplier_name": "X", "currency": "nzd"}"#
        );
    }

    #[test]
    fn test_apostrophe_inside_double_quotes_kept() {
        let text = r#"{"supplier_name": "O'Brien's Lodge", "room_type": "Twin"}"#;
        assert_eq!(repair_json(text), text);
    }

    #[test]
    fn test_valid_json_unchanged() {
        let text = r#"{"a": "b", "c": [1, 2], "d": {"e": null}}"#;
        assert_eq!(repair_json(text), text);
    }

    #[test]
    fn test_recover_reports_boundary() {
        let recovered = recover_json("sure! {'a': 1,} bye");
        assert_eq!(
            recovered,
            RecoveredJson {
                text: "{\"a\": 1}".to_string(),
                bounded: true,
            }
        );

        let recovered = recover_json("I cannot help with that.");
        assert!(!recovered.bounded);
        assert_eq!(recovered.text, "I cannot help with that.");
    }
}
