//! Field-level accuracy of extracted records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::models::rate::SupplierRate;

/// A labelled evaluation case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalCase {
    /// Raw rate text.
    pub text: String,
    /// Expected field values, keyed by field name.
    pub expected: Map<String, Value>,
}

/// Outcome of comparing one record against its expected fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldScore {
    /// Number of expected fields that matched.
    pub matched: usize,
    /// Number of expected fields.
    pub total: usize,
    /// Names of expected fields that did not match.
    pub mismatched: Vec<String>,
}

impl FieldScore {
    /// Fraction of expected fields that matched. Zero expected fields score 0.
    pub fn accuracy(&self) -> f64 {
        self.matched as f64 / self.total.max(1) as f64
    }
}

/// Score an extracted record against expected field values.
pub fn field_accuracy(expected: &Map<String, Value>, produced: &SupplierRate) -> FieldScore {
    // Serializing a record cannot fail.
    let produced = serde_json::to_value(produced).unwrap_or_default();
    score_fields(expected, &produced)
}

/// Score any JSON object against expected field values.
///
/// A field matches when both values render to the same text ignoring case.
/// Strings render as their content, everything else as compact JSON with
/// numbers widened to floats, so `320` equals `320.0` and lists compare in
/// order. A field absent from `produced` renders as `null`.
pub fn score_fields(expected: &Map<String, Value>, produced: &Value) -> FieldScore {
    let mut score = FieldScore {
        total: expected.len(),
        ..Default::default()
    };

    for (name, want) in expected {
        let got = produced.get(name).unwrap_or(&Value::Null);
        if render(want).to_lowercase() == render(got).to_lowercase() {
            score.matched += 1;
        } else {
            score.mismatched.push(name.clone());
        }
    }

    score
}

/// Mean accuracy over several scores; 0 for none.
pub fn mean_accuracy(scores: &[FieldScore]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().map(FieldScore::accuracy).sum::<f64>() / scores.len() as f64
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => widen_numbers(other).to_string(),
    }
}

fn widen_numbers(value: &Value) -> Value {
    match value {
        Value::Number(n) => n
            .as_f64()
            .and_then(Number::from_f64)
            .map_or_else(|| value.clone(), Value::Number),
        Value::Array(items) => Value::Array(items.iter().map(widen_numbers).collect()),
        Value::Object(obj) => Value::Object(
            obj.iter()
                .map(|(k, v)| (k.clone(), widen_numbers(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}
