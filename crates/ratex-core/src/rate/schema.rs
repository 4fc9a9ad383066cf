//! Schema validation of parsed model output into a `SupplierRate`.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::error::ExtractionError;
use crate::models::rate::SupplierRate;

use super::patterns::CURRENCY_CODE;
use super::postprocess::split_extras;
use super::Result;

/// Validate a parsed JSON value and build a record from it.
///
/// Date fields only need to be present as strings; their format is not
/// checked here (see `SupplierRate::date_issues`).
pub fn validate(value: &Value) -> Result<SupplierRate> {
    let obj = value
        .as_object()
        .ok_or_else(|| ExtractionError::validation("<root>", "expected a JSON object"))?;

    Ok(SupplierRate {
        supplier_name: non_empty_string(obj, "supplier_name")?,
        location: non_empty_string(obj, "location")?,
        room_type: non_empty_string(obj, "room_type")?,
        price: price(obj)?,
        currency: currency_code(obj)?,
        valid_from: required_string(obj, "valid_from")?,
        valid_to: required_string(obj, "valid_to")?,
        extras: extras(obj.get("extras")),
    })
}

/// Uppercase and trim a currency value, then check it is three letters.
pub fn normalize_currency_code(value: &str) -> Result<String> {
    let code = value.trim().to_uppercase();
    if CURRENCY_CODE.is_match(&code) {
        Ok(code)
    } else {
        Err(ExtractionError::validation(
            "currency",
            format!("must be a 3-letter code, e.g. AUD or NZD, got {:?}", value),
        ))
    }
}

fn field<'a>(obj: &'a Map<String, Value>, name: &str) -> Result<&'a Value> {
    match obj.get(name) {
        Some(Value::Null) | None => Err(ExtractionError::MissingField(name.to_string())),
        Some(value) => Ok(value),
    }
}

fn required_string(obj: &Map<String, Value>, name: &str) -> Result<String> {
    match field(obj, name)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(ExtractionError::validation(
            name,
            format!("expected a string, got {}", other),
        )),
    }
}

fn non_empty_string(obj: &Map<String, Value>, name: &str) -> Result<String> {
    let s = required_string(obj, name)?;
    if s.trim().is_empty() {
        return Err(ExtractionError::validation(name, "must not be empty"));
    }
    Ok(s)
}

fn price(obj: &Map<String, Value>) -> Result<Decimal> {
    let value = field(obj, "price")?;
    let price = match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
    .ok_or_else(|| {
        ExtractionError::validation("price", format!("expected a number, got {}", value))
    })?;

    if price.is_sign_negative() && !price.is_zero() {
        return Err(ExtractionError::validation(
            "price",
            format!("must be >= 0, got {}", price),
        ));
    }
    Ok(price)
}

fn currency_code(obj: &Map<String, Value>) -> Result<String> {
    match field(obj, "currency")? {
        Value::String(s) => normalize_currency_code(s),
        other => Err(ExtractionError::validation(
            "currency",
            format!("expected a string, got {}", other),
        )),
    }
}

fn extras(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(s)) => split_extras(s),
        Some(other) => split_extras(&other.to_string()),
    }
}
