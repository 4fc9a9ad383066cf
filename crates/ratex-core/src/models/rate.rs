//! Supplier rate record.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single supplier rate extracted from free-form text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierRate {
    /// Supplier or property name, e.g. "Luxury Stay Hotel".
    pub supplier_name: String,

    /// City plus country code, e.g. "Queenstown, NZ".
    pub location: String,

    /// Room or product type, e.g. "Deluxe Suite".
    pub room_type: String,

    /// Nightly price, never negative.
    #[serde(with = "price_serde")]
    pub price: Decimal,

    /// Three-letter currency code.
    pub currency: String,

    /// Start of validity, expected as YYYY-MM-DD.
    pub valid_from: String,

    /// End of validity, expected as YYYY-MM-DD.
    pub valid_to: String,

    /// Extras such as "breakfast" or "free cancellation".
    #[serde(default)]
    pub extras: Vec<String>,
}

impl SupplierRate {
    /// Parse the validity window as calendar dates.
    ///
    /// Returns `None` if either date is not in YYYY-MM-DD form.
    pub fn validity_window(&self) -> Option<(NaiveDate, NaiveDate)> {
        let from = parse_iso_date(&self.valid_from)?;
        let to = parse_iso_date(&self.valid_to)?;
        Some((from, to))
    }

    /// Check the validity dates and return any issues found.
    ///
    /// These are warnings only: extraction accepts any date string.
    pub fn date_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        let from = parse_iso_date(&self.valid_from);
        let to = parse_iso_date(&self.valid_to);

        if from.is_none() {
            issues.push(format!(
                "valid_from is not an ISO date: {:?}",
                self.valid_from
            ));
        }
        if to.is_none() {
            issues.push(format!("valid_to is not an ISO date: {:?}", self.valid_to));
        }

        if let (Some(from), Some(to)) = (from, to) {
            if to < from {
                issues.push(format!(
                    "valid_to ({}) is before valid_from ({})",
                    to, from
                ));
            }
        }

        issues
    }

    /// Number of nights covered by the validity window, if the dates parse.
    pub fn nights(&self) -> Option<i64> {
        self.validity_window()
            .map(|(from, to)| (to - from).num_days())
    }
}

fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Serialize prices as JSON numbers: integers when whole, floats otherwise.
mod price_serde {
    use std::str::FromStr;

    use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
    use rust_decimal::Decimal;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(price: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        let normalized = price.normalize();
        if normalized.fract().is_zero() {
            if let Some(whole) = normalized.to_i64() {
                return serializer.serialize_i64(whole);
            }
        }
        match normalized.to_f64() {
            Some(value) => serializer.serialize_f64(value),
            None => serializer.serialize_str(&normalized.to_string()),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match &value {
            serde_json::Value::Number(n) => Decimal::from_str(&n.to_string())
                .or_else(|_| Decimal::from_scientific(&n.to_string()))
                .ok()
                .or_else(|| n.as_f64().and_then(Decimal::from_f64))
                .ok_or_else(|| D::Error::custom(format!("invalid price: {}", n))),
            serde_json::Value::String(s) => Decimal::from_str(s.trim())
                .map_err(|_| D::Error::custom(format!("invalid price: {}", s))),
            other => Err(D::Error::custom(format!("invalid price: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn sample() -> SupplierRate {
        SupplierRate {
            supplier_name: "Luxury Stay Hotel".to_string(),
            location: "Queenstown, NZ".to_string(),
            room_type: "Deluxe Suite".to_string(),
            price: Decimal::from(250),
            currency: "NZD".to_string(),
            valid_from: "2025-12-01".to_string(),
            valid_to: "2025-12-15".to_string(),
            extras: vec!["breakfast".to_string(), "wifi".to_string()],
        }
    }

    #[test]
    fn test_serializes_all_fields_with_integer_price() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"supplier_name":"Luxury Stay Hotel","location":"Queenstown, NZ","room_type":"Deluxe Suite","price":250,"currency":"NZD","valid_from":"2025-12-01","valid_to":"2025-12-15","extras":["breakfast","wifi"]}"#
        );
    }

    #[test]
    fn test_fractional_price_is_float() {
        let mut rate = sample();
        rate.price = Decimal::from_str("199.50").unwrap();
        let value = serde_json::to_value(&rate).unwrap();
        assert_eq!(value["price"], serde_json::json!(199.5));
    }

    #[test]
    fn test_deserialize_price_from_number_or_string() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["price"] = serde_json::json!("320.00");
        let rate: SupplierRate = serde_json::from_value(value).unwrap();
        assert_eq!(rate.price, Decimal::from(320));
    }

    #[test]
    fn test_date_issues_clean() {
        assert!(sample().date_issues().is_empty());
        assert_eq!(sample().nights(), Some(14));
    }

    #[test]
    fn test_date_issues_flag_non_iso_and_inverted() {
        let mut rate = sample();
        rate.valid_from = "1 Dec 2025".to_string();
        assert_eq!(rate.date_issues().len(), 1);
        assert_eq!(rate.validity_window(), None);

        let mut rate = sample();
        rate.valid_from = "2025-12-20".to_string();
        let issues = rate.date_issues();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("before"));
    }
}
