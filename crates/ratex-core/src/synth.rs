//! Synthetic rate texts for smoke tests and evaluation.
//!
//! Each example pairs a noisy raw text with the record a perfect extractor
//! would produce from it.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use crate::models::rate::SupplierRate;
use crate::rate::canonical_extras;

pub const AU_CITIES: [&str; 5] = ["Gold Coast", "Brisbane", "Sydney", "Melbourne", "Cairns"];

pub const NZ_CITIES: [&str; 4] = ["Queenstown", "Auckland", "Wellington", "Christchurch"];

pub const ROOM_TYPES: [&str; 5] = [
    "Deluxe Suite",
    "Ocean View King",
    "Family Room",
    "Standard Twin",
    "Superior Double",
];

/// Extras as they appear in raw text.
pub const EXTRAS: [&str; 10] = [
    "breakfast",
    "wifi",
    "parking",
    "airport pickup",
    "spa",
    "pool",
    "free cancellation",
    "non-refundable",
    "min stay 2 nights",
    "late checkout",
];

const NAME_WORDS: [&str; 12] = [
    "Harbour", "Summit", "Coral", "Kauri", "Silver", "Fern", "Lakeside", "Sunrise", "Alpine",
    "Driftwood", "Wattle", "Tui",
];

const PROPERTY_KINDS: [&str; 5] = ["Hotel", "Resort", "Lodge", "Retreat", "Stay"];

const DATE_STYLES: [&str; 4] = ["%d %b %Y", "%b %d, %Y", "%d-%m-%Y", "%Y/%m/%d"];

/// One generated text with its expected record.
#[derive(Debug, Clone)]
pub struct SyntheticExample {
    pub text: String,
    pub expected: SupplierRate,
}

/// Seedable generator of synthetic rate texts.
pub struct SyntheticGenerator {
    rng: StdRng,
    today: NaiveDate,
}

impl SyntheticGenerator {
    /// Create a reproducible generator.
    pub fn new(seed: u64, today: NaiveDate) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            today,
        }
    }

    /// Create a generator with a random seed.
    pub fn from_random_seed(today: NaiveDate) -> Self {
        Self::new(rand::random(), today)
    }

    /// Generate the next example.
    pub fn generate(&mut self) -> SyntheticExample {
        let (city, country, currency, symbol) = if self.rng.random_bool(0.5) {
            let symbol = pick(&mut self.rng, &["AU$", "$", "AUD"]);
            (pick(&mut self.rng, &AU_CITIES), "AU", "AUD", symbol)
        } else {
            let symbol = pick(&mut self.rng, &["NZ$", "$", "NZD"]);
            (pick(&mut self.rng, &NZ_CITIES), "NZ", "NZD", symbol)
        };

        let supplier = format!(
            "{} {}",
            pick(&mut self.rng, &NAME_WORDS),
            pick(&mut self.rng, &PROPERTY_KINDS)
        );
        let room = pick(&mut self.rng, &ROOM_TYPES);
        let price: u32 = self.rng.random_range(120..=520);

        let start = self.today + Duration::days(self.rng.random_range(30..=200));
        let end = start + Duration::days(self.rng.random_range(5..=20));
        let style = pick(&mut self.rng, &DATE_STYLES);
        let (d1, d2) = (start.format(style), end.format(style));

        let count = self.rng.random_range(1..=4);
        let extras: Vec<&str> = EXTRAS
            .choose_multiple(&mut self.rng, count)
            .copied()
            .collect();
        let extras_text = extras.join(", ");

        let text = match self.rng.random_range(0..3) {
            0 => format!(
                "{supplier} – {city}\n{room} | {symbol} {price}/night\nValid: {d1} to {d2}\nIncludes {extras_text}."
            ),
            1 => format!(
                "{supplier}, {city} ({country})\n{room} {currency} {price} per night\nDates: {d1} - {d2}\nExtras: {extras_text}"
            ),
            _ => format!(
                "{supplier}\nLocation: {city}\nRate: {symbol}{price} nightly\nStay window {d1}–{d2}. {extras_text}."
            ),
        };

        let expected = SupplierRate {
            supplier_name: supplier,
            location: format!("{}, {}", city, country),
            room_type: room.to_string(),
            price: Decimal::from(price),
            currency: currency.to_string(),
            valid_from: start.format("%Y-%m-%d").to_string(),
            valid_to: end.format("%Y-%m-%d").to_string(),
            extras: canonical_extras(&extras),
        };

        SyntheticExample { text, expected }
    }
}

impl Iterator for SyntheticGenerator {
    type Item = SyntheticExample;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    // Every table above is non-empty.
    items.choose(rng).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate::patterns::EXTRAS_VOCABULARY;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    #[test]
    fn test_same_seed_same_corpus() {
        let a: Vec<String> = SyntheticGenerator::new(7, today())
            .take(5)
            .map(|e| e.text)
            .collect();
        let b: Vec<String> = SyntheticGenerator::new(7, today())
            .take(5)
            .map(|e| e.text)
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_expected_record_is_consistent_with_text() {
        for example in SyntheticGenerator::new(42, today()).take(50) {
            let rate = &example.expected;
            let city = rate.location.split(", ").next().unwrap();

            assert!(example.text.starts_with(&rate.supplier_name));
            assert!(example.text.contains(city));
            assert!(example.text.contains(&rate.room_type));
            assert!(example.text.contains(&rate.price.to_string()));

            if AU_CITIES.contains(&city) {
                assert_eq!(rate.currency, "AUD");
                assert!(rate.location.ends_with(", AU"));
            } else {
                assert!(NZ_CITIES.contains(&city));
                assert_eq!(rate.currency, "NZD");
            }
        }
    }

    #[test]
    fn test_dates_within_window() {
        for example in SyntheticGenerator::new(3, today()).take(50) {
            let (from, to) = example.expected.validity_window().unwrap();
            let lead = (from - today()).num_days();
            let span = (to - from).num_days();
            assert!((30..=200).contains(&lead), "lead {lead}");
            assert!((5..=20).contains(&span), "span {span}");
        }
    }

    #[test]
    fn test_expected_extras_canonical() {
        for example in SyntheticGenerator::new(11, today()).take(50) {
            let extras = &example.expected.extras;
            assert!(!extras.is_empty() && extras.len() <= 4);
            assert!(extras.iter().all(|e| EXTRAS_VOCABULARY.contains(&e.as_str())));
            assert!(extras.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
