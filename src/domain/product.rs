use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A persisted catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub category: String,
    pub name: String,
    /// Price exactly as extracted from the listing page. Part of the
    /// product identity together with category and name.
    pub price: String,
    /// Price in minor currency units, derived from `price` at the
    /// extraction boundary. `None` means the raw text was not parseable.
    pub price_minor: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An extracted product that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProduct {
    pub category: String,
    pub name: String,
    pub price: String,
    pub price_minor: Option<i64>,
}

impl CandidateProduct {
    pub fn new(category: impl Into<String>, name: impl Into<String>, price: impl Into<String>) -> Self {
        let price = price.into();
        let price_minor = parse_price_minor(&price);
        Self {
            category: category.into(),
            name: name.into(),
            price,
            price_minor,
        }
    }
}

/// Partial update for a stored product; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub category: Option<String>,
    pub name: Option<String>,
    pub price: Option<String>,
}

static PRICE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d(?:[\d \u{a0}\u{202f}]*\d)?)(?:[.,](\d{1,2}))?")
        .expect("price pattern is valid")
});

/// Parse a raw price string into minor currency units.
///
/// Accepts group separators (space, NBSP, narrow NBSP) and a one- or
/// two-digit decimal part after `.` or `,`. Returns `None` when no number
/// can be found, e.g. for the `"No price"` extraction fallback.
pub fn parse_price_minor(raw: &str) -> Option<i64> {
    let caps = PRICE_RE.captures(raw)?;
    let whole: String = caps
        .get(1)?
        .as_str()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    let whole: i64 = whole.parse().ok()?;
    let frac_minor = match caps.get(2).map(|m| m.as_str()) {
        None => 0,
        Some(f) if f.len() == 1 => f.parse::<i64>().ok()? * 10,
        Some(f) => f.parse::<i64>().ok()?,
    };
    whole.checked_mul(100)?.checked_add(frac_minor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("12990", Some(1_299_000))]
    #[case("12 990 ₽", Some(1_299_000))]
    #[case("1\u{a0}299,50", Some(129_950))]
    #[case("899.9", Some(89_990))]
    #[case("0,99", Some(99))]
    #[case("No price", None)]
    #[case("", None)]
    #[case("цена по запросу", None)]
    fn parses_raw_price_text(#[case] raw: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_price_minor(raw), expected);
    }

    #[test]
    fn candidate_derives_minor_units() {
        let candidate = CandidateProduct::new("Tools", "Welder X2", "15 490 ₽");
        assert_eq!(candidate.price, "15 490 ₽");
        assert_eq!(candidate.price_minor, Some(1_549_000));
    }

    #[test]
    fn candidate_keeps_fallback_price_unparsed() {
        let candidate = CandidateProduct::new("Tools", "Welder X2", "No price");
        assert_eq!(candidate.price, "No price");
        assert_eq!(candidate.price_minor, None);
    }
}
