use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::BudgetError;

static SYMBOL_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(-)?\s*([$€£])\s*(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)")
        .expect("currency pattern is valid")
});

static PLAIN_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)$").expect("amount pattern is valid")
});

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

/// Extracts an amount such as `$1,234.56` from free text.
///
/// The first `$`, `€` or `£` prefixed amount wins; a bare number like `1234.5`
/// is accepted when no symbol is present.
pub fn parse_currency(text: &str) -> Result<f64, BudgetError> {
    let trimmed = text.trim();
    let (negative, digits) = if let Some(captures) = SYMBOL_AMOUNT.captures(trimmed) {
        let digits = captures.get(3).map(|m| m.as_str()).unwrap_or_default();
        (captures.get(1).is_some(), digits)
    } else if PLAIN_AMOUNT.is_match(trimmed) {
        let digits = trimmed.trim_start_matches('-');
        (trimmed.starts_with('-'), digits)
    } else {
        return Err(BudgetError::InvalidInput(format!(
            "no currency amount in `{text}`"
        )));
    };

    let value: f64 = digits
        .replace(',', "")
        .parse()
        .map_err(|_| BudgetError::InvalidInput(format!("bad currency amount `{text}`")))?;
    Ok(if negative { -value } else { value })
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Renders `amount` with the currency symbol and thousands grouping,
/// e.g. `-$1,234.50`.
pub fn format_currency_value(amount: f64, code: &CurrencyCode) -> String {
    let precision = minor_units_for(code.as_str());
    let body = format_number(amount.abs(), precision);
    let symbol = symbol_for(code.as_str());
    let sign = if amount < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    format!("{sign}{symbol}{body}")
}

fn format_number(value: f64, precision: u8) -> String {
    let body = format!("{:.*}", precision as usize, value);
    match body.split_once('.') {
        Some((int_part, fraction)) => format!("{}.{}", group_digits(int_part), fraction),
        None => group_digits(&body),
    }
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, ',');
        }
        grouped.insert(0, ch);
    }
    grouped
}
