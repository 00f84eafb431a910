use serde::{Deserialize, Deserializer, Serializer};
use thiserror::Error;
use tracing::warn;

/// Money is kept as integer cents so sums never drift.
/// 1 unit = 100 cents, so 50.00 = 5000 cents.
pub type Cents = i64;

/// Format cents with two decimals.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Parse a decimal string typed by a user into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000.
/// Digits past the second decimal are truncated.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (units_str, decimals_str) = match digits.split_once('.') {
        Some((units, decimals)) => (units, decimals),
        None => (digits, ""),
    };
    if units_str.is_empty() && decimals_str.is_empty() {
        return Err(ParseCentsError::Empty);
    }
    if decimals_str.contains('.') {
        return Err(ParseCentsError::InvalidFormat(input.to_string()));
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        parse_digits(units_str, input)?
    };

    let decimal_cents: i64 = match decimals_str.len() {
        0 => 0,
        1 => parse_digits(decimals_str, input)? * 10,
        _ => parse_digits(&decimals_str[..2], input)?,
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(decimal_cents))
        .ok_or_else(|| ParseCentsError::InvalidFormat(input.to_string()))?;
    Ok(if negative { -cents } else { cents })
}

fn parse_digits(digits: &str, input: &str) -> Result<i64, ParseCentsError> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseCentsError::InvalidFormat(input.to_string()));
    }
    digits
        .parse()
        .map_err(|_| ParseCentsError::InvalidFormat(input.to_string()))
}

/// Convert an amount in major units (as stored in JSON) into cents,
/// rounding to the nearest cent. Anything that is not a finite,
/// non-negative number becomes zero.
pub fn cents_from_major(amount: f64) -> Cents {
    if !amount.is_finite() || amount < 0.0 {
        return 0;
    }
    let cents = (amount * 100.0).round();
    if cents >= i64::MAX as f64 { 0 } else { cents as Cents }
}

/// Sum amounts, saturating at the `Cents` bounds instead of overflowing.
pub fn sum_cents(amounts: impl IntoIterator<Item = Cents>) -> Cents {
    amounts.into_iter().fold(0, Cents::saturating_add)
}

/// Convert cents back into major units for JSON output.
pub fn cents_to_major(cents: Cents) -> f64 {
    cents as f64 / 100.0
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCentsError {
    #[error("empty amount")]
    Empty,

    #[error("invalid money format: {0}")]
    InvalidFormat(String),
}

/// Serde adapter for the `amount` field of the stored transaction list.
///
/// Older entries may carry the amount as a string, or as garbage; those
/// degrade to zero instead of failing the whole record.
pub mod amount {
    use super::*;

    pub fn serialize<S: Serializer>(cents: &Cents, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(cents_to_major(*cents))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Cents, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(lenient_cents(&raw))
    }

    pub(crate) fn lenient_cents(raw: &serde_json::Value) -> Cents {
        let parsed = match raw {
            serde_json::Value::Number(n) => n
                .as_f64()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(cents_from_major),
            serde_json::Value::String(s) => parse_cents(s).ok().filter(|c| *c >= 0),
            _ => None,
        };
        parsed.unwrap_or_else(|| {
            warn!(amount = %raw, "unusable transaction amount, treating as 0");
            0
        })
    }
}
