//! Numeric guard for currency candidates
//!
//! CAS text mixes amounts with dates (`01012024`), folio numbers and
//! transaction references that look just like currency once the separators
//! are gone. Every literal goes through `accept_amount()` before it is used,
//! and a finished value pair goes through `is_plausible_ratio()`.

/// Amounts must be strictly below this (₹ 10,000 crore)
pub const MAX_AMOUNT: f64 = 100_000_000_000.0;

/// Open interval the market/cost ratio of one holding must fall into
pub const MIN_VALUE_RATIO: f64 = 0.01;
pub const MAX_VALUE_RATIO: f64 = 100.0;

/// Parse an Indian-formatted number (1,23,456.78 -> 123456.78)
pub fn parse_indian_decimal(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// An 8-digit literal whose first two digits are a day and next two a month
/// (DDMMYYYY) is a date, not an amount.
pub fn is_likely_date(literal: &str) -> bool {
    let digits: String = literal.chars().filter(|c| *c != ',').collect();
    if digits.len() != 8 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let day: u32 = digits[0..2].parse().unwrap_or(0);
    let month: u32 = digits[2..4].parse().unwrap_or(0);
    (1..=31).contains(&day) && (1..=12).contains(&month)
}

/// Amount must lie in the open interval (0, MAX_AMOUNT)
pub fn is_plausible_amount(value: f64) -> bool {
    value.is_finite() && value > 0.0 && value < MAX_AMOUNT
}

/// Parse a currency literal, returning `None` for dates and implausible
/// magnitudes.
pub fn accept_amount(literal: &str) -> Option<f64> {
    if is_likely_date(literal) {
        log::debug!("Guard: '{}' rejected as date", literal);
        return None;
    }

    let value = parse_indian_decimal(literal)?;
    if !is_plausible_amount(value) {
        log::debug!("Guard: '{}' rejected as implausible amount", literal);
        return None;
    }

    Some(value)
}

/// Market/cost ratio must lie in (MIN_VALUE_RATIO, MAX_VALUE_RATIO).
///
/// A pair outside that range was almost always cross-matched from unrelated
/// lines, so the holding is dropped instead of committed.
pub fn is_plausible_ratio(market_value: f64, cost_value: f64) -> bool {
    if cost_value <= 0.0 {
        return false;
    }
    let ratio = market_value / cost_value;
    ratio > MIN_VALUE_RATIO && ratio < MAX_VALUE_RATIO
}
