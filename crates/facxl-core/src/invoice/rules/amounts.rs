//! Numeric field parsing for decimal-comma invoices.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ExtractionError;

/// Parse a decimal-comma amount (e.g. "70,12" or "70.12").
///
/// Thousands separators are not supported: detail lines never carry them.
pub fn parse_decimal_comma(s: &str) -> Option<Decimal> {
    let normalized = s.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }

    Decimal::from_str(&normalized).ok()
}

/// Parse a matched price group, failing the document if it is not numeric.
pub fn parse_price(field: &str, value: &str) -> Result<Decimal, ExtractionError> {
    parse_decimal_comma(value).ok_or_else(|| ExtractionError::parse(field, value))
}

/// Parse a matched quantity group.
pub fn parse_quantity(value: &str) -> Result<u32, ExtractionError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| ExtractionError::parse("quantity", value))
}
