// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Extraction reducers
//!
//! Pure lookups that pull one typed value out of an unordered extracted
//! field collection. Every function is total: malformed or missing values
//! reduce to a neutral result (zero spend, no date, sentinel merchant)
//! instead of failing, so one dirty record never aborts a view.

use chrono::NaiveDate;

use crate::content::ExtractedField;

/// Field id carrying a receipt's total
pub const TOTAL_AMOUNT: &str = "total_amount";
/// Field id carrying a receipt's date
pub const TRANSACTION_DATE: &str = "transaction_date";
/// Field id carrying the merchant name
pub const MERCHANT_NAME: &str = "merchant_name";

/// Grouping key for items with no readable merchant. Grouping keys are
/// never null; the sentinel is a valid, stable bucket.
pub const UNKNOWN_MERCHANT: &str = "Unknown Merchant";

/// First field matching `field_id` in list order that carries a value
///
/// Multiple extraction passes can leave duplicate `field_id`s behind;
/// first-match-wins is the tolerated policy for that case.
pub fn find_by_field_id<'a>(
    fields: &'a [ExtractedField],
    field_id: &str,
) -> Option<&'a ExtractedField> {
    fields
        .iter()
        .find(|f| f.field_id == field_id)
        .filter(|f| f.value.is_some())
}

/// Numeric total of an item, `0.0` when absent or unparseable
///
/// Zero spend and missing spend are deliberately indistinguishable here.
pub fn extract_amount(fields: &[ExtractedField]) -> f64 {
    find_by_field_id(fields, TOTAL_AMOUNT)
        .and_then(|f| f.value.as_deref())
        .map(parse_amount)
        .unwrap_or(0.0)
}

/// Raw transaction date string, unparsed
///
/// Downstream consumers parse it themselves and exclude records whose
/// date will not parse from date-bounded aggregates.
pub fn extract_date(fields: &[ExtractedField]) -> Option<&str> {
    find_by_field_id(fields, TRANSACTION_DATE)
        .and_then(|f| f.value.as_deref())
        .filter(|v| !v.is_empty())
}

/// Merchant name, or [`UNKNOWN_MERCHANT`] when absent
pub fn extract_merchant(fields: &[ExtractedField]) -> String {
    find_by_field_id(fields, MERCHANT_NAME)
        .and_then(|f| f.value.clone())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN_MERCHANT.to_string())
}

/// Parse a free-text amount: keep digits, `.` and `-`, parse as float
///
/// Currency symbols, thousands separators and whitespace are stripped, so
/// `"$1,234.56"` parses as `1234.56`. Unparseable input is `0.0`.
pub fn parse_amount(raw: &str) -> f64 {
    let clean: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    match clean.parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            tracing::debug!("Unparseable amount '{}', treating as zero", raw);
            0.0
        }
    }
}

/// Parse a scanned-document date string as a calendar date
///
/// Accepts `YYYY-MM-DD` plus the separator variants OCR output tends to
/// produce, and RFC 3339 timestamps. `None` when nothing matches.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let formats = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%Y/%m/%d", "%Y.%m.%d"];
    for fmt in formats.iter() {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }

    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(datetime.date_naive());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ExtractedField;

    fn fields(entries: &[(&str, &str)]) -> Vec<ExtractedField> {
        entries
            .iter()
            .map(|(id, value)| ExtractedField::new(id, value, 0.9))
            .collect()
    }

    #[test]
    fn test_find_first_match_wins() {
        // Two extraction passes left duplicate total_amount entries; the
        // first in list order wins.
        let fields = fields(&[(TOTAL_AMOUNT, "10.00"), (TOTAL_AMOUNT, "99.99")]);
        let found = find_by_field_id(&fields, TOTAL_AMOUNT).unwrap();
        assert_eq!(found.value.as_deref(), Some("10.00"));
    }

    #[test]
    fn test_find_skips_null_value() {
        let fields = vec![ExtractedField::empty(MERCHANT_NAME)];
        assert!(find_by_field_id(&fields, MERCHANT_NAME).is_none());
        assert!(find_by_field_id(&fields, "absent").is_none());
    }

    #[test]
    fn test_extract_amount_clean_numeric() {
        let fields = fields(&[(TOTAL_AMOUNT, "42.50")]);
        assert_eq!(extract_amount(&fields), 42.50);
    }

    #[test]
    fn test_extract_amount_strips_currency_formatting() {
        // Commas are not in [0-9.-] and get stripped along with symbols.
        let fields = fields(&[(TOTAL_AMOUNT, "$1,234.56")]);
        assert_eq!(extract_amount(&fields), 1234.56);
    }

    #[test]
    fn test_extract_amount_negative() {
        let fields = fields(&[(TOTAL_AMOUNT, "-5.25")]);
        assert_eq!(extract_amount(&fields), -5.25);
    }

    #[test]
    fn test_extract_amount_defaults_to_zero() {
        assert_eq!(extract_amount(&[]), 0.0);
        assert_eq!(extract_amount(&fields(&[(TOTAL_AMOUNT, "not a number")])), 0.0);
        assert_eq!(extract_amount(&fields(&[(TOTAL_AMOUNT, "")])), 0.0);
    }

    #[test]
    fn test_extract_date_returns_raw_string() {
        let fields = fields(&[(TRANSACTION_DATE, "June 1, 2024")]);
        assert_eq!(extract_date(&fields), Some("June 1, 2024"));
        assert_eq!(extract_date(&[]), None);
    }

    #[test]
    fn test_extract_merchant_sentinel() {
        let fields = fields(&[(MERCHANT_NAME, "Acme Corp.")]);
        assert_eq!(extract_merchant(&fields), "Acme Corp.");
        assert_eq!(extract_merchant(&[]), UNKNOWN_MERCHANT);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(parse_date("2024-06-01"), Some(expected));
        assert_eq!(parse_date("01.06.2024"), Some(expected));
        assert_eq!(parse_date("01/06/2024"), Some(expected));
        assert_eq!(parse_date("2024/06/01"), Some(expected));
        assert_eq!(parse_date("2024-06-01T09:32:00Z"), Some(expected));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2024-13-45"), None);
    }
}
