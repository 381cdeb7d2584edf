//! Display formatting for receipt values (currency, dates, quantities).

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const UNKNOWN_DATE: &str = "Unknown date";
const DATE_DISPLAY_FORMAT: &str = "%B %-d, %Y, %I:%M %p";

/// Format an amount as US dollars: `$1,234.50`, `-$0.99`.
pub fn format_price(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!(
        "{}${}.{:02}",
        sign,
        group_thousands(cents / 100),
        cents % 100
    )
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a quantity without a trailing `.0` for whole numbers.
pub fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 && quantity.abs() < 1e15 {
        format!("{}", quantity as i64)
    } else {
        let s = format!("{:.3}", quantity);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Parse the receipt timestamp as sent by the API.
///
/// Accepts RFC 3339 (wall-clock time at the given offset is kept), naive
/// ISO 8601 date-times and bare dates.
pub fn parse_receipt_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Long-form date for display, e.g. `March 14, 2025, 05:42 PM`.
///
/// A missing value reads `Unknown date`; a value that cannot be parsed is
/// shown as-is.
pub fn format_receipt_date(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => UNKNOWN_DATE.to_string(),
        Some(value) => match parse_receipt_datetime(value) {
            Some(dt) => dt.format(DATE_DISPLAY_FORMAT).to_string(),
            None => value.to_string(),
        },
    }
}

/// `1 item` / `3 items`
pub fn format_item_count(count: usize) -> String {
    if count == 1 {
        "1 item".to_string()
    } else {
        format!("{} items", count)
    }
}

/// File size in megabytes with two decimals, as shown next to a selection.
pub fn format_size_mb(bytes: usize) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(3.5), "$3.50");
        assert_eq!(format_price(0.0), "$0.00");
        assert_eq!(format_price(1234.5), "$1,234.50");
        assert_eq!(format_price(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_price(-0.99), "-$0.99");
        assert_eq!(format_price(2.676), "$2.68");
        assert_eq!(format_price(-0.001), "$0.00");
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(1.0), "1");
        assert_eq!(format_quantity(2.5), "2.5");
        assert_eq!(format_quantity(0.125), "0.125");
        assert_eq!(format_quantity(1.1), "1.1");
    }

    #[test]
    fn test_format_receipt_date_variants() {
        assert_eq!(
            format_receipt_date(Some("2025-03-14T17:42:00")),
            "March 14, 2025, 05:42 PM"
        );
        assert_eq!(
            format_receipt_date(Some("2025-03-14T09:05:00+02:00")),
            "March 14, 2025, 09:05 AM"
        );
        assert_eq!(
            format_receipt_date(Some("2025-01-02")),
            "January 2, 2025, 12:00 AM"
        );
        assert_eq!(format_receipt_date(None), "Unknown date");
        assert_eq!(format_receipt_date(Some("  ")), "Unknown date");
        assert_eq!(format_receipt_date(Some("last tuesday")), "last tuesday");
    }

    #[test]
    fn test_format_item_count() {
        assert_eq!(format_item_count(0), "0 items");
        assert_eq!(format_item_count(1), "1 item");
        assert_eq!(format_item_count(12), "12 items");
    }

    #[test]
    fn test_format_size_mb() {
        assert_eq!(format_size_mb(1024 * 1024), "1.00 MB");
        assert_eq!(format_size_mb(1536 * 1024), "1.50 MB");
    }
}
