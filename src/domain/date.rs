use chrono::NaiveDate;

/// Canonical storage format for transaction dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonicalize the separator of a stored date string.
/// Both `2025-01-05` and `2025/01/05` are in circulation.
pub fn normalize_date(raw: &str) -> String {
    raw.trim().replace('/', "-")
}

/// Parse a stored transaction date, tolerating either separator.
/// Returns `None` for anything that isn't a real calendar day.
pub fn parse_transaction_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&normalize_date(raw), DATE_FORMAT).ok()
}

/// Format a date the way new records are stored.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_separators_parse_to_the_same_day() {
        let dashed = parse_transaction_date("2025-01-05");
        let slashed = parse_transaction_date("2025/01/05");
        assert_eq!(dashed, NaiveDate::from_ymd_opt(2025, 1, 5));
        assert_eq!(dashed, slashed);
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("2025/03/15"), "2025-03-15");
        assert_eq!(normalize_date(" 2025-03-15 "), "2025-03-15");
    }

    #[test]
    fn test_malformed_dates() {
        assert_eq!(parse_transaction_date(""), None);
        assert_eq!(parse_transaction_date("yesterday"), None);
        assert_eq!(parse_transaction_date("2025-02-30"), None);
        assert_eq!(parse_transaction_date("2025.01.05"), None);
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        assert_eq!(format_date(date), "2025-03-05");
    }
}
