use chrono::NaiveDate;
use tracing::trace;

use crate::domain::{TimeRange, Transaction};

/// Select the transactions dated on or after the start of `range`'s
/// trailing window. There is no upper bound: future-dated entries pass.
///
/// Records whose date can't be parsed are left out rather than risk
/// polluting the reports.
pub fn filter_by_range(
    transactions: &[Transaction],
    range: TimeRange,
    now: NaiveDate,
) -> Vec<Transaction> {
    let start = range.window_start(now);

    transactions
        .iter()
        .filter(|tx| match tx.date() {
            Some(date) => date >= start,
            None => {
                trace!(id = %tx.id, date = %tx.date, "excluding transaction with malformed date");
                false
            }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ids(transactions: &[Transaction]) -> Vec<&str> {
        transactions.iter().map(|tx| tx.id.as_str()).collect()
    }

    #[test]
    fn test_day_window_is_inclusive() {
        let now = day(2025, 6, 15);
        let transactions = vec![
            Transaction::expense(100, "Dining", day(2025, 5, 16)).with_id("edge"),
            Transaction::expense(100, "Dining", day(2025, 5, 15)).with_id("before"),
            Transaction::expense(100, "Dining", now).with_id("today"),
        ];

        let filtered = filter_by_range(&transactions, TimeRange::Day, now);
        assert_eq!(ids(&filtered), vec!["edge", "today"]);
    }

    #[test]
    fn test_month_window_starts_eleven_months_back() {
        let now = day(2025, 3, 15);
        let transactions = vec![
            Transaction::expense(100, "Dining", day(2024, 3, 31)).with_id("old"),
            Transaction::expense(100, "Dining", day(2024, 4, 1)).with_id("first"),
            Transaction::income(100, "Salary", day(2025, 3, 1)).with_id("recent"),
        ];

        let filtered = filter_by_range(&transactions, TimeRange::Month, now);
        assert_eq!(ids(&filtered), vec!["first", "recent"]);
    }

    #[test]
    fn test_year_window_covers_five_years() {
        let now = day(2025, 3, 15);
        let transactions = vec![
            Transaction::expense(100, "Dining", day(2020, 12, 31)).with_id("old"),
            Transaction::expense(100, "Dining", day(2021, 1, 1)).with_id("first"),
        ];

        let filtered = filter_by_range(&transactions, TimeRange::Year, now);
        assert_eq!(ids(&filtered), vec!["first"]);
    }

    #[test]
    fn test_future_dates_pass() {
        let now = day(2025, 3, 15);
        let transactions = vec![Transaction::expense(100, "Dining", day(2025, 4, 2))];
        assert_eq!(filter_by_range(&transactions, TimeRange::Month, now).len(), 1);
    }

    #[test]
    fn test_malformed_dates_fail_closed() {
        let now = day(2025, 3, 15);
        let transactions = vec![
            Transaction::expense(100, "Dining", now).with_raw_date("not a date"),
            Transaction::expense(100, "Dining", now).with_raw_date("2025-13-01"),
        ];
        assert!(filter_by_range(&transactions, TimeRange::Year, now).is_empty());
    }

    #[test]
    fn test_separator_does_not_matter() {
        let now = day(2025, 1, 20);
        let dashed = vec![
            Transaction::expense(100, "Dining", now).with_id("a").with_raw_date("2025-01-05"),
            Transaction::expense(100, "Dining", now).with_id("b").with_raw_date("2024-12-01"),
        ];
        let slashed: Vec<Transaction> = dashed
            .iter()
            .cloned()
            .map(|tx| {
                let raw = tx.date.replace('-', "/");
                tx.with_raw_date(raw)
            })
            .collect();

        for range in [TimeRange::Day, TimeRange::Month, TimeRange::Year] {
            assert_eq!(
                ids(&filter_by_range(&dashed, range, now)),
                ids(&filter_by_range(&slashed, range, now))
            );
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_by_range(&[], TimeRange::Day, day(2025, 1, 1)).is_empty());
    }
}
