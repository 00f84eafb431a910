use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::domain::{Cents, TimeRange, Transaction, sum_cents};

/// Expense totals per time bucket, ready for a line chart.
/// `labels[i]` names the bucket whose total is `values[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub range: TimeRange,
    pub labels: Vec<String>,
    pub values: Vec<Cents>,
}

impl TrendSeries {
    pub fn points(&self) -> impl Iterator<Item = (&str, Cents)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn value_at(&self, label: &str) -> Option<Cents> {
        self.points().find(|(l, _)| *l == label).map(|(_, v)| v)
    }

    pub fn total(&self) -> Cents {
        sum_cents(self.values.iter().copied())
    }

    pub fn peak(&self) -> Cents {
        self.values.iter().copied().max().unwrap_or(0)
    }
}

/// Bucket the expense amounts of `transactions` into the fixed sequence of
/// buckets ending at `now`: 30 days, 12 months or 5 years.
///
/// Labels don't depend on the data. Income never contributes. Expenses
/// whose bucket isn't in the sequence are dropped; with range-filtered
/// input that only happens to the oldest day of the day window and to
/// future-dated entries.
pub fn build_trend(transactions: &[Transaction], range: TimeRange, now: NaiveDate) -> TrendSeries {
    let buckets = range.bucket_starts(now);
    let index: HashMap<NaiveDate, usize> = buckets
        .iter()
        .enumerate()
        .map(|(i, start)| (*start, i))
        .collect();

    let mut values: Vec<Cents> = vec![0; buckets.len()];
    for tx in transactions.iter().filter(|tx| tx.is_expense()) {
        let Some(date) = tx.date() else {
            trace!(id = %tx.id, date = %tx.date, "trend skips malformed date");
            continue;
        };
        match index.get(&range.bucket_start(date)) {
            Some(&i) => values[i] = values[i].saturating_add(tx.effective_amount()),
            None => trace!(id = %tx.id, %date, "trend skips expense outside buckets"),
        }
    }

    TrendSeries {
        range,
        labels: buckets.iter().map(|d| range.bucket_label(*d)).collect(),
        values,
    }
}
