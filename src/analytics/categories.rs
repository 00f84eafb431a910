use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Cents, Transaction, TransactionType};

/// Per-category tally of one transaction type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: Cents,
    pub count: usize,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Share of the grand total for this type, 0 when that total is 0.
    pub percentage: f64,
}

/// Headline numbers for the filtered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Overview {
    pub total_income: Cents,
    pub total_expense: Cents,
    pub balance: Cents,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummaryResult {
    /// Expense categories ranked by total, largest first.
    pub categories: Vec<CategorySummary>,
    /// Income categories, ranked the same way. Not part of the ranking view.
    pub income_categories: Vec<CategorySummary>,
    pub overview: Overview,
}

/// `part` as a percentage of `whole`, or 0 when `whole` is 0.
pub fn percentage_of_total(part: Cents, whole: Cents) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Group `transactions` by category and compute the overview totals.
///
/// Categories are keyed by name *and* type: a name used for both income
/// and expense yields one entry on each side, so income can never inflate
/// an expense ranking. Ties in the ranking keep first-seen order.
pub fn summarize_categories(transactions: &[Transaction]) -> CategorySummaryResult {
    let mut overview = Overview {
        transaction_count: transactions.len(),
        ..Overview::default()
    };

    let mut order: Vec<(String, TransactionType)> = Vec::new();
    let mut tallies: HashMap<(String, TransactionType), (Cents, usize)> = HashMap::new();

    for tx in transactions {
        let amount = tx.effective_amount();
        match tx.kind {
            TransactionType::Income => {
                overview.total_income = overview.total_income.saturating_add(amount)
            }
            TransactionType::Expense => {
                overview.total_expense = overview.total_expense.saturating_add(amount)
            }
        }

        let key = (tx.category.clone(), tx.kind);
        let tally = tallies.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            (0, 0)
        });
        tally.0 = tally.0.saturating_add(amount);
        tally.1 += 1;
    }
    overview.balance = overview.total_income.saturating_sub(overview.total_expense);

    let ranked = |kind: TransactionType, grand_total: Cents| {
        let mut summaries: Vec<CategorySummary> = order
            .iter()
            .filter(|(_, k)| *k == kind)
            .map(|key| {
                let (total, count) = tallies[key];
                CategorySummary {
                    category: key.0.clone(),
                    total,
                    count,
                    kind,
                    percentage: percentage_of_total(total, grand_total),
                }
            })
            .collect();
        // Stable: equal totals stay in first-seen order.
        summaries.sort_by(|a, b| b.total.cmp(&a.total));
        summaries
    };

    CategorySummaryResult {
        categories: ranked(TransactionType::Expense, overview.total_expense),
        income_categories: ranked(TransactionType::Income, overview.total_income),
        overview,
    }
}
