use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Cents, Transaction, TransactionType, sum_cents};

/// Criteria for browsing the record list. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    /// Exact calendar day, compared after date normalization.
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
}

impl TransactionFilter {
    pub fn with_kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        self.kind.is_none_or(|kind| tx.kind == kind)
            && self.date.is_none_or(|date| tx.date() == Some(date))
            && self
                .category
                .as_deref()
                .is_none_or(|category| tx.category == category)
    }

    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|tx| self.matches(tx))
            .cloned()
            .collect()
    }
}

/// Income and expense sums of a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub income: Cents,
    pub expense: Cents,
}

impl Totals {
    pub fn net(&self) -> Cents {
        self.income.saturating_sub(self.expense)
    }
}

pub fn totals(transactions: &[Transaction]) -> Totals {
    transactions.iter().fold(Totals::default(), |mut acc, tx| {
        match tx.kind {
            TransactionType::Income => {
                acc.income = acc.income.saturating_add(tx.effective_amount())
            }
            TransactionType::Expense => {
                acc.expense = acc.expense.saturating_add(tx.effective_amount())
            }
        }
        acc
    })
}

/// Running balance over every transaction: income minus expense.
pub fn balance(transactions: &[Transaction]) -> Cents {
    sum_cents(transactions.iter().map(Transaction::signed_amount))
}

/// All transactions on one calendar day, in stored order.
pub fn transactions_on(transactions: &[Transaction], date: NaiveDate) -> Vec<Transaction> {
    TransactionFilter::default().with_date(date).apply(transactions)
}

/// Newest first by calendar day; undated records sink to the end.
/// Stable, so same-day records keep their stored order.
pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by_key(|tx| std::cmp::Reverse(tx.date()));
}
