use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, format_date, money, parse_transaction_date};

/// Opaque identifier. Older records use a millisecond timestamp string,
/// new ones a UUID; the two never need to be told apart.
pub type TransactionId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(format!("unknown transaction type: {other}")),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One recorded income or expense event, in the shape it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Always non-negative; unusable stored amounts decode to zero.
    #[serde(with = "money::amount", default)]
    pub amount: Cents,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw stored date, either `YYYY-MM-DD` or `YYYY/MM/DD`.
    /// Kept verbatim; use [`Transaction::date`] for comparisons.
    pub date: String,
}

impl Transaction {
    /// Create a new transaction with a freshly generated id.
    pub fn new(
        kind: TransactionType,
        amount: Cents,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            amount,
            category: category.into(),
            description: None,
            date: format_date(date),
        }
    }

    pub fn expense(amount: Cents, category: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(TransactionType::Expense, amount, category, date)
    }

    pub fn income(amount: Cents, category: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(TransactionType::Income, amount, category, date)
    }

    pub fn with_id(mut self, id: impl Into<TransactionId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    /// Override the stored date string verbatim (legacy formats included).
    pub fn with_raw_date(mut self, raw: impl Into<String>) -> Self {
        self.date = raw.into();
        self
    }

    /// Calendar day of the transaction, or `None` if the stored date is malformed.
    pub fn date(&self) -> Option<NaiveDate> {
        parse_transaction_date(&self.date)
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Amount that counts toward the aggregates; negatives never reach a sum.
    pub fn effective_amount(&self) -> Cents {
        self.amount.max(0)
    }

    /// Income counts positive, expense negative.
    pub fn signed_amount(&self) -> Cents {
        match self.kind {
            TransactionType::Income => self.effective_amount(),
            TransactionType::Expense => -self.effective_amount(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_create_transaction() {
        let tx = Transaction::expense(1250, "Dining", day(2025, 3, 1)).with_description("Noodles");

        assert_eq!(tx.kind, TransactionType::Expense);
        assert_eq!(tx.amount, 1250);
        assert_eq!(tx.category, "Dining");
        assert_eq!(tx.description, Some("Noodles".to_string()));
        assert_eq!(tx.date, "2025-03-01");
        assert_eq!(tx.date(), Some(day(2025, 3, 1)));
        assert!(!tx.id.is_empty());
    }

    #[test]
    fn test_empty_description_is_none() {
        let tx = Transaction::income(100, "Salary", day(2025, 3, 1)).with_description("");
        assert_eq!(tx.description, None);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Transaction::expense(1, "Dining", day(2025, 3, 1));
        let b = Transaction::expense(1, "Dining", day(2025, 3, 1));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_signed_amount() {
        let income = Transaction::income(5000, "Salary", day(2025, 1, 1));
        let expense = Transaction::expense(1200, "Transport", day(2025, 1, 1));
        assert_eq!(income.signed_amount(), 5000);
        assert_eq!(expense.signed_amount(), -1200);
    }

    #[test]
    fn test_decode_persisted_record() {
        let json = r#"{
            "id": "1718000000000",
            "type": "expense",
            "amount": 32.5,
            "category": "Shopping",
            "description": "",
            "date": "2025/06/10"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(tx.id, "1718000000000");
        assert_eq!(tx.kind, TransactionType::Expense);
        assert_eq!(tx.amount, 3250);
        assert_eq!(tx.date, "2025/06/10");
        assert_eq!(tx.date(), Some(day(2025, 6, 10)));
    }

    #[test]
    fn test_decode_tolerates_bad_amount() {
        let json = r#"{"id":"1","type":"income","amount":"n/a","category":"Bonus","date":"2025-01-01"}"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.amount, 0);
        assert_eq!(tx.description, None);
    }

    #[test]
    fn test_encode_keeps_persisted_shape() {
        let tx = Transaction::expense(1999, "Dining", day(2025, 2, 3)).with_id("abc");
        let value = serde_json::to_value(&tx).unwrap();

        assert_eq!(value["id"], "abc");
        assert_eq!(value["type"], "expense");
        assert_eq!(value["amount"], 19.99);
        assert_eq!(value["date"], "2025-02-03");
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_transaction_type_parse() {
        assert_eq!("income".parse::<TransactionType>(), Ok(TransactionType::Income));
        assert_eq!("EXPENSE".parse::<TransactionType>(), Ok(TransactionType::Expense));
        assert!("transfer".parse::<TransactionType>().is_err());
    }
}
