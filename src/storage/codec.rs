use anyhow::{Context, Result};
use tracing::warn;

use crate::domain::Transaction;

/// Decode the persisted transaction list.
///
/// The outer value must be a JSON array. Individual records that don't
/// decode (missing fields, unknown type) are skipped with a warning so one
/// bad legacy entry doesn't hide the rest.
pub fn decode_transactions(json: &str) -> Result<Vec<Transaction>> {
    let records: Vec<serde_json::Value> =
        serde_json::from_str(json).context("Stored transactions are not a JSON array")?;

    let mut transactions = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Transaction>(record) {
            Ok(tx) => transactions.push(tx),
            Err(e) => warn!(index, error = %e, "skipping undecodable transaction record"),
        }
    }
    Ok(transactions)
}

/// Encode the transaction list in the persisted shape.
pub fn encode_transactions(transactions: &[Transaction]) -> Result<String> {
    serde_json::to_string(transactions).context("Failed to encode transactions")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::TransactionType;

    #[test]
    fn test_decode_skips_bad_records() {
        let json = r#"[
            {"id":"1","type":"expense","amount":12.5,"category":"Dining","description":"","date":"2025-01-05"},
            {"id":"2","type":"transfer","amount":1,"category":"?","date":"2025-01-05"},
            {"id":"3","amount":1,"category":"?","date":"2025-01-05"},
            {"id":"4","type":"income","amount":"oops","category":"Bonus","date":"2025/01/06"}
        ]"#;

        let transactions = decode_transactions(json).unwrap();

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].amount, 1250);
        assert_eq!(transactions[1].kind, TransactionType::Income);
        assert_eq!(transactions[1].amount, 0);
    }

    #[test]
    fn test_decode_rejects_non_array() {
        assert!(decode_transactions(r#"{"id":"1"}"#).is_err());
        assert!(decode_transactions("not json").is_err());
    }

    #[test]
    fn test_encode_then_decode_preserves_records() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        let original = vec![
            Transaction::expense(1999, "Dining", date).with_description("Ramen"),
            Transaction::income(250000, "Salary", date).with_raw_date("2025/01/05"),
        ];

        let decoded = decode_transactions(&encode_transactions(&original).unwrap()).unwrap();
        assert_eq!(decoded, original);
    }
}
