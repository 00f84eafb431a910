// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use foxtally::application::{NewTransaction, TrackerService};
use foxtally::{Cents, Repository, Transaction, TransactionType};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(TrackerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = TrackerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to create a service over a database whose stored list is the given
/// raw JSON, as if written by an older client.
pub async fn service_with_raw_json(json: &str) -> Result<(TrackerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let repo = Repository::init(&format!("sqlite:{}?mode=rwc", db_path.display())).await?;
    repo.set(foxtally::storage::TRANSACTIONS_KEY, json).await?;
    Ok((TrackerService::new(repo), temp_dir))
}

/// Helper to parse a date string into a NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Record an expense and return it.
pub async fn spend(
    service: &TrackerService,
    amount: Cents,
    category: &str,
    date: &str,
) -> Result<Transaction> {
    record(service, TransactionType::Expense, amount, category, date).await
}

/// Record an income and return it.
pub async fn earn(
    service: &TrackerService,
    amount: Cents,
    category: &str,
    date: &str,
) -> Result<Transaction> {
    record(service, TransactionType::Income, amount, category, date).await
}

async fn record(
    service: &TrackerService,
    kind: TransactionType,
    amount: Cents,
    category: &str,
    date: &str,
) -> Result<Transaction> {
    let tx = service
        .record_transaction(NewTransaction {
            kind,
            amount,
            category: category.to_string(),
            description: None,
            date: parse_date(date),
        })
        .await?;
    Ok(tx)
}
