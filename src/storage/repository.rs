use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::domain::Transaction;

use super::{MIGRATION_001_INITIAL, TRANSACTIONS_KEY, decode_transactions, encode_transactions};

/// Key-value text store backed by SQLite.
///
/// The whole transaction list lives JSON-encoded under a single key, in the
/// same array shape that `export --format json` writes.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Read the value stored under `key`.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to read key '{key}'"))?;

        Ok(row.map(|row| row.get("value")))
    }

    /// Store `value` under `key`, replacing whatever was there.
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to write key '{key}'"))?;
        Ok(())
    }

    /// Load the full transaction list. A missing key means no records yet.
    pub async fn load_transactions(&self) -> Result<Vec<Transaction>> {
        match self.get(TRANSACTIONS_KEY).await? {
            Some(json) => {
                let transactions = decode_transactions(&json)?;
                debug!(count = transactions.len(), "loaded transactions");
                Ok(transactions)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Replace the stored transaction list.
    pub async fn save_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        let json = encode_transactions(transactions)?;
        self.set(TRANSACTIONS_KEY, &json).await?;
        debug!(count = transactions.len(), "saved transactions");
        Ok(())
    }
}
