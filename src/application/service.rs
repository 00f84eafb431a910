use chrono::NaiveDate;
use tracing::{debug, info};

use crate::analytics::{
    TransactionFilter, balance, build_heatmap, build_trend, filter_by_range, sort_newest_first,
    summarize_categories, totals, transactions_on,
};
use crate::domain::{
    Cents, HeatmapMode, TimeRange, Transaction, TransactionType, format_cents, format_date,
};
use crate::storage::Repository;

use super::{AppError, AnalysisReport, DaySummary, RecordsView};

/// Application service providing high-level operations over the records.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
pub struct TrackerService {
    repo: Repository,
}

/// Input for recording a new transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TransactionType,
    pub amount: Cents,
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDate,
}

/// Field changes for an existing transaction; `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub kind: Option<TransactionType>,
    pub amount: Option<Cents>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Outcome of merging a batch of records into the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeResult {
    pub imported: usize,
    pub skipped: usize,
}

impl TrackerService {
    /// Create a new service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Record operations
    // ========================

    /// Record a new transaction and persist it.
    pub async fn record_transaction(&self, input: NewTransaction) -> Result<Transaction, AppError> {
        validate_amount(input.amount)?;
        let category = validate_category(input.category)?;

        let mut tx = Transaction::new(input.kind, input.amount, category, input.date);
        if let Some(description) = input.description {
            tx = tx.with_description(description);
        }

        let mut transactions = self.repo.load_transactions().await?;
        transactions.push(tx.clone());
        self.repo.save_transactions(&transactions).await?;

        info!(id = %tx.id, kind = %tx.kind, amount = %format_cents(tx.amount), "recorded transaction");
        Ok(tx)
    }

    /// Get a transaction by id.
    pub async fn get_transaction(&self, id: &str) -> Result<Transaction, AppError> {
        self.repo
            .load_transactions()
            .await?
            .into_iter()
            .find(|tx| tx.id == id)
            .ok_or_else(|| AppError::TransactionNotFound(id.to_string()))
    }

    /// Apply field changes to a stored transaction. A changed date is
    /// written in the canonical format; an untouched one is kept verbatim.
    pub async fn update_transaction(
        &self,
        id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction, AppError> {
        let mut transactions = self.repo.load_transactions().await?;
        let tx = transactions
            .iter_mut()
            .find(|tx| tx.id == id)
            .ok_or_else(|| AppError::TransactionNotFound(id.to_string()))?;

        if let Some(kind) = update.kind {
            tx.kind = kind;
        }
        if let Some(amount) = update.amount {
            validate_amount(amount)?;
            tx.amount = amount;
        }
        if let Some(category) = update.category {
            tx.category = validate_category(category)?;
        }
        if let Some(description) = update.description {
            tx.description = (!description.is_empty()).then_some(description);
        }
        if let Some(date) = update.date {
            tx.date = format_date(date);
        }

        let updated = tx.clone();
        self.repo.save_transactions(&transactions).await?;
        info!(id = %updated.id, "updated transaction");
        Ok(updated)
    }

    /// Delete a transaction by id, returning what was removed.
    pub async fn delete_transaction(&self, id: &str) -> Result<Transaction, AppError> {
        let mut transactions = self.repo.load_transactions().await?;
        let position = transactions
            .iter()
            .position(|tx| tx.id == id)
            .ok_or_else(|| AppError::TransactionNotFound(id.to_string()))?;

        let removed = transactions.remove(position);
        self.repo.save_transactions(&transactions).await?;
        info!(id = %removed.id, "deleted transaction");
        Ok(removed)
    }

    /// Every stored transaction, in stored order.
    pub async fn all_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        Ok(self.repo.load_transactions().await?)
    }

    /// Browse records, newest first, with totals for what matched.
    pub async fn list_transactions(&self, filter: &TransactionFilter) -> Result<RecordsView, AppError> {
        let mut transactions = filter.apply(&self.repo.load_transactions().await?);
        sort_newest_first(&mut transactions);
        let totals = totals(&transactions);
        Ok(RecordsView { transactions, totals })
    }

    /// Income minus expense over every record.
    pub async fn balance(&self) -> Result<Cents, AppError> {
        Ok(balance(&self.repo.load_transactions().await?))
    }

    /// Transactions of one day with their income/expense totals.
    pub async fn day_summary(&self, date: NaiveDate) -> Result<DaySummary, AppError> {
        let transactions = transactions_on(&self.repo.load_transactions().await?, date);
        let totals = totals(&transactions);
        Ok(DaySummary {
            date,
            transactions,
            totals,
        })
    }

    /// Merge records into the store, skipping ids that already exist
    /// (including duplicates within the batch itself).
    pub async fn merge_transactions(&self, incoming: Vec<Transaction>) -> Result<MergeResult, AppError> {
        let mut transactions = self.repo.load_transactions().await?;
        let mut result = MergeResult::default();

        for tx in incoming {
            if transactions.iter().any(|existing| existing.id == tx.id) {
                debug!(id = %tx.id, "skipping duplicate transaction");
                result.skipped += 1;
            } else {
                transactions.push(tx);
                result.imported += 1;
            }
        }

        if result.imported > 0 {
            self.repo.save_transactions(&transactions).await?;
        }
        info!(imported = result.imported, skipped = result.skipped, "merged transactions");
        Ok(result)
    }

    // ========================
    // Analysis
    // ========================

    /// Build every analysis view for the given controls.
    ///
    /// Overview, ranking and trend see the range-filtered records; the
    /// heatmap sees all of them and picks its own window.
    pub async fn analysis(
        &self,
        range: TimeRange,
        mode: HeatmapMode,
        now: NaiveDate,
    ) -> Result<AnalysisReport, AppError> {
        let transactions = self.repo.load_transactions().await?;
        Ok(analyze(&transactions, range, mode, now))
    }
}

/// Assemble an [`AnalysisReport`] from a snapshot of the records.
pub fn analyze(
    transactions: &[Transaction],
    range: TimeRange,
    mode: HeatmapMode,
    now: NaiveDate,
) -> AnalysisReport {
    let filtered = filter_by_range(transactions, range, now);
    debug!(
        total = transactions.len(),
        in_range = filtered.len(),
        %range,
        "building analysis"
    );

    let summary = summarize_categories(&filtered);
    AnalysisReport {
        as_of: now,
        range,
        mode,
        overview: summary.overview,
        categories: summary.categories,
        income_categories: summary.income_categories,
        trend: build_trend(&filtered, range, now),
        heatmap: build_heatmap(transactions, range, mode, now),
    }
}

fn validate_amount(amount: Cents) -> Result<(), AppError> {
    if amount <= 0 {
        return Err(AppError::InvalidAmount(format!(
            "{} (must be greater than zero)",
            format_cents(amount)
        )));
    }
    Ok(())
}

fn validate_category(category: String) -> Result<String, AppError> {
    let category = category.trim();
    if category.is_empty() {
        return Err(AppError::EmptyCategory);
    }
    Ok(category.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_analyze_splits_filtered_and_raw_inputs() {
        let now = day(2025, 3, 15);
        let transactions = vec![
            Transaction::expense(10000, "Dining", day(2025, 3, 1)),
            Transaction::expense(5000, "Dining", day(2025, 2, 10)),
            Transaction::income(99900, "Salary", day(2025, 3, 5)),
            Transaction::expense(7000, "Shopping", day(2023, 1, 1)),
        ];

        let report = analyze(&transactions, TimeRange::Month, HeatmapMode::Amount, now);

        assert_eq!(report.overview.transaction_count, 3);
        assert_eq!(report.overview.total_expense, 15000);
        assert_eq!(report.categories.len(), 1);
        assert_eq!(report.trend.value_at("2025/03"), Some(10000));

        let heatmap = report.heatmap.unwrap();
        assert_eq!(heatmap.window_start, day(2025, 3, 1));
        assert_eq!(heatmap.cells.values().map(|c| c.count).sum::<u32>(), 2);
    }

    #[test]
    fn test_analyze_empty() {
        let report = analyze(&[], TimeRange::Day, HeatmapMode::Count, day(2025, 3, 15));
        assert!(report.heatmap.is_none());
        assert!(report.categories.is_empty());
        assert_eq!(report.trend.labels.len(), 30);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(validate_amount(0), Err(AppError::InvalidAmount(_))));
        assert!(matches!(validate_amount(-1), Err(AppError::InvalidAmount(_))));
        assert!(validate_amount(1).is_ok());
        assert!(matches!(validate_category("  ".into()), Err(AppError::EmptyCategory)));
        assert_eq!(validate_category(" Dining ".into()).unwrap(), "Dining");
    }
}
