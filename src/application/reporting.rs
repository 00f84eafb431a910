use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::{CategorySummary, HeatmapGrid, Overview, Totals, TrendSeries};
use crate::domain::{HeatmapMode, TimeRange, Transaction};

/// Everything the analysis screen shows for one set of controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub as_of: NaiveDate,
    pub range: TimeRange,
    pub mode: HeatmapMode,
    pub overview: Overview,
    /// Expense ranking, largest first.
    pub categories: Vec<CategorySummary>,
    pub income_categories: Vec<CategorySummary>,
    pub trend: TrendSeries,
    /// `None` when there are no transactions at all.
    pub heatmap: Option<HeatmapGrid>,
}

/// Transactions of a single day with their totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub transactions: Vec<Transaction>,
    pub totals: Totals,
}

/// A filtered slice of the record list with its totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordsView {
    pub transactions: Vec<Transaction>,
    pub totals: Totals,
}
