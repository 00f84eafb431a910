use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::domain::{Cents, HeatmapMode, TimeRange, Transaction, days_in_month, first_of_month};

/// Activity on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeatmapCell {
    /// Sum of expense amounts that day.
    pub amount: Cents,
    /// Number of transactions that day, income and expense alike.
    pub count: u32,
}

impl HeatmapCell {
    /// The channel the given mode colours by.
    pub fn value(&self, mode: HeatmapMode) -> i64 {
        match mode {
            HeatmapMode::Amount => self.amount,
            HeatmapMode::Count => self.count.into(),
        }
    }
}

/// Visual weight class of a heatmap cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityBand {
    NoData,
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl IntensityBand {
    /// Pick the band for a cell. Bands have inclusive upper bounds at
    /// 0.2, 0.4, 0.6, 0.8 and 1.0; a zero value is always `NoData`.
    pub fn classify(value: i64, intensity: f64) -> Self {
        if value == 0 {
            IntensityBand::NoData
        } else if intensity <= 0.2 {
            IntensityBand::VeryLow
        } else if intensity <= 0.4 {
            IntensityBand::Low
        } else if intensity <= 0.6 {
            IntensityBand::Medium
        } else if intensity <= 0.8 {
            IntensityBand::High
        } else {
            IntensityBand::VeryHigh
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntensityBand::NoData => "no data",
            IntensityBand::VeryLow => "very low",
            IntensityBand::Low => "low",
            IntensityBand::Medium => "medium",
            IntensityBand::High => "high",
            IntensityBand::VeryHigh => "very high",
        }
    }

    /// Terminal shade for the band.
    pub fn shade(&self) -> char {
        match self {
            IntensityBand::NoData => '·',
            IntensityBand::VeryLow => '░',
            IntensityBand::Low => '▒',
            IntensityBand::Medium => '▓',
            IntensityBand::High => '█',
            IntensityBand::VeryHigh => '■',
        }
    }

    pub const ALL: [IntensityBand; 6] = [
        IntensityBand::NoData,
        IntensityBand::VeryLow,
        IntensityBand::Low,
        IntensityBand::Medium,
        IntensityBand::High,
        IntensityBand::VeryHigh,
    ];
}

/// A dense calendar layout: `first_weekday_offset` blank cells, then
/// `day_count` consecutive days starting at `window_start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapGrid {
    pub range: TimeRange,
    pub mode: HeatmapMode,
    pub window_start: NaiveDate,
    pub window_start_year: i32,
    /// Zero-based month of `window_start` (January is 0).
    pub window_start_month_index: u32,
    /// Weekday of `window_start`, Sunday = 0.
    pub first_weekday_offset: u32,
    pub day_count: u32,
    pub cells: BTreeMap<NaiveDate, HeatmapCell>,
    /// Normalized to `[0, 1]` against the busiest cell under `mode`.
    pub intensities: BTreeMap<NaiveDate, f64>,
}

impl HeatmapGrid {
    /// Every day of the window, in calendar order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.cells.keys().copied()
    }

    pub fn window_end(&self) -> NaiveDate {
        self.cells.keys().next_back().copied().unwrap_or(self.window_start)
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&HeatmapCell> {
        self.cells.get(&date)
    }

    pub fn intensity(&self, date: NaiveDate) -> f64 {
        self.intensities.get(&date).copied().unwrap_or(0.0)
    }

    pub fn band(&self, date: NaiveDate) -> IntensityBand {
        let value = self.cell(date).map(|c| c.value(self.mode)).unwrap_or(0);
        IntensityBand::classify(value, self.intensity(date))
    }

    /// Grid slots row by row, seven per week, `None` for the leading blanks.
    pub fn weeks(&self) -> Vec<Vec<Option<NaiveDate>>> {
        let slots: Vec<Option<NaiveDate>> = std::iter::repeat_n(None, self.first_weekday_offset as usize)
            .chain(self.dates().map(Some))
            .collect();
        slots.chunks(7).map(<[_]>::to_vec).collect()
    }
}

/// Build the calendar heatmap.
///
/// `range` only chooses the window shape: `Day` shows the 30 days ending
/// at `now`, anything else shows the calendar month containing `now`.
/// Transactions outside that window are ignored no matter what the range
/// filter would say. Returns `None` when there are no transactions at all.
pub fn build_heatmap(
    transactions: &[Transaction],
    range: TimeRange,
    mode: HeatmapMode,
    now: NaiveDate,
) -> Option<HeatmapGrid> {
    if transactions.is_empty() {
        return None;
    }

    let (window_start, day_count) = match range {
        TimeRange::Day => (now - Days::new(29), 30),
        TimeRange::Month | TimeRange::Year => (first_of_month(now), days_in_month(now)),
    };

    let mut cells: BTreeMap<NaiveDate, HeatmapCell> = (0..day_count)
        .filter_map(|offset| window_start.checked_add_days(Days::new(offset.into())))
        .map(|date| (date, HeatmapCell::default()))
        .collect();

    for tx in transactions {
        let Some(date) = tx.date() else {
            trace!(id = %tx.id, date = %tx.date, "heatmap skips malformed date");
            continue;
        };
        let Some(cell) = cells.get_mut(&date) else {
            continue;
        };
        cell.count = cell.count.saturating_add(1);
        if tx.is_expense() {
            cell.amount = cell.amount.saturating_add(tx.effective_amount());
        }
    }

    // Floored at 1 cent rather than one whole unit so the busiest day of a
    // month of sub-unit expenses still reads 1.0.
    let max_amount = cells.values().map(|c| c.amount).max().unwrap_or(0).max(1);
    let max_count = cells.values().map(|c| c.count).max().unwrap_or(0).max(1);

    let intensities = cells
        .iter()
        .map(|(date, cell)| {
            let intensity = match mode {
                HeatmapMode::Amount => cell.amount as f64 / max_amount as f64,
                HeatmapMode::Count => f64::from(cell.count) / f64::from(max_count),
            };
            (*date, intensity)
        })
        .collect();

    Some(HeatmapGrid {
        range,
        mode,
        window_start,
        window_start_year: window_start.year(),
        window_start_month_index: window_start.month0(),
        first_weekday_offset: window_start.weekday().num_days_from_sunday(),
        day_count,
        cells,
        intensities,
    })
}
