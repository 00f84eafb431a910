use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Bucket granularity of the analysis views, which also fixes the length
/// of the trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// Trailing 30 days, one bucket per day.
    Day,
    /// Trailing 12 months including the current one, one bucket per month.
    #[default]
    Month,
    /// Trailing 5 years including the current one, one bucket per year.
    Year,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Day => "day",
            TimeRange::Month => "month",
            TimeRange::Year => "year",
        }
    }

    /// Number of trend buckets, ending at the bucket containing "now".
    pub fn bucket_count(&self) -> u32 {
        match self {
            TimeRange::Day => 30,
            TimeRange::Month => 12,
            TimeRange::Year => 5,
        }
    }

    /// Inclusive lower bound of the range filter.
    ///
    /// Note the day window reaches back 30 days, one more than the 30
    /// trend buckets cover.
    pub fn window_start(&self, now: NaiveDate) -> NaiveDate {
        match self {
            TimeRange::Day => now - Days::new(30),
            TimeRange::Month => first_of_month(now) - Months::new(11),
            TimeRange::Year => first_of_year(now.year() - 4).unwrap_or(NaiveDate::MIN),
        }
    }

    /// First day of the bucket containing `date`.
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            TimeRange::Day => date,
            TimeRange::Month => first_of_month(date),
            TimeRange::Year => first_of_year(date.year()).unwrap_or(date),
        }
    }

    /// Bucket starts, oldest to newest, ending at the bucket containing `now`.
    pub fn bucket_starts(&self, now: NaiveDate) -> Vec<NaiveDate> {
        let newest = self.bucket_start(now);
        (0..self.bucket_count())
            .rev()
            .filter_map(|back| match self {
                TimeRange::Day => newest.checked_sub_days(Days::new(back.into())),
                TimeRange::Month => newest.checked_sub_months(Months::new(back)),
                TimeRange::Year => first_of_year(newest.year() - back as i32),
            })
            .collect()
    }

    /// Display label of a bucket: `3/5`, `2025/03` or `2025`.
    pub fn bucket_label(&self, date: NaiveDate) -> String {
        match self {
            TimeRange::Day => format!("{}/{}", date.month(), date.day()),
            TimeRange::Month => format!("{}/{:02}", date.year(), date.month()),
            TimeRange::Year => date.year().to_string(),
        }
    }
}

impl std::str::FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(TimeRange::Day),
            "month" => Ok(TimeRange::Month),
            "year" => Ok(TimeRange::Year),
            other => Err(format!("unknown time range '{other}' (expected day, month or year)")),
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the heatmap intensity reflects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatmapMode {
    /// Summed expense amount per day.
    #[default]
    Amount,
    /// Number of transactions per day, income included.
    Count,
}

impl HeatmapMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeatmapMode::Amount => "amount",
            HeatmapMode::Count => "count",
        }
    }
}

impl std::str::FromStr for HeatmapMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "amount" => Ok(HeatmapMode::Amount),
            "count" => Ok(HeatmapMode::Count),
            other => Err(format!("unknown heatmap mode '{other}' (expected amount or count)")),
        }
    }
}

impl std::fmt::Display for HeatmapMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn first_of_year(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}

/// Number of days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = first_of_month(date);
    first
        .checked_add_months(Months::new(1))
        .map(|next| (next - first).num_days() as u32)
        .unwrap_or(31)
}
