use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use crate::analytics::{
    CategorySummary, HeatmapGrid, IntensityBand, Overview, TransactionFilter, TrendSeries,
};
use crate::application::{AnalysisReport, AppError, NewTransaction, TrackerService, TransactionUpdate};
use crate::domain::{
    Cents, CategoryCatalog, HeatmapMode, TimeRange, Transaction, TransactionType, format_cents,
    parse_cents, parse_transaction_date,
};
use crate::io::{ExportFormat, Exporter, ImportOptions, Importer};

/// Foxtally - personal expense tracker
#[derive(Parser)]
#[command(name = "foxtally")]
#[command(about = "Record income and expenses and see where the money goes")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "FOXTALLY_DATABASE", default_value = "foxtally.db", global = true)]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Treat this day as today (YYYY-MM-DD or YYYY/MM/DD)
    #[arg(long, global = true)]
    pub as_of: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Record a transaction
    Add {
        /// Amount (e.g., "12.50" or "12")
        amount: String,

        /// Category (e.g., "Dining", "Salary")
        #[arg(short, long)]
        category: String,

        /// Transaction type: income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: TransactionType,

        /// Free-form note
        #[arg(short, long)]
        description: Option<String>,

        /// Date of the transaction (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List recorded transactions, newest first
    List {
        /// Filter by type: income or expense
        #[arg(short = 't', long = "type")]
        kind: Option<TransactionType>,

        /// Filter by calendar day
        #[arg(long)]
        date: Option<String>,

        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,

        /// Maximum number of transactions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show one transaction
    Show {
        /// Transaction ID
        id: String,
    },

    /// Change fields of a transaction
    Edit {
        /// Transaction ID
        id: String,

        #[arg(short, long)]
        amount: Option<String>,

        #[arg(short = 't', long = "type")]
        kind: Option<TransactionType>,

        #[arg(short, long)]
        category: Option<String>,

        /// New note (empty string clears it)
        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },

    /// Show the overall balance (income minus expense)
    Balance,

    /// Show one day's transactions and totals (defaults to today)
    #[command(alias = "today")]
    Day {
        date: Option<String>,
    },

    /// List the built-in categories
    Categories {
        /// Only show one type: income or expense
        #[arg(short = 't', long = "type")]
        kind: Option<TransactionType>,
    },

    /// Spending analysis
    #[command(subcommand)]
    Report(ReportCommands),

    /// Export transactions to CSV or JSON
    Export {
        /// Format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Import transactions from a JSON backup
    Import {
        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Preview without importing
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Income, expense and balance for the range
    Overview {
        /// Range: day (30 days), month (12 months), year (5 years)
        #[arg(short, long, default_value = "month")]
        range: TimeRange,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: ReportFormat,
    },

    /// Expense totals per day, month or year
    Trend {
        #[arg(short, long, default_value = "month")]
        range: TimeRange,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: ReportFormat,
    },

    /// Expense categories ranked by total
    Ranking {
        #[arg(short, long, default_value = "month")]
        range: TimeRange,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: ReportFormat,
    },

    /// Calendar heatmap of the current month (or last 30 days with --range day)
    Heatmap {
        #[arg(short, long, default_value = "month")]
        range: TimeRange,

        /// Colour by: amount, count
        #[arg(short, long, default_value = "amount")]
        mode: HeatmapMode,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: ReportFormat,
    },
}

/// Output formats for `report` subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(ReportFormat::Table),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(format!(
                "unknown report format '{other}' (expected table, json or csv)"
            )),
        }
    }
}

impl Cli {
    fn today(&self) -> Result<NaiveDate> {
        match &self.as_of {
            Some(date_str) => parse_date(date_str),
            None => Ok(Local::now().date_naive()),
        }
    }

    pub async fn run(self) -> Result<()> {
        let today = self.today()?;
        tracing::debug!(database = %self.database, %today, "running command");

        match self.command {
            Commands::Init => {
                TrackerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Add {
                amount,
                category,
                kind,
                description,
                date,
            } => {
                let service = TrackerService::connect(&self.database).await?;
                let amount = parse_cents(&amount).context("Invalid amount")?;
                let date = date.as_deref().map(parse_date).transpose()?.unwrap_or(today);

                let tx = service
                    .record_transaction(NewTransaction {
                        kind,
                        amount,
                        category,
                        description,
                        date,
                    })
                    .await?;

                println!(
                    "Recorded {} {} [{}] on {}",
                    tx.kind,
                    format_cents(tx.amount),
                    tx.category,
                    tx.date
                );
                println!("ID: {}", tx.id);
            }

            Commands::List {
                kind,
                date,
                category,
                limit,
            } => {
                let service = TrackerService::connect(&self.database).await?;
                let filter = TransactionFilter {
                    kind,
                    date: date.as_deref().map(parse_date).transpose()?,
                    category,
                };
                run_list_command(&service, &filter, limit).await?;
            }

            Commands::Show { id } => {
                let service = TrackerService::connect(&self.database).await?;
                let tx = service.get_transaction(&id).await?;
                print_transaction_detail(&tx);
            }

            Commands::Edit {
                id,
                amount,
                kind,
                category,
                description,
                date,
            } => {
                let service = TrackerService::connect(&self.database).await?;
                let update = TransactionUpdate {
                    kind,
                    amount: amount
                        .as_deref()
                        .map(parse_cents)
                        .transpose()
                        .context("Invalid amount")?,
                    category,
                    description,
                    date: date.as_deref().map(parse_date).transpose()?,
                };
                let tx = service.update_transaction(&id, update).await?;
                println!("Updated transaction {}", tx.id);
                print_transaction_detail(&tx);
            }

            Commands::Delete { id } => {
                let service = TrackerService::connect(&self.database).await?;
                let tx = service.delete_transaction(&id).await?;
                println!(
                    "Deleted {} {} [{}] on {}",
                    tx.kind,
                    format_cents(tx.amount),
                    tx.category,
                    tx.date
                );
            }

            Commands::Balance => {
                let service = TrackerService::connect(&self.database).await?;
                println!("Balance: {}", format_cents(service.balance().await?));
            }

            Commands::Day { date } => {
                let service = TrackerService::connect(&self.database).await?;
                let date = date.as_deref().map(parse_date).transpose()?.unwrap_or(today);
                run_day_command(&service, date).await?;
            }

            Commands::Categories { kind } => {
                run_categories_command(kind);
            }

            Commands::Report(report_cmd) => {
                let service = TrackerService::connect(&self.database).await?;
                run_report_command(&service, report_cmd, today).await?;
            }

            Commands::Export { format, output } => {
                let service = TrackerService::connect(&self.database).await?;
                let exporter = Exporter::new(&service);
                let count = match output {
                    Some(path) => {
                        let file = File::create(&path)
                            .with_context(|| format!("Failed to create {}", path))?;
                        let count = exporter.export(BufWriter::new(file), format).await?;
                        eprintln!("Exported {} transaction(s) to {}", count, path);
                        count
                    }
                    None => exporter.export(std::io::stdout().lock(), format).await?,
                };
                tracing::info!(count, "export finished");
            }

            Commands::Import { input, dry_run } => {
                let service = TrackerService::connect(&self.database).await?;
                let importer = Importer::new(&service);
                let options = ImportOptions { dry_run };
                let result = match input {
                    Some(path) => {
                        let file =
                            File::open(&path).with_context(|| format!("Failed to open {}", path))?;
                        importer.import_json(BufReader::new(file), options).await?
                    }
                    None => importer.import_json(std::io::stdin().lock(), options).await?,
                };

                let verb = if dry_run { "Would import" } else { "Imported" };
                println!(
                    "{} {} of {} record(s), {} duplicate(s) skipped",
                    verb, result.imported, result.decoded, result.skipped
                );
            }
        }

        Ok(())
    }
}

async fn run_list_command(
    service: &TrackerService,
    filter: &TransactionFilter,
    limit: Option<usize>,
) -> Result<()> {
    let view = service.list_transactions(filter).await?;

    if view.transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    print_transaction_table(view.transactions.iter().take(limit.unwrap_or(usize::MAX)));
    println!();
    println!("Income:  {:>12}", format_cents(view.totals.income));
    println!("Expense: {:>12}", format_cents(view.totals.expense));
    if let Some(limit) = limit.filter(|l| *l < view.transactions.len()) {
        println!("(showing {} of {})", limit, view.transactions.len());
    }
    Ok(())
}

async fn run_day_command(service: &TrackerService, date: NaiveDate) -> Result<()> {
    let summary = service.day_summary(date).await?;

    println!("{}", date.format("%Y.%m.%d"));
    println!("{} transaction(s)", summary.transactions.len());
    if summary.transactions.is_empty() {
        println!("No transactions on this day.");
        return Ok(());
    }

    println!();
    let catalog = CategoryCatalog::default();
    for tx in &summary.transactions {
        let sign = if tx.is_income() { "+" } else { "-" };
        println!(
            "{} {:<20} {:>12}",
            catalog.icon_for(&tx.category).glyph(),
            truncate(&tx.category, 20),
            format!("{}{}", sign, format_cents(tx.amount))
        );
    }
    println!();
    println!("Income:  {:>12}", format_cents(summary.totals.income));
    println!("Expense: {:>12}", format_cents(summary.totals.expense));
    Ok(())
}

fn run_categories_command(kind: Option<TransactionType>) {
    let catalog = CategoryCatalog::default();
    println!("{:<4} {:<16} {:<8}", "", "CATEGORY", "TYPE");
    println!("{}", "-".repeat(30));
    for category in catalog.all().iter().filter(|c| kind.is_none_or(|k| c.kind == k)) {
        println!(
            "{:<4} {:<16} {:<8}",
            category.icon.glyph(),
            category.name,
            category.kind
        );
    }
}

async fn run_report_command(
    service: &TrackerService,
    cmd: ReportCommands,
    today: NaiveDate,
) -> Result<()> {
    match cmd {
        ReportCommands::Overview { range, format } => {
            let report = service.analysis(range, HeatmapMode::Amount, today).await?;
            match format {
                ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report.overview)?),
                ReportFormat::Csv => write_overview_csv(std::io::stdout().lock(), &report.overview)?,
                ReportFormat::Table => print_overview(&report),
            }
        }

        ReportCommands::Trend { range, format } => {
            let report = service.analysis(range, HeatmapMode::Amount, today).await?;
            match format {
                ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report.trend)?),
                ReportFormat::Csv => write_trend_csv(std::io::stdout().lock(), &report.trend)?,
                ReportFormat::Table => print_trend(&report.trend, today),
            }
        }

        ReportCommands::Ranking { range, format } => {
            let report = service.analysis(range, HeatmapMode::Amount, today).await?;
            match format {
                ReportFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&report.categories)?)
                }
                ReportFormat::Csv => write_ranking_csv(std::io::stdout().lock(), &report.categories)?,
                ReportFormat::Table => print_ranking(&report),
            }
        }

        ReportCommands::Heatmap {
            range,
            mode,
            format,
        } => {
            let report = service.analysis(range, mode, today).await?;
            match (format, &report.heatmap) {
                (ReportFormat::Json, _) => {
                    println!("{}", serde_json::to_string_pretty(&report.heatmap)?)
                }
                (ReportFormat::Csv, grid) => {
                    write_heatmap_csv(std::io::stdout().lock(), grid.as_ref())?
                }
                (ReportFormat::Table, Some(grid)) => print_heatmap(grid, today),
                (ReportFormat::Table, None) => println!("No transactions recorded yet."),
            }
        }
    }

    Ok(())
}

fn write_overview_csv<W: Write>(writer: W, overview: &Overview) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["total_income", "total_expense", "balance", "transaction_count"])?;
    csv_writer.write_record([
        format_cents(overview.total_income),
        format_cents(overview.total_expense),
        format_cents(overview.balance),
        overview.transaction_count.to_string(),
    ])?;
    csv_writer.flush()?;
    Ok(())
}

fn write_trend_csv<W: Write>(writer: W, trend: &TrendSeries) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["period", "expense"])?;
    for (label, value) in trend.points() {
        csv_writer.write_record([label, format_cents(value).as_str()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn write_ranking_csv<W: Write>(writer: W, categories: &[CategorySummary]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["rank", "category", "total", "count", "percentage"])?;
    for (i, cat) in categories.iter().enumerate() {
        csv_writer.write_record([
            (i + 1).to_string(),
            cat.category.clone(),
            format_cents(cat.total),
            cat.count.to_string(),
            format!("{:.1}", cat.percentage),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// One row per day of the window, oldest first. No grid means a header only.
fn write_heatmap_csv<W: Write>(writer: W, grid: Option<&HeatmapGrid>) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["date", "amount", "count", "intensity", "band"])?;
    if let Some(grid) = grid {
        for date in grid.dates() {
            let cell = grid.cell(date).copied().unwrap_or_default();
            csv_writer.write_record([
                date.to_string(),
                format_cents(cell.amount),
                cell.count.to_string(),
                format!("{:.3}", grid.intensity(date)),
                grid.band(date).as_str().to_string(),
            ])?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

fn print_overview(report: &AnalysisReport) {
    let overview = &report.overview;
    println!("Overview ({})", range_description(report.range));
    println!();
    println!("Total Income:   {:>15}", format_cents(overview.total_income));
    println!("Total Expense:  {:>15}", format_cents(overview.total_expense));
    println!("{}", "-".repeat(32));
    println!("Balance:        {:>15}", format_cents(overview.balance));
    println!("Transactions:   {:>15}", overview.transaction_count);
}

fn print_trend(trend: &TrendSeries, today: NaiveDate) {
    println!("Expense Trend ({}, as of {})", range_description(trend.range), today);
    println!();
    let peak = trend.peak();
    for (label, value) in trend.points() {
        println!(
            "{:>8} {:>12} {}",
            label,
            format_cents(value),
            "#".repeat(bar_width(value, peak))
        );
    }
    println!("{}", "-".repeat(22));
    println!("{:>8} {:>12}", "TOTAL", format_cents(trend.total()));
}

/// Length of a trend bar scaled against the peak bucket.
fn bar_width(value: Cents, peak: Cents) -> usize {
    const BAR_WIDTH: f64 = 40.0;

    if peak <= 0 || value <= 0 {
        return 0;
    }
    (value as f64 / peak as f64 * BAR_WIDTH) as usize
}

fn print_ranking(report: &AnalysisReport) {
    println!("Expense Ranking ({})", range_description(report.range));
    println!();

    if report.categories.is_empty() {
        println!("No expenses in this range.");
        return;
    }

    let catalog = CategoryCatalog::default();
    println!(
        "{:>4} {:<4} {:<20} {:>12} {:>8} {:>8}",
        "#", "", "CATEGORY", "TOTAL", "COUNT", "PERCENT"
    );
    println!("{}", "-".repeat(62));
    for (i, cat) in report.categories.iter().enumerate() {
        println!(
            "{:>4} {:<4} {:<20} {:>12} {:>8} {:>7.1}%",
            i + 1,
            catalog.icon_for(&cat.category).glyph(),
            truncate(&cat.category, 20),
            format_cents(cat.total),
            cat.count,
            cat.percentage
        );
    }
    println!("{}", "-".repeat(62));
    println!(
        "{:>4} {:<4} {:<20} {:>12}",
        "",
        "",
        "TOTAL",
        format_cents(report.overview.total_expense)
    );
}

fn print_heatmap(grid: &HeatmapGrid, today: NaiveDate) {
    let title = match grid.range {
        TimeRange::Day => format!("{} to {}", grid.window_start, grid.window_end()),
        _ => grid.window_start.format("%B %Y").to_string(),
    };
    println!("Heatmap by {} ({})", grid.mode, title);
    println!();
    println!(" Su  Mo  Tu  We  Th  Fr  Sa");

    for week in grid.weeks() {
        let row: String = week
            .iter()
            .map(|slot| match slot {
                Some(date) => {
                    let marker = if *date == today { '*' } else { ' ' };
                    format!("{}{:>2}{}", marker, date.day(), grid.band(*date).shade())
                }
                None => "    ".to_string(),
            })
            .collect();
        println!("{}", row.trim_end());
    }

    println!();
    let legend: Vec<String> = IntensityBand::ALL
        .iter()
        .map(|band| format!("{} {}", band.shade(), band.as_str()))
        .collect();
    println!("{}", legend.join("  "));
}

fn print_transaction_table<'a>(transactions: impl Iterator<Item = &'a Transaction>) {
    println!(
        "{:<10} {:<8} {:<12} {:>12} {:<16} {:<24}",
        "DATE", "TYPE", "CATEGORY", "AMOUNT", "DESCRIPTION", "ID"
    );
    println!("{}", "-".repeat(87));
    for tx in transactions {
        println!(
            "{:<10} {:<8} {:<12} {:>12} {:<16} {:<24}",
            tx.date,
            tx.kind,
            truncate(&tx.category, 12),
            format_cents(tx.amount),
            truncate(tx.description.as_deref().unwrap_or(""), 16),
            tx.id
        );
    }
}

fn print_transaction_detail(tx: &Transaction) {
    println!("ID:          {}", tx.id);
    println!("Type:        {}", tx.kind);
    println!("Amount:      {}", format_cents(tx.amount));
    println!("Category:    {}", tx.category);
    println!("Date:        {}", tx.date);
    if let Some(description) = &tx.description {
        println!("Description: {}", description);
    }
}

fn range_description(range: TimeRange) -> &'static str {
    match range {
        TimeRange::Day => "last 30 days",
        TimeRange::Month => "last 12 months",
        TimeRange::Year => "last 5 years",
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    parse_transaction_date(date_str).ok_or_else(|| {
        AppError::InvalidDate(format!("'{}' (expected YYYY-MM-DD or YYYY/MM/DD)", date_str))
            .into()
    })
}
