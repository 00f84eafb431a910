use anyhow::Result;
use std::io::Write;

use crate::application::TrackerService;
use crate::domain::{Transaction, format_cents};

/// Output formats for exported records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    /// The persisted JSON array, suitable for `import`.
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format '{other}' (expected csv or json)")),
        }
    }
}

/// Exporter for writing the record list out of the store
pub struct Exporter<'a> {
    service: &'a TrackerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a TrackerService) -> Self {
        Self { service }
    }

    /// Export every transaction in the given format. Returns the record count.
    pub async fn export<W: Write>(&self, writer: W, format: ExportFormat) -> Result<usize> {
        let transactions = self.service.all_transactions().await?;
        match format {
            ExportFormat::Csv => write_csv(writer, &transactions),
            ExportFormat::Json => write_json(writer, &transactions),
        }
    }
}

/// Write transactions as CSV with a header row. Dates go out as stored.
pub fn write_csv<W: Write>(writer: W, transactions: &[Transaction]) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["id", "type", "amount", "category", "description", "date"])?;

    for tx in transactions {
        csv_writer.write_record([
            tx.id.as_str(),
            tx.kind.as_str(),
            format_cents(tx.amount).as_str(),
            tx.category.as_str(),
            tx.description.as_deref().unwrap_or(""),
            tx.date.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(transactions.len())
}

/// Write transactions as a pretty-printed JSON array.
pub fn write_json<W: Write>(mut writer: W, transactions: &[Transaction]) -> Result<usize> {
    serde_json::to_writer_pretty(&mut writer, transactions)?;
    writeln!(writer)?;
    Ok(transactions.len())
}
