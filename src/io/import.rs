use anyhow::{Context, Result};
use std::io::Read;

use crate::application::TrackerService;
use crate::domain::Transaction;
use crate::storage::decode_transactions;

/// Result of an import operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResult {
    /// Records that decoded successfully.
    pub decoded: usize,
    pub imported: usize,
    /// Records whose id was already present.
    pub skipped: usize,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub dry_run: bool,
}

/// Importer for loading a JSON backup into the store
pub struct Importer<'a> {
    service: &'a TrackerService,
}

impl<'a> Importer<'a> {
    pub fn new(service: &'a TrackerService) -> Self {
        Self { service }
    }

    /// Import a JSON array in the persisted format. Undecodable records are
    /// skipped with a warning; ids already in the store are not imported twice.
    pub async fn import_json<R: Read>(&self, mut reader: R, options: ImportOptions) -> Result<ImportResult> {
        let mut json = String::new();
        reader
            .read_to_string(&mut json)
            .context("Failed to read import input")?;
        let incoming = decode_transactions(&json)?;
        let decoded = incoming.len();

        if options.dry_run {
            let existing = self.service.all_transactions().await?;
            let skipped = count_known(&existing, &incoming);
            return Ok(ImportResult {
                decoded,
                imported: decoded - skipped,
                skipped,
            });
        }

        let merged = self.service.merge_transactions(incoming).await?;
        Ok(ImportResult {
            decoded,
            imported: merged.imported,
            skipped: merged.skipped,
        })
    }
}

/// How many of `incoming` a merge would skip: ids already in `existing`
/// plus repeats within `incoming`.
fn count_known(existing: &[Transaction], incoming: &[Transaction]) -> usize {
    let mut seen: std::collections::HashSet<&str> = existing.iter().map(|tx| tx.id.as_str()).collect();
    incoming.iter().filter(|tx| !seen.insert(tx.id.as_str())).count()
}
