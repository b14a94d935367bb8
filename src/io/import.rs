use anyhow::{Context, Result};
use std::io::Read;
use tracing::warn;

use crate::application::LedgerService;
use crate::domain::{parse_cents, ParticipantId};
use crate::io::export::Snapshot;
use crate::storage::Repository;

/// Result of an import operation
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub imported: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred during import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub dry_run: bool,
}

/// Read a JSON snapshot into a repository.
///
/// Integrity problems (duplicate ids, orphan payers) are logged, not rejected:
/// the settlement engine tolerates them.
pub fn load_snapshot<R: Read>(reader: R) -> Result<Repository> {
    let snapshot: Snapshot =
        serde_json::from_reader(reader).context("Failed to parse snapshot")?;
    let repo = Repository::from_parts(
        snapshot.trips,
        snapshot.participants,
        snapshot.expenses,
        snapshot.current_trip_id,
    );

    let stats = repo.integrity_stats();
    if !stats.is_healthy() {
        warn!(?stats, "snapshot has integrity problems");
    }
    Ok(repo)
}

/// Importer for loading expenses into the ledger
pub struct Importer<'a> {
    service: &'a mut LedgerService,
}

impl<'a> Importer<'a> {
    pub fn new(service: &'a mut LedgerService) -> Self {
        Self { service }
    }

    /// Import expenses from CSV with a `description,amount,payer_id` header.
    /// Rows that fail validation are reported and skipped.
    pub fn import_expenses_csv<R: Read>(
        &mut self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers = csv_reader.headers().context("Missing CSV header")?.clone();
        let column = |name: &str| headers.iter().position(|h| h.trim() == name);
        let (Some(description_col), Some(amount_col), Some(payer_col)) =
            (column("description"), column("amount"), column("payer_id"))
        else {
            anyhow::bail!("CSV header must contain description, amount and payer_id");
        };

        // Dry runs validate against a throwaway copy of the ledger
        let mut scratch;
        let target: &mut LedgerService = if options.dry_run {
            scratch = LedgerService::new(self.service.repository().clone());
            &mut scratch
        } else {
            &mut *self.service
        };

        let mut imported = 0;
        let mut errors = Vec::new();

        for (line_num, result) in csv_reader.records().enumerate() {
            let line = line_num + 2; // +2 for header and 0-indexing

            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: None,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };

            let description = record.get(description_col).unwrap_or("");
            let amount_cents = match parse_cents(record.get(amount_col).unwrap_or("")) {
                Ok(a) => a,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: Some("amount".to_string()),
                        error: format!("Invalid amount: {}", e),
                    });
                    continue;
                }
            };
            let payer_id: ParticipantId = match record.get(payer_col).unwrap_or("").trim().parse() {
                Ok(id) => id,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: Some("payer_id".to_string()),
                        error: format!("Invalid payer id: {}", e),
                    });
                    continue;
                }
            };

            match target.add_expense(description, amount_cents, payer_id) {
                Ok(_) => imported += 1,
                Err(e) => errors.push(ImportError {
                    line,
                    field: None,
                    error: format!("Expense rejected: {}", e),
                }),
            }
        }

        Ok(ImportResult { imported, errors })
    }
}
