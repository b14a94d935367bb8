use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::debug;

use crate::application::LedgerService;
use crate::domain::{format_cents, participant_name, Expense, Participant, Trip, TripId};

/// Full in-memory state, as written by `export snapshot` and read by `--snapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub trips: Vec<Trip>,
    pub participants: Vec<Participant>,
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub current_trip_id: Option<TripId>,
}

impl Snapshot {
    pub fn capture(service: &LedgerService) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            trips: service.trips().to_vec(),
            participants: service.participants().to_vec(),
            expenses: service.expenses().to_vec(),
            current_trip_id: service.current_trip().map(|t| t.id),
        }
    }
}

/// Exporter for converting ledger data to various formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export expenses to CSV format
    pub fn export_expenses_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let participants = self.service.participants();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "description", "amount", "payer_id", "payer"])?;

        let mut count = 0;
        for expense in self.service.expenses() {
            csv_writer.write_record([
                expense.id.to_string(),
                expense.description.clone(),
                format_cents(expense.amount_cents),
                expense.payer_id.to_string(),
                participant_name(participants, expense.payer_id).to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush().context("Failed to write expenses CSV")?;
        debug!(count, "expenses exported");
        Ok(count)
    }

    /// Export per-participant balances to CSV format
    pub fn export_balances_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let report = self.service.balance_report();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["participant_id", "name", "paid", "owed_share", "balance"])?;

        for entry in &report.balances {
            csv_writer.write_record([
                entry.participant_id.to_string(),
                entry.name.clone(),
                format_cents(entry.paid),
                format_cents(entry.owed_share),
                format_cents(entry.balance),
            ])?;
        }

        csv_writer.flush().context("Failed to write balances CSV")?;
        debug!(count = report.balances.len(), "balances exported");
        Ok(report.balances.len())
    }

    /// Export per-participant balances as JSON
    pub fn export_balances_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let report = self.service.balance_report();
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writer.flush()?;
        Ok(report.balances.len())
    }

    /// Export expenses as JSON
    pub fn export_expenses_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let expenses = self.service.expenses();
        serde_json::to_writer_pretty(&mut writer, expenses)?;
        writer.flush()?;
        Ok(expenses.len())
    }

    /// Export the full state as a JSON snapshot
    pub fn export_snapshot_json<W: Write>(&self, mut writer: W) -> Result<Snapshot> {
        let snapshot = Snapshot::capture(self.service);

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
