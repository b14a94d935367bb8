use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{stdin, stdout, Read, Write};
use tracing::debug;

use crate::application::LedgerService;
use crate::domain::{format_cents, format_whole_units, parse_cents, participant_name};
use crate::io::{load_snapshot, Exporter, ImportOptions, Importer};
use crate::storage::Repository;

/// TripOwe - split trip expenses evenly and see who owes whom
#[derive(Parser)]
#[command(name = "tripowe")]
#[command(about = "Split shared trip expenses and summarize who owes whom")]
#[command(version)]
pub struct Cli {
    /// JSON snapshot to load (built-in sample trip when omitted)
    #[arg(short, long, global = true)]
    pub snapshot: Option<String>,

    /// Write the resulting state to this snapshot file after a change
    #[arg(long, global = true)]
    pub save_to: Option<String>,

    /// Currency symbol appended to amounts
    #[arg(long, global = true, default_value = "$")]
    pub currency: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List trips and show the current one
    Trips,

    /// Add a trip
    AddTrip {
        /// Trip name
        name: String,
    },

    /// Select the current trip (unknown ids keep the current selection)
    SelectTrip {
        /// Trip id
        id: u32,
    },

    /// Participant management commands
    #[command(subcommand)]
    Participant(ParticipantCommands),

    /// Expense management commands
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Show how much each participant paid
    Payments {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show net balances after equal-split settlement
    Balances {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// One-line settlement summary for a participant
    Summary {
        /// Participant id whose debts to summarize
        #[arg(short, long)]
        user: Option<u32>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Verify ledger integrity
    Check,

    /// Export data to CSV or JSON
    Export {
        /// What to export: expenses, balances, snapshot
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv, json (snapshot is always json)
        #[arg(short, long, default_value = "csv")]
        format: String,
    },

    /// Import expenses from CSV (description,amount,payer_id)
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
pub enum ParticipantCommands {
    /// List participants
    List,

    /// Add a participant
    Add {
        /// Participant name
        name: String,
    },

    /// Remove a participant who has not paid for anything
    Remove {
        /// Participant id
        id: u32,
    },
}

#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// List expenses
    List,

    /// Record an expense shared by all participants
    Add {
        /// What was paid for
        description: String,

        /// Amount (e.g., "50.00" or "50")
        amount: String,

        /// Id of the participant who paid
        #[arg(long)]
        payer: u32,
    },

    /// Remove an expense
    Remove {
        /// Expense id
        id: u32,
    },
}

impl Cli {
    fn load_service(&self) -> Result<LedgerService> {
        let repo = match &self.snapshot {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open snapshot: {}", path))?;
                let repo = load_snapshot(file)
                    .with_context(|| format!("Failed to load snapshot: {}", path))?;
                debug!(path = %path, "snapshot loaded");
                repo
            }
            None => Repository::with_sample_data(),
        };
        Ok(LedgerService::new(repo))
    }

    fn save_if_requested(&self, service: &LedgerService) -> Result<()> {
        if let Some(path) = &self.save_to {
            let file = File::create(path)
                .with_context(|| format!("Failed to create snapshot file: {}", path))?;
            Exporter::new(service).export_snapshot_json(file)?;
            eprintln!("Saved snapshot to {}", path);
        }
        Ok(())
    }

    pub fn run(self) -> Result<()> {
        let mut service = self.load_service()?;
        let revision = service.revision();

        match &self.command {
            Commands::Trips => run_trips_command(&service),

            Commands::AddTrip { name } => {
                let trip = service.add_trip(name.clone());
                println!("Added trip: {} (ID: {})", trip.name, trip.id);
            }

            Commands::SelectTrip { id } => {
                if service.select_trip(*id) {
                    println!("Current trip: {}", describe_current_trip(&service));
                } else {
                    println!(
                        "No trip with ID {}; current trip is still {}",
                        id,
                        describe_current_trip(&service)
                    );
                }
            }

            Commands::Participant(cmd) => run_participant_command(&mut service, cmd)?,

            Commands::Expense(cmd) => run_expense_command(&mut service, cmd, &self.currency)?,

            Commands::Payments { format } => run_payments_command(&service, format, &self.currency)?,

            Commands::Balances { format } => run_balances_command(&service, format, &self.currency)?,

            Commands::Summary { user, format } => {
                run_summary_command(&service, *user, format, &self.currency)?
            }

            Commands::Check => run_check_command(&service)?,

            Commands::Export {
                export_type,
                output,
                format,
            } => run_export_command(&service, export_type, output.as_deref(), format)?,

            Commands::Import { input, dry_run } => {
                run_import_command(&mut service, input.as_deref(), *dry_run)?
            }
        }

        if service.revision() != revision {
            self.save_if_requested(&service)?;
        }
        Ok(())
    }
}

fn describe_current_trip(service: &LedgerService) -> String {
    service
        .current_trip()
        .map(|t| format!("{} (ID: {})", t.name, t.id))
        .unwrap_or_else(|| "(none)".to_string())
}

fn run_trips_command(service: &LedgerService) {
    if service.trips().is_empty() {
        println!("No trips found.");
        return;
    }

    let current = service.current_trip().map(|t| t.id);
    println!("{:<4} {:<6} NAME", "", "ID");
    println!("{}", "-".repeat(40));
    for trip in service.trips() {
        let marker = if Some(trip.id) == current { "*" } else { "" };
        println!("{:<4} {:<6} {}", marker, trip.id, trip.name);
    }
}

fn run_participant_command(service: &mut LedgerService, cmd: &ParticipantCommands) -> Result<()> {
    match cmd {
        ParticipantCommands::List => {
            if service.participants().is_empty() {
                println!("No participants.");
            } else {
                println!("{:<6} NAME", "ID");
                println!("{}", "-".repeat(30));
                for participant in service.participants() {
                    println!("{:<6} {}", participant.id, participant.name);
                }
            }
        }

        ParticipantCommands::Add { name } => {
            let participant = service.add_participant(name)?;
            println!(
                "Added participant: {} (ID: {})",
                participant.name, participant.id
            );
        }

        ParticipantCommands::Remove { id } => {
            let participant = service.remove_participant(*id)?;
            println!(
                "Removed participant: {} (ID: {})",
                participant.name, participant.id
            );
        }
    }
    Ok(())
}

fn run_expense_command(
    service: &mut LedgerService,
    cmd: &ExpenseCommands,
    currency: &str,
) -> Result<()> {
    match cmd {
        ExpenseCommands::List => {
            if service.expenses().is_empty() {
                println!("No expenses.");
            } else {
                println!(
                    "{:<6} {:>12} {:<15} DESCRIPTION",
                    "ID", "AMOUNT", "PAYER"
                );
                println!("{}", "-".repeat(60));
                for expense in service.expenses() {
                    println!(
                        "{:<6} {:>12} {:<15} {}",
                        expense.id,
                        format!("{}{}", format_cents(expense.amount_cents), currency),
                        truncate(participant_name(service.participants(), expense.payer_id), 15),
                        truncate(&expense.description, 30)
                    );
                }
            }
        }

        ExpenseCommands::Add {
            description,
            amount,
            payer,
        } => {
            let amount_cents =
                parse_cents(amount).context("Invalid amount format. Use '50.00' or '50'")?;
            let expense = service.add_expense(description, amount_cents, *payer)?;
            println!(
                "Added expense: {}, {}{} (ID: {}, Payer: {})",
                expense.description,
                format_cents(expense.amount_cents),
                currency,
                expense.id,
                participant_name(service.participants(), expense.payer_id)
            );
        }

        ExpenseCommands::Remove { id } => {
            let expense = service.remove_expense(*id)?;
            println!("Removed expense: {} (ID: {})", expense.description, expense.id);
        }
    }
    Ok(())
}

fn run_payments_command(service: &LedgerService, format: &str, currency: &str) -> Result<()> {
    let report = service.payments_report();
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "table" => {
            println!("{:<20} {:>12} {:>8}", "PARTICIPANT", "PAID", "SHARE");
            println!("{}", "-".repeat(42));
            for entry in &report.payments {
                println!(
                    "{:<20} {:>12} {:>7.1}%",
                    truncate(&entry.name, 20),
                    format!("{}{}", format_cents(entry.paid), currency),
                    entry.percentage
                );
            }
            println!("{}", "-".repeat(42));
            println!("Total {}{}", format_whole_units(report.total), currency);
        }
        _ => anyhow::bail!("Invalid format '{}'. Valid formats: table, json", format),
    }
    Ok(())
}

fn run_balances_command(service: &LedgerService, format: &str, currency: &str) -> Result<()> {
    let report = service.balance_report();
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "table" => {
            println!(
                "{:<20} {:>12} {:>12} {:>12}",
                "PARTICIPANT", "PAID", "SHARE", "BALANCE"
            );
            println!("{}", "-".repeat(59));
            for entry in &report.balances {
                println!(
                    "{:<20} {:>12} {:>12} {:>12}",
                    truncate(&entry.name, 20),
                    format!("{}{}", format_cents(entry.paid), currency),
                    format!("{}{}", format_cents(entry.owed_share), currency),
                    format!("{}{}", format_cents(entry.balance), currency),
                );
            }
            if report.residue != 0 {
                println!();
                println!("Rounding residue: {}{}", format_cents(report.residue), currency);
            }
        }
        _ => anyhow::bail!("Invalid format '{}'. Valid formats: table, json", format),
    }
    Ok(())
}

fn run_summary_command(
    service: &LedgerService,
    user: Option<u32>,
    format: &str,
    currency: &str,
) -> Result<()> {
    let summary = service.debt_summary(user);
    match format {
        "text" => println!("{}", summary.render(currency)),
        "json" => {
            let value = serde_json::json!({
                "tone": summary.tone(),
                "text": summary.render(currency),
                "summary": summary,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        _ => anyhow::bail!("Invalid format '{}'. Valid formats: text, json", format),
    }
    Ok(())
}

fn run_check_command(service: &LedgerService) -> Result<()> {
    println!("Checking ledger integrity...\n");

    let stats = service.integrity_stats();
    println!("Trips:        {}", stats.trip_count);
    println!("Participants: {}", stats.participant_count);
    println!("Expenses:     {}", stats.expense_count);
    println!();

    if stats.is_healthy() {
        println!("Ledger is consistent.");
        return Ok(());
    }

    println!("Issues found:");
    if stats.duplicate_trip_ids > 0 {
        println!("  - {} duplicate trip id(s)", stats.duplicate_trip_ids);
    }
    if stats.duplicate_participant_ids > 0 {
        println!(
            "  - {} duplicate participant id(s)",
            stats.duplicate_participant_ids
        );
    }
    if stats.invalid_payer_refs > 0 {
        println!(
            "  - {} expense(s) paid by an unknown participant",
            stats.invalid_payer_refs
        );
    }
    if stats.invalid_amounts > 0 {
        println!("  - {} expense(s) with a negative amount", stats.invalid_amounts);
    }
    anyhow::bail!("Ledger integrity check failed");
}

fn run_export_command(
    service: &LedgerService,
    export_type: &str,
    output: Option<&str>,
    format: &str,
) -> Result<()> {
    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match (export_type, format) {
        ("expenses", "csv") => {
            let count = exporter.export_expenses_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} expenses", count);
            }
        }
        ("expenses", "json") => {
            let count = exporter.export_expenses_json(writer)?;
            if output.is_some() {
                eprintln!("Exported {} expenses", count);
            }
        }
        ("balances", "csv") => {
            let count = exporter.export_balances_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} balances", count);
            }
        }
        ("balances", "json") => {
            let count = exporter.export_balances_json(writer)?;
            if output.is_some() {
                eprintln!("Exported {} balances", count);
            }
        }
        ("snapshot", _) => {
            let snapshot = exporter.export_snapshot_json(writer)?;
            if output.is_some() {
                eprintln!(
                    "Exported snapshot: {} trips, {} participants, {} expenses",
                    snapshot.trips.len(),
                    snapshot.participants.len(),
                    snapshot.expenses.len()
                );
            }
        }
        ("expenses" | "balances", _) => {
            anyhow::bail!("Invalid format '{}'. Valid formats: csv, json", format);
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: expenses, balances, snapshot",
                export_type
            );
        }
    }

    Ok(())
}

fn run_import_command(
    service: &mut LedgerService,
    input: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let reader: Box<dyn Read> = match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open input file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdin()),
    };

    let result = Importer::new(service).import_expenses_csv(reader, ImportOptions { dry_run })?;

    if dry_run {
        println!("Validation complete");
    } else {
        println!("Import complete");
    }
    println!("  Imported: {}", result.imported);
    println!("  Errors:   {}", result.errors.len());

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in result.errors.iter().take(10) {
            println!(
                "  Line {}: {}",
                error.line,
                error
                    .field
                    .as_ref()
                    .map(|f| format!("{}: ", f))
                    .unwrap_or_default()
                    + &error.error
            );
        }
        if result.errors.len() > 10 {
            println!("  ... and {} more errors", result.errors.len() - 10);
        }
    }

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
