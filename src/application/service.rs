use std::collections::HashMap;

use tracing::{debug, info};

use crate::domain::{
    compute_all_balances, next_expense_id, next_participant_id, next_trip_id, paid_by,
    summarize_debts, total_amount, Cents, DebtSummary, Expense, ExpenseId, Participant,
    ParticipantId, Trip, TripId, DEFAULT_USER_ID,
};
use crate::storage::{IntegrityStats, Repository};

use super::{
    AppError, BalanceReport, ParticipantBalance, PaymentSummary, PaymentsReport,
};

/// Application service providing the ledger operations.
/// This is the primary interface for any client (CLI, UI layer, etc.).
///
/// Queries take `&self` and always see a consistent snapshot; mutations take
/// `&mut self`.
pub struct LedgerService {
    repo: Repository,
}

impl LedgerService {
    /// Create a new ledger service over the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Counter that changes whenever the underlying data changes.
    pub fn revision(&self) -> u64 {
        self.repo.revision()
    }

    // ========================
    // Trip operations
    // ========================

    pub fn current_trip(&self) -> Option<&Trip> {
        self.repo.current_trip()
    }

    pub fn trips(&self) -> &[Trip] {
        self.repo.list_trips()
    }

    /// Append a trip named `name`. Its id is the trip count + 1.
    pub fn add_trip(&mut self, name: impl Into<String>) -> Trip {
        let trip = Trip::new(next_trip_id(self.repo.list_trips()), name);
        info!(trip_id = trip.id, name = %trip.name, "trip added");
        self.repo.save_trip(trip.clone());
        trip
    }

    /// Make `trip_id` the current trip. Unknown ids are ignored and the
    /// previous selection stays; the return value tells which happened.
    pub fn select_trip(&mut self, trip_id: TripId) -> bool {
        let selected = self.repo.set_current_trip(trip_id);
        if selected {
            debug!(trip_id, "trip selected");
        } else {
            debug!(trip_id, "trip not found, keeping current selection");
        }
        selected
    }

    // ========================
    // Participant operations
    // ========================

    pub fn participants(&self) -> &[Participant] {
        self.repo.list_participants()
    }

    pub fn add_participant(&mut self, name: &str) -> Result<Participant, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidName("name cannot be empty".to_string()));
        }

        let participant = Participant::new(next_participant_id(self.repo.list_participants()), name);
        info!(participant_id = participant.id, name, "participant added");
        self.repo.save_participant(participant.clone());
        Ok(participant)
    }

    /// Remove a participant who has not paid for anything.
    pub fn remove_participant(&mut self, id: ParticipantId) -> Result<Participant, AppError> {
        let expense_count = self.repo.count_expenses_for_payer(id);
        if expense_count > 0 {
            return Err(AppError::ParticipantHasExpenses {
                participant_id: id,
                expense_count,
            });
        }

        let removed = self
            .repo
            .delete_participant(id)
            .ok_or(AppError::ParticipantNotFound(id))?;
        info!(participant_id = id, "participant removed");
        Ok(removed)
    }

    // ========================
    // Expense operations
    // ========================

    pub fn expenses(&self) -> &[Expense] {
        self.repo.list_expenses()
    }

    /// Record an expense. The payer must be a known participant.
    pub fn add_expense(
        &mut self,
        description: &str,
        amount_cents: Cents,
        payer_id: ParticipantId,
    ) -> Result<Expense, AppError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::InvalidName(
                "description cannot be empty".to_string(),
            ));
        }
        if amount_cents < 0 {
            return Err(AppError::InvalidAmount(amount_cents));
        }
        if self.repo.get_participant(payer_id).is_none() {
            return Err(AppError::ParticipantNotFound(payer_id));
        }

        let expense = Expense::new(
            next_expense_id(self.repo.list_expenses()),
            description,
            amount_cents,
            payer_id,
        );
        info!(
            expense_id = expense.id,
            amount_cents, payer_id, "expense added"
        );
        self.repo.save_expense(expense.clone());
        Ok(expense)
    }

    pub fn remove_expense(&mut self, id: ExpenseId) -> Result<Expense, AppError> {
        let removed = self
            .repo
            .delete_expense(id)
            .ok_or(AppError::ExpenseNotFound(id))?;
        info!(expense_id = id, "expense removed");
        Ok(removed)
    }

    // ========================
    // Queries
    // ========================

    /// Amount paid by every participant, in participant order, over all
    /// expenses regardless of the current trip.
    pub fn payments_by_participant(&self) -> Vec<(Participant, Cents)> {
        let expenses = self.repo.list_expenses();
        self.repo
            .list_participants()
            .iter()
            .map(|p| (p.clone(), paid_by(p.id, expenses)))
            .collect()
    }

    /// Sum of all expense amounts.
    pub fn total_amount(&self) -> Cents {
        total_amount(self.repo.list_expenses())
    }

    /// Payments with each participant's percentage of the total.
    pub fn payments_report(&self) -> PaymentsReport {
        let total = self.total_amount();
        let payments = self
            .payments_by_participant()
            .into_iter()
            .map(|(participant, paid)| PaymentSummary {
                participant_id: participant.id,
                name: participant.name,
                paid,
                percentage: if total > 0 {
                    paid as f64 / total as f64 * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        PaymentsReport { payments, total }
    }

    /// Net balance per participant id, orphan payers included.
    pub fn balances(&self) -> HashMap<ParticipantId, Cents> {
        compute_all_balances(self.repo.list_participants(), self.repo.list_expenses())
    }

    pub fn balance_report(&self) -> BalanceReport {
        let balances = self.balances();
        let residue: Cents = balances.values().sum();
        let balances = self
            .payments_by_participant()
            .into_iter()
            .map(|(participant, paid)| {
                let balance = balances.get(&participant.id).copied().unwrap_or(0);
                ParticipantBalance {
                    participant_id: participant.id,
                    name: participant.name,
                    paid,
                    owed_share: paid - balance,
                    balance,
                }
            })
            .collect();

        BalanceReport { balances, residue }
    }

    /// Settlement summary from the point of view of `user_id`
    /// (participant 1 when omitted).
    pub fn debt_summary(&self, user_id: Option<ParticipantId>) -> DebtSummary {
        let user_id = user_id.unwrap_or(DEFAULT_USER_ID);
        let summary = summarize_debts(
            self.repo.list_participants(),
            self.repo.list_expenses(),
            user_id,
        );
        debug!(user_id, tone = ?summary.tone(), "debt summary computed");
        summary
    }

    pub fn integrity_stats(&self) -> IntegrityStats {
        self.repo.integrity_stats()
    }
}
