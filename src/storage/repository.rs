use std::collections::HashSet;

use crate::domain::{
    Expense, ExpenseId, Participant, ParticipantId, Trip, TripId,
};

use super::{sample_expenses, sample_participants, sample_trips};

/// Statistics for ledger integrity verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityStats {
    pub trip_count: usize,
    pub participant_count: usize,
    pub expense_count: usize,
    pub duplicate_trip_ids: usize,
    pub duplicate_participant_ids: usize,
    pub invalid_payer_refs: usize,
    pub invalid_amounts: usize,
}

impl IntegrityStats {
    pub fn is_healthy(&self) -> bool {
        self.duplicate_trip_ids == 0
            && self.duplicate_participant_ids == 0
            && self.invalid_payer_refs == 0
            && self.invalid_amounts == 0
    }
}

/// In-memory store for trips, participants and expenses.
///
/// Collections keep insertion order. Every successful mutation bumps the
/// revision so observers can poll for changes instead of being notified.
#[derive(Debug, Clone, Default)]
pub struct Repository {
    trips: Vec<Trip>,
    participants: Vec<Participant>,
    expenses: Vec<Expense>,
    current_trip_id: Option<TripId>,
    revision: u64,
}

impl Repository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository from existing collections.
    /// The current trip is `current_trip_id` if it exists, otherwise the first trip.
    pub fn from_parts(
        trips: Vec<Trip>,
        participants: Vec<Participant>,
        expenses: Vec<Expense>,
        current_trip_id: Option<TripId>,
    ) -> Self {
        let current_trip_id = current_trip_id
            .filter(|id| trips.iter().any(|t| t.id == *id))
            .or_else(|| trips.first().map(|t| t.id));
        Self {
            trips,
            participants,
            expenses,
            current_trip_id,
            revision: 0,
        }
    }

    /// Repository seeded with the built-in sample trip.
    pub fn with_sample_data() -> Self {
        Self::from_parts(sample_trips(), sample_participants(), sample_expenses(), None)
    }

    /// Counter bumped by every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    // ========================
    // Trip operations
    // ========================

    /// Append a trip. The first trip ever stored becomes current.
    pub fn save_trip(&mut self, trip: Trip) {
        if self.current_trip_id.is_none() {
            self.current_trip_id = Some(trip.id);
        }
        self.trips.push(trip);
        self.touch();
    }

    pub fn get_trip(&self, id: TripId) -> Option<&Trip> {
        self.trips.iter().find(|t| t.id == id)
    }

    pub fn list_trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn current_trip(&self) -> Option<&Trip> {
        self.current_trip_id.and_then(|id| self.get_trip(id))
    }

    /// Select the current trip. Returns false, keeping the previous
    /// selection, when no trip has that id.
    pub fn set_current_trip(&mut self, id: TripId) -> bool {
        if self.get_trip(id).is_none() {
            return false;
        }
        if self.current_trip_id != Some(id) {
            self.current_trip_id = Some(id);
            self.touch();
        }
        true
    }

    // ========================
    // Participant operations
    // ========================

    pub fn save_participant(&mut self, participant: Participant) {
        self.participants.push(participant);
        self.touch();
    }

    pub fn get_participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn list_participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Remove a participant. Returns the removed record, if any.
    pub fn delete_participant(&mut self, id: ParticipantId) -> Option<Participant> {
        let index = self.participants.iter().position(|p| p.id == id)?;
        let removed = self.participants.remove(index);
        self.touch();
        Some(removed)
    }

    // ========================
    // Expense operations
    // ========================

    pub fn save_expense(&mut self, expense: Expense) {
        self.expenses.push(expense);
        self.touch();
    }

    pub fn get_expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn list_expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Count expenses paid by a participant.
    pub fn count_expenses_for_payer(&self, payer_id: ParticipantId) -> usize {
        self.expenses.iter().filter(|e| e.payer_id == payer_id).count()
    }

    pub fn delete_expense(&mut self, id: ExpenseId) -> Option<Expense> {
        let index = self.expenses.iter().position(|e| e.id == id)?;
        let removed = self.expenses.remove(index);
        self.touch();
        Some(removed)
    }

    // ========================
    // Integrity
    // ========================

    /// Gather statistics about referential integrity of the stored data.
    pub fn integrity_stats(&self) -> IntegrityStats {
        fn duplicates(ids: impl Iterator<Item = u32>) -> usize {
            let mut seen = HashSet::new();
            ids.filter(|id| !seen.insert(*id)).count()
        }

        let participant_ids: HashSet<ParticipantId> =
            self.participants.iter().map(|p| p.id).collect();

        IntegrityStats {
            trip_count: self.trips.len(),
            participant_count: self.participants.len(),
            expense_count: self.expenses.len(),
            duplicate_trip_ids: duplicates(self.trips.iter().map(|t| t.id)),
            duplicate_participant_ids: duplicates(self.participants.iter().map(|p| p.id)),
            invalid_payer_refs: self
                .expenses
                .iter()
                .filter(|e| !participant_ids.contains(&e.payer_id))
                .count(),
            invalid_amounts: self.expenses.iter().filter(|e| e.amount_cents < 0).count(),
        }
    }
}
