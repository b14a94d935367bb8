use thiserror::Error;

use crate::domain::{Cents, ExpenseId, ParticipantId};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),

    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),

    #[error("Cannot remove participant {participant_id}: they paid {expense_count} expense(s)")]
    ParticipantHasExpenses {
        participant_id: ParticipantId,
        expense_count: usize,
    },

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid amount: {0} cents")]
    InvalidAmount(Cents),
}
