use serde::{Deserialize, Serialize};

use super::{Cents, ParticipantId};

pub type ExpenseId = u32;

/// A single payment event. The cost is shared equally by all participants,
/// the payer included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    /// Amount in cents (never negative)
    pub amount_cents: Cents,
    pub payer_id: ParticipantId,
}

impl Expense {
    pub fn new(
        id: ExpenseId,
        description: impl Into<String>,
        amount_cents: Cents,
        payer_id: ParticipantId,
    ) -> Self {
        assert!(amount_cents >= 0, "Expense amount must not be negative");
        Self {
            id,
            description: description.into(),
            amount_cents,
            payer_id,
        }
    }
}

/// Id for a new expense: one past the highest id in use.
pub fn next_expense_id(existing: &[Expense]) -> ExpenseId {
    existing.iter().map(|e| e.id).max().unwrap_or(0) + 1
}

/// Sum of all expense amounts.
pub fn total_amount(expenses: &[Expense]) -> Cents {
    expenses.iter().map(|e| e.amount_cents).sum()
}

/// Sum of the amounts paid by a single participant.
pub fn paid_by(payer_id: ParticipantId, expenses: &[Expense]) -> Cents {
    expenses
        .iter()
        .filter(|e| e.payer_id == payer_id)
        .map(|e| e.amount_cents)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let expenses = vec![
            Expense::new(1, "Fuel", 100000, 1),
            Expense::new(2, "Food", 80000, 2),
            Expense::new(3, "Snacks", 2550, 1),
        ];

        assert_eq!(total_amount(&expenses), 182550);
        assert_eq!(total_amount(&[]), 0);
        assert_eq!(paid_by(1, &expenses), 102550);
        assert_eq!(paid_by(3, &expenses), 0);
        assert_eq!(next_expense_id(&expenses), 4);
    }

    #[test]
    fn test_zero_amount_is_allowed() {
        let expense = Expense::new(1, "Free museum", 0, 1);
        assert_eq!(expense.amount_cents, 0);
    }

    #[test]
    #[should_panic(expected = "Expense amount must not be negative")]
    fn test_expense_rejects_negative_amount() {
        Expense::new(1, "Refund", -100, 1);
    }
}
