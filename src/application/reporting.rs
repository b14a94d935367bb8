use serde::{Deserialize, Serialize};

use crate::domain::{Cents, ParticipantId};

/// Who paid what, with each participant's slice of the total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentsReport {
    pub payments: Vec<PaymentSummary>,
    pub total: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub participant_id: ParticipantId,
    pub name: String,
    pub paid: Cents,
    /// Percentage of the total, 0.0 when nothing was spent
    pub percentage: f64,
}

/// Net position of every participant after equal-split settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceReport {
    pub balances: Vec<ParticipantBalance>,
    /// Sum of all balances; non-zero only by share rounding residue
    pub residue: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantBalance {
    pub participant_id: ParticipantId,
    pub name: String,
    pub paid: Cents,
    /// Sum of this participant's equal shares
    pub owed_share: Cents,
    pub balance: Cents,
}
