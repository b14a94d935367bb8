use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    div_round_half_up, format_cents, participant_name, scale_cents, Cents, Expense, Participant,
    ParticipantId,
};

/// Participant whose point of view the summary takes when none is given.
pub const DEFAULT_USER_ID: ParticipantId = 1;

/// Equal share of `amount` among `participant_count` people, rounded half-up to cents.
pub fn equal_share(amount: Cents, participant_count: usize) -> Cents {
    debug_assert!(participant_count > 0);
    div_round_half_up(amount as i128, participant_count as i128) as Cents
}

/// Compute net balances for every participant from equal-split expenses.
///
/// For each expense the payer is credited `amount - share` and every other
/// participant is debited `share`. Positive means the participant is owed
/// money, negative means they owe. A payer id with no participant record
/// still gets an entry of its own.
pub fn compute_all_balances(
    participants: &[Participant],
    expenses: &[Expense],
) -> HashMap<ParticipantId, Cents> {
    let mut balances: HashMap<ParticipantId, Cents> =
        participants.iter().map(|p| (p.id, 0)).collect();
    if participants.is_empty() {
        return balances;
    }

    for expense in expenses {
        let share = equal_share(expense.amount_cents, participants.len());
        *balances.entry(expense.payer_id).or_insert(0) += expense.amount_cents - share;
        for participant in participants.iter().filter(|p| p.id != expense.payer_id) {
            *balances.entry(participant.id).or_insert(0) -= share;
        }
    }

    balances
}

/// Net balance for a single participant.
pub fn compute_balance(
    participant_id: ParticipantId,
    participants: &[Participant],
    expenses: &[Expense],
) -> Cents {
    compute_all_balances(participants, expenses)
        .get(&participant_id)
        .copied()
        .unwrap_or(0)
}

/// One counterpart in a settlement: who, and how much.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    pub name: String,
    pub amount: Cents,
}

/// How a summary reads from the user's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Others owe the user
    Credit,
    /// The user owes others
    Debit,
    Neutral,
}

/// Settlement summary for a designated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DebtSummary {
    NoParticipants,
    NoExpenses,
    AllSettled,
    /// Debtors and their proportional share of what the user is owed
    OwedToUser { debts: Vec<Debt> },
    /// The user is owed money but every proportional share rounds to zero
    NoSpecificDebtsToUser,
    /// Creditors and the user's proportional debt to each
    UserOwes { debts: Vec<Debt> },
    /// The user owes money but every proportional share rounds to zero
    NoSpecificDebtsFromUser,
    NoDebts { name: String },
    NoCreditors,
}

impl DebtSummary {
    pub fn tone(&self) -> Tone {
        match self {
            DebtSummary::OwedToUser { .. } => Tone::Credit,
            DebtSummary::UserOwes { .. } => Tone::Debit,
            _ => Tone::Neutral,
        }
    }

    /// Render the summary with the given currency suffix.
    pub fn render(&self, currency: &str) -> String {
        fn clauses(debts: &[Debt], clause: impl Fn(&Debt) -> String) -> String {
            debts.iter().map(clause).collect::<Vec<_>>().join(" and ")
        }

        match self {
            DebtSummary::NoParticipants => "No participants in this trip.".to_string(),
            DebtSummary::NoExpenses => {
                "No expenses recorded – everything is settled.".to_string()
            }
            DebtSummary::AllSettled => "All balances are zero – everything is settled.".to_string(),
            DebtSummary::OwedToUser { debts } => clauses(debts, |d| {
                format!("{} owes you {}{}", d.name, format_cents(d.amount), currency)
            }),
            DebtSummary::NoSpecificDebtsToUser => "No specific debts to you.".to_string(),
            DebtSummary::UserOwes { debts } => format!(
                "You owe {}",
                clauses(debts, |d| {
                    format!("{} {}{}", d.name, format_cents(d.amount), currency)
                })
            ),
            DebtSummary::NoSpecificDebtsFromUser => "No specific debts for you to settle.".to_string(),
            DebtSummary::NoDebts { name } => format!("No debts for {}.", name),
            DebtSummary::NoCreditors => {
                "No creditors – cannot calculate specific debts.".to_string()
            }
        }
    }
}

impl fmt::Display for DebtSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render("$"))
    }
}

/// Build the settlement summary for `user_id`.
///
/// A debtor's total debt is distributed across creditors in proportion to
/// each creditor's share of the total positive balance.
pub fn summarize_debts(
    participants: &[Participant],
    expenses: &[Expense],
    user_id: ParticipantId,
) -> DebtSummary {
    if participants.is_empty() {
        return DebtSummary::NoParticipants;
    }
    if expenses.is_empty() {
        return DebtSummary::NoExpenses;
    }

    let balances = compute_all_balances(participants, expenses);
    // A lone participant has nobody to settle with and gets the per-user message
    if participants.len() > 1 && balances.values().all(|&b| b == 0) {
        return DebtSummary::AllSettled;
    }

    let user_name = participant_name(participants, user_id).to_string();
    let user_balance = balances.get(&user_id).copied().unwrap_or(0);
    if user_balance == 0 {
        return DebtSummary::NoDebts { name: user_name };
    }

    let total_positive: Cents = balances.values().filter(|&&b| b > 0).sum();
    if total_positive == 0 {
        return DebtSummary::NoCreditors;
    }

    // Participants in list order, then orphan payer ids in ascending order
    let mut orphans: Vec<ParticipantId> = balances
        .keys()
        .copied()
        .filter(|id| participants.iter().all(|p| p.id != *id))
        .collect();
    orphans.sort_unstable();
    let counterparts: Vec<(ParticipantId, Cents)> = participants
        .iter()
        .map(|p| p.id)
        .chain(orphans)
        .filter(|id| *id != user_id)
        .map(|id| (id, balances.get(&id).copied().unwrap_or(0)))
        .collect();

    let debt = |id: ParticipantId, amount: Cents| Debt {
        name: participant_name(participants, id).to_string(),
        amount,
    };

    if user_balance > 0 {
        let debts: Vec<Debt> = counterparts
            .iter()
            .filter(|(_, balance)| *balance < 0)
            .map(|&(id, balance)| debt(id, scale_cents(-balance, user_balance, total_positive)))
            .filter(|d| d.amount > 0)
            .collect();

        if debts.is_empty() {
            DebtSummary::NoSpecificDebtsToUser
        } else {
            DebtSummary::OwedToUser { debts }
        }
    } else {
        let debts: Vec<Debt> = counterparts
            .iter()
            .filter(|(_, balance)| *balance > 0)
            .map(|&(id, balance)| debt(id, scale_cents(-user_balance, balance, total_positive)))
            .filter(|d| d.amount > 0)
            .collect();

        if debts.is_empty() {
            DebtSummary::NoSpecificDebtsFromUser
        } else {
            DebtSummary::UserOwes { debts }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trio() -> Vec<Participant> {
        vec![
            Participant::new(1, "Alice"),
            Participant::new(2, "Bob"),
            Participant::new(3, "Carlos"),
        ]
    }

    #[test]
    fn test_equal_share_rounds_half_up() {
        assert_eq!(equal_share(100000, 3), 33333);
        assert_eq!(equal_share(200, 3), 67);
        assert_eq!(equal_share(5, 2), 3);
        assert_eq!(equal_share(0, 4), 0);
    }

    #[test]
    fn test_compute_all_balances_three_way() {
        let expenses = vec![
            Expense::new(1, "Fuel", 100000, 1),
            Expense::new(2, "Food", 80000, 2),
            Expense::new(3, "Lodging", 60000, 3),
        ];

        let balances = compute_all_balances(&trio(), &expenses);

        assert_eq!(balances.get(&1), Some(&20000));
        assert_eq!(balances.get(&2), Some(&0));
        assert_eq!(balances.get(&3), Some(&-20000));
    }

    #[test]
    fn test_balances_sum_to_zero_within_rounding() {
        let participants = trio();
        let expenses = vec![
            Expense::new(1, "Fuel", 100, 1),
            Expense::new(2, "Snacks", 1001, 2),
            Expense::new(3, "Tolls", 7, 3),
        ];

        let balances = compute_all_balances(&participants, &expenses);
        let total: Cents = balances.values().sum();

        assert!(
            total.abs() <= participants.len() as Cents,
            "residue {} exceeds one cent per participant",
            total
        );
    }

    #[test]
    fn test_no_participants() {
        let expenses = vec![Expense::new(1, "Fuel", 100, 1)];
        assert_eq!(
            summarize_debts(&[], &expenses, 1),
            DebtSummary::NoParticipants
        );
    }

    #[test]
    fn test_no_expenses() {
        let summary = summarize_debts(&trio(), &[], 1);
        assert_eq!(summary, DebtSummary::NoExpenses);
        assert_eq!(
            summary.to_string(),
            "No expenses recorded – everything is settled."
        );
    }

    #[test]
    fn test_equal_payments_are_settled() {
        let expenses = vec![
            Expense::new(1, "Fuel", 3000, 1),
            Expense::new(2, "Food", 3000, 2),
            Expense::new(3, "Lodging", 3000, 3),
        ];
        assert_eq!(summarize_debts(&trio(), &expenses, 1), DebtSummary::AllSettled);
    }

    #[test]
    fn test_single_participant_has_no_debts() {
        let participants = vec![Participant::new(1, "Alice")];
        let expenses = vec![Expense::new(1, "Fuel", 12345, 1)];

        assert_eq!(compute_balance(1, &participants, &expenses), 0);
        assert_eq!(
            summarize_debts(&participants, &expenses, 1).to_string(),
            "No debts for Alice."
        );
    }

    #[test]
    fn test_zero_user_balance_names_the_user() {
        let expenses = vec![
            Expense::new(1, "Fuel", 100000, 1),
            Expense::new(2, "Food", 80000, 2),
            Expense::new(3, "Lodging", 60000, 3),
        ];
        let summary = summarize_debts(&trio(), &expenses, 2);
        assert_eq!(summary.to_string(), "No debts for Bob.");
        assert_eq!(summary.tone(), Tone::Neutral);
    }

    #[test]
    fn test_user_owes_single_creditor() {
        // Shares 300.00 and 100.00
        let expenses = vec![
            Expense::new(1, "Fuel", 90000, 1),
            Expense::new(2, "Food", 30000, 2),
        ];
        let balances = compute_all_balances(&trio(), &expenses);
        assert_eq!(balances[&1], 50000);
        assert_eq!(balances[&2], -10000);
        assert_eq!(balances[&3], -40000);

        let summary = summarize_debts(&trio(), &expenses, 3);
        assert_eq!(summary.tone(), Tone::Debit);
        assert_eq!(summary.to_string(), "You owe Alice 400.00$");
    }

    #[test]
    fn test_credit_collected_from_every_debtor() {
        let participants = vec![
            Participant::new(1, "Alice"),
            Participant::new(2, "Bob"),
            Participant::new(3, "Carlos"),
            Participant::new(4, "Dani"),
        ];
        // Shares 75.00 and 25.00: Alice +200, Bob 0, Carlos -100, Dani -100
        let expenses = vec![
            Expense::new(1, "Fuel", 30000, 1),
            Expense::new(2, "Food", 10000, 2),
        ];

        let summary = summarize_debts(&participants, &expenses, 1);
        assert_eq!(
            summary.to_string(),
            "Carlos owes you 100.00$ and Dani owes you 100.00$"
        );
        assert_eq!(summary.tone(), Tone::Credit);

        let summary = summarize_debts(&participants, &expenses, 4);
        assert_eq!(summary.to_string(), "You owe Alice 100.00$");
    }

    #[test]
    fn test_debt_split_in_proportion_to_credit() {
        let participants = vec![
            Participant::new(1, "Alice"),
            Participant::new(2, "Bob"),
            Participant::new(3, "Carlos"),
            Participant::new(4, "Dani"),
        ];
        // Shares 200.00 and 100.00: Alice +500, Bob +100, Carlos -300, Dani -300
        let expenses = vec![
            Expense::new(1, "Fuel", 80000, 1),
            Expense::new(2, "Food", 40000, 2),
        ];

        let summary = summarize_debts(&participants, &expenses, 3);
        assert_eq!(
            summary.to_string(),
            "You owe Alice 250.00$ and Bob 50.00$"
        );

        let summary = summarize_debts(&participants, &expenses, 2);
        assert_eq!(
            summary.to_string(),
            "Carlos owes you 50.00$ and Dani owes you 50.00$"
        );
    }

    #[test]
    fn test_share_rounding_leaves_small_residue() {
        // A 0.01 expense split three ways rounds to a share of 0.00
        // Alice +200, Bob -99, Carlos -100
        let expenses = vec![
            Expense::new(1, "Fuel", 300, 1),
            Expense::new(2, "Gum", 1, 2),
        ];
        let balances = compute_all_balances(&trio(), &expenses);
        assert_eq!(balances[&1], 200);
        assert_eq!(balances[&2], -99);
        assert_eq!(balances[&3], -100);

        let summary = summarize_debts(&trio(), &expenses, 1);
        assert_eq!(
            summary.to_string(),
            "Bob owes you 0.99$ and Carlos owes you 1.00$"
        );
    }

    #[test]
    fn test_orphan_payer_gets_its_own_entry() {
        let expenses = vec![Expense::new(1, "Mystery", 30000, 42)];
        let balances = compute_all_balances(&trio(), &expenses);

        assert_eq!(balances.get(&42), Some(&20000));
        assert_eq!(balances.get(&1), Some(&-10000));

        // The orphan is the only creditor and is listed under the generic label
        let summary = summarize_debts(&trio(), &expenses, 1);
        assert_eq!(summary.to_string(), "You owe Unknown 100.00$");

        let summary = summarize_debts(&trio(), &expenses, 42);
        assert_eq!(summary.tone(), Tone::Credit);
        assert!(summary.to_string().starts_with("Alice owes you 100.00$"));
    }

    #[test]
    fn test_orphan_creditor_share_is_not_dropped() {
        // Balances: Alice -200, Bob +100, Carlos -200, orphan 42 +200
        let expenses = vec![
            Expense::new(1, "Mystery", 30000, 42),
            Expense::new(2, "Food", 30000, 2),
        ];

        let summary = summarize_debts(&trio(), &expenses, 1);
        assert_eq!(
            summary.to_string(),
            "You owe Bob 66.67$ and Unknown 133.33$"
        );
        match summary {
            DebtSummary::UserOwes { debts } => {
                assert_eq!(debts.iter().map(|d| d.amount).sum::<Cents>(), 20000);
            }
            other => panic!("expected UserOwes, got {:?}", other),
        }
    }

    #[test]
    fn test_orphan_creditors_listed_in_id_order() {
        // Shares 100.00 and 200.00: orphan 9 +200, orphan 5 +400, everyone else -300
        let expenses = vec![
            Expense::new(1, "Ferry", 30000, 9),
            Expense::new(2, "Hotel", 60000, 5),
        ];

        let summary = summarize_debts(&trio(), &expenses, 2);
        assert_eq!(
            summary.to_string(),
            "You owe Unknown 200.00$ and Unknown 100.00$"
        );
    }

    #[test]
    fn test_no_creditors_when_only_residue_remains() {
        let participants = vec![Participant::new(1, "Alice"), Participant::new(2, "Bob")];
        // 0.01 split two ways rounds to a 0.01 share: Alice 0, Bob -0.01
        let expenses = vec![Expense::new(1, "Gum", 1, 1)];

        let summary = summarize_debts(&participants, &expenses, 2);
        assert_eq!(summary, DebtSummary::NoCreditors);
        assert_eq!(
            summary.to_string(),
            "No creditors – cannot calculate specific debts."
        );
    }

    #[test]
    fn test_credit_too_small_to_split() {
        let participants: Vec<Participant> = ["Alice", "Bob", "Carlos", "Dani", "Eve"]
            .iter()
            .zip(1..)
            .map(|(name, id)| Participant::new(id, *name))
            .collect();
        // Shares 15.00 and 60.00: Alice +0.01, Bob +225.00, the rest -75.00 each
        let expenses = vec![
            Expense::new(1, "Fuel", 7501, 1),
            Expense::new(2, "Lodging", 30000, 2),
        ];
        let balances = compute_all_balances(&participants, &expenses);
        assert_eq!(balances[&1], 1);
        assert_eq!(balances[&2], 22500);
        assert_eq!(balances[&3], -7500);

        let summary = summarize_debts(&participants, &expenses, 1);
        assert_eq!(summary, DebtSummary::NoSpecificDebtsToUser);
        assert_eq!(summary.to_string(), "No specific debts to you.");
    }

    #[test]
    fn test_render_uses_currency_suffix() {
        let summary = DebtSummary::OwedToUser {
            debts: vec![Debt {
                name: "Carlos".into(),
                amount: 20000,
            }],
        };
        assert_eq!(summary.render("€"), "Carlos owes you 200.00€");
    }
}
