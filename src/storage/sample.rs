use crate::domain::{Expense, Participant, Trip};

/// Built-in trips used when no snapshot is supplied.
pub fn sample_trips() -> Vec<Trip> {
    vec![Trip::new(1, "Dead Sea trip"), Trip::new(2, "Northern trip")]
}

pub fn sample_participants() -> Vec<Participant> {
    vec![
        Participant::new(1, "Alice"),
        Participant::new(2, "Bob"),
        Participant::new(3, "Charlie"),
        Participant::new(4, "Dani"),
    ]
}

pub fn sample_expenses() -> Vec<Expense> {
    vec![
        Expense::new(1, "Fuel", 100000, 1),
        Expense::new(2, "Food", 80000, 2),
        Expense::new(3, "Lodging", 60000, 3),
        Expense::new(4, "Snacks", 20000, 4),
    ]
}
