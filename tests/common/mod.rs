// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use tripowe::application::LedgerService;
use tripowe::domain::{Expense, Participant, Trip};
use tripowe::storage::Repository;

/// Service over an empty repository
pub fn empty_service() -> LedgerService {
    LedgerService::new(Repository::new())
}

/// Service over the built-in sample trip
pub fn sample_service() -> LedgerService {
    LedgerService::new(Repository::with_sample_data())
}

/// Test fixture: Alice, Bob and Carlos on one trip
pub struct ThreeFriends;

impl ThreeFriends {
    pub fn participants() -> Vec<Participant> {
        vec![
            Participant::new(1, "Alice"),
            Participant::new(2, "Bob"),
            Participant::new(3, "Carlos"),
        ]
    }

    /// Service with participants but no expenses
    pub fn service() -> LedgerService {
        LedgerService::new(Repository::from_parts(
            vec![Trip::new(1, "Dead Sea trip"), Trip::new(2, "Northern trip")],
            Self::participants(),
            vec![],
            None,
        ))
    }

    /// Alice 1000, Bob 800, Carlos 600
    pub fn expenses() -> Vec<Expense> {
        vec![
            Expense::new(1, "Fuel", 100000, 1),
            Expense::new(2, "Food", 80000, 2),
            Expense::new(3, "Lodging", 60000, 3),
        ]
    }

    /// Service with the three standard expenses recorded
    pub fn service_with_expenses() -> LedgerService {
        LedgerService::new(Repository::from_parts(
            vec![Trip::new(1, "Dead Sea trip")],
            Self::participants(),
            Self::expenses(),
            None,
        ))
    }
}
