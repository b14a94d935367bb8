use serde::{Deserialize, Serialize};

pub type TripId = u32;

/// A named grouping of expenses. Selecting a trip does not scope balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub name: String,
}

impl Trip {
    pub fn new(id: TripId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Id assigned to a trip appended to a list of `existing` trips.
/// Ids are count-based, not a true auto-increment.
pub fn next_trip_id(existing: &[Trip]) -> TripId {
    existing.len() as TripId + 1
}
