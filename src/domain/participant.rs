use serde::{Deserialize, Serialize};

pub type ParticipantId = u32;

/// Label used for a participant id that has no matching record.
pub const UNKNOWN_PARTICIPANT: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

impl Participant {
    pub fn new(id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Id for a new participant: one past the highest id in use.
pub fn next_participant_id(existing: &[Participant]) -> ParticipantId {
    existing.iter().map(|p| p.id).max().unwrap_or(0) + 1
}

/// Display name for `id`, falling back to a generic label for orphan ids.
pub fn participant_name(participants: &[Participant], id: ParticipantId) -> &str {
    participants
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.name.as_str())
        .unwrap_or(UNKNOWN_PARTICIPANT)
}
