use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Soft-delete state of a transaction.
///
/// Serialised as the nullable `deleted_at` timestamp clients already know.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<DateTime<Utc>>", into = "Option<DateTime<Utc>>")]
pub enum TrashState {
    #[default]
    Active,
    Trashed { at: DateTime<Utc> },
}

impl TrashState {
    pub fn is_trashed(&self) -> bool {
        matches!(self, TrashState::Trashed { .. })
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self {
            TrashState::Active => None,
            TrashState::Trashed { at } => Some(*at),
        }
    }
}

impl From<Option<DateTime<Utc>>> for TrashState {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        match value {
            Some(at) => TrashState::Trashed { at },
            None => TrashState::Active,
        }
    }
}

impl From<TrashState> for Option<DateTime<Utc>> {
    fn from(value: TrashState) -> Self {
        value.deleted_at()
    }
}
