use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

macro_rules! ledger_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                $name(value)
            }
        }
    };
}

ledger_id!(
    /// Store-assigned participant id. Ordering is used to break ties in the settlement plan.
    ParticipantId
);
ledger_id!(TransactionId);
ledger_id!(SessionId);
ledger_id!(ActivityId);
