use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{ActivityId, ParticipantId, SessionId, TransactionId};
use super::state::TrashState;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    #[default]
    Expense,
    Income,
    Transfer,
}

impl TransactionType {
    /// Whether the payer is owed money after this transaction.
    pub fn credits_payer(self) -> bool {
        matches!(self, TransactionType::Expense | TransactionType::Transfer)
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TransactionType::Expense => "EXPENSE",
            TransactionType::Income => "INCOME",
            TransactionType::Transfer => "TRANSFER",
        };
        write!(f, "{}", s)
    }
}

/// Relative share of one participant in a transaction.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Split {
    pub participant_id: ParticipantId,
    pub weight: u32,
}

impl Split {
    pub fn new(participant_id: ParticipantId, weight: u32) -> Self {
        Split { participant_id, weight }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Transaction {
    pub id: TransactionId,
    #[schema(value_type = String, example = "2024-06-01")]
    pub date: NaiveDate,
    pub time: Option<String>,
    pub description: String,
    #[schema(value_type = String, example = "90.00")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub payer_id: ParticipantId,
    pub splits: Vec<Split>,
    pub category: Option<String>,
    pub activity_id: Option<ActivityId>,
    pub settlement_session_id: Option<SessionId>,
    #[serde(rename = "deleted_at")]
    #[schema(value_type = Option<String>)]
    pub trash: TrashState,
    /// Bumped on every write; a commit only locks the revision it planned with.
    pub revision: u64,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_settled(&self) -> bool {
        self.settlement_session_id.is_some()
    }

    pub fn total_weight(&self) -> u64 {
        self.splits.iter().map(|s| u64::from(s.weight)).sum()
    }
}

/// Input for a new transaction, also used as the full replacement on update.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TransactionDraft {
    #[schema(value_type = String, example = "2024-06-01")]
    pub date: NaiveDate,
    #[serde(default)]
    pub time: Option<String>,
    pub description: String,
    #[schema(value_type = String, example = "90.00")]
    pub amount: Decimal,
    #[serde(rename = "type", default)]
    pub kind: TransactionType,
    pub payer_id: ParticipantId,
    pub splits: Vec<Split>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub activity_id: Option<ActivityId>,
}

/// Which slice of the log a listing returns.
#[derive(Clone, Copy, Debug, Default, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionView {
    #[default]
    Unsettled,
    Trashed,
}

/// Changes applied to many unsettled transactions at once.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct BulkTransactionUpdate {
    pub transaction_ids: Vec<TransactionId>,
    /// New activity tag. Ignored when `clear_activity` is set.
    #[serde(default)]
    pub activity_id: Option<ActivityId>,
    /// Moves the transactions back into the global pool.
    #[serde(default)]
    pub clear_activity: bool,
    #[serde(default)]
    pub splits: Option<Vec<Split>>,
}

impl BulkTransactionUpdate {
    pub fn target_activity(&self) -> Option<Option<ActivityId>> {
        if self.clear_activity {
            Some(None)
        } else {
            self.activity_id.map(Some)
        }
    }
}
