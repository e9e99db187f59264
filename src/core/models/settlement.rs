use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{ActivityId, ParticipantId, SessionId};
use super::transaction::Transaction;

/// One payment from a debtor to a creditor.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Transfer {
    pub from_id: ParticipantId,
    pub to_id: ParticipantId,
    #[schema(value_type = String, example = "30.00")]
    pub amount: Decimal,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// Committed; owns its locked transactions.
    Active,
    /// Soft-deleted; its transactions were released.
    Trashed {
        #[schema(value_type = String)]
        deleted_at: DateTime<Utc>,
    },
    /// Back from the trash but owning no transactions until a fresh commit.
    Restored,
}

impl SessionState {
    pub fn is_trashed(&self) -> bool {
        matches!(self, SessionState::Trashed { .. })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SettlementSession {
    pub id: SessionId,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
    pub description: Option<String>,
    pub activity_id: Option<ActivityId>,
    pub created_by: ParticipantId,
    #[serde(flatten)]
    pub state: SessionState,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct HistoricalSettlementResult {
    pub session_id: SessionId,
    pub from_id: ParticipantId,
    pub to_id: ParticipantId,
    #[schema(value_type = String, example = "30.00")]
    pub amount: Decimal,
}

/// A session together with what it produced, as shown in history and trash listings.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct SettlementRecord {
    pub session: SettlementSession,
    pub results: Vec<HistoricalSettlementResult>,
    #[schema(value_type = String, example = "60.00")]
    pub total_amount: Decimal,
    pub transactions: Vec<Transaction>,
}
