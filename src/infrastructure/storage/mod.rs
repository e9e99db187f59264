use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::errors::LedgerError;
use crate::core::models::{
    Activity, ActivityId, HistoricalSettlementResult, NewActivity, NewParticipant, Participant, ParticipantId,
    SessionId, SessionState, SettlementSession, Transaction, TransactionDraft, TransactionId, Transfer,
};
use crate::core::scope::TransactionFilter;

/// Everything a commit writes, applied by the store as one unit.
#[derive(Clone, Debug)]
pub struct SettlementDraft {
    pub activity_id: Option<ActivityId>,
    pub description: Option<String>,
    pub created_by: ParticipantId,
    pub created_at: DateTime<Utc>,
    /// Transactions to lock, each with the revision the plan was computed from.
    pub locks: Vec<(TransactionId, u64)>,
    pub transfers: Vec<Transfer>,
}

/// The ledger store.
///
/// Every method is atomic: it either applies all of its writes or returns an
/// error and leaves the store untouched. Reads observe a consistent snapshot.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn insert_participant(
        &self,
        participant: NewParticipant,
        created_at: DateTime<Utc>,
    ) -> Result<Participant, LedgerError>;
    async fn get_participant(&self, participant_id: ParticipantId) -> Result<Option<Participant>, LedgerError>;
    async fn get_participant_by_email(&self, email: &str) -> Result<Option<Participant>, LedgerError>;
    async fn list_participants(&self) -> Result<Vec<Participant>, LedgerError>;

    async fn insert_activity(&self, activity: NewActivity, created_at: DateTime<Utc>) -> Result<Activity, LedgerError>;
    async fn save_activity(&self, activity: Activity) -> Result<(), LedgerError>;
    async fn get_activity(&self, activity_id: ActivityId) -> Result<Option<Activity>, LedgerError>;
    async fn list_activities(&self) -> Result<Vec<Activity>, LedgerError>;

    async fn insert_transaction(
        &self,
        draft: TransactionDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Transaction, LedgerError>;
    /// Overwrites an unsettled transaction. `transaction.revision` must match
    /// the stored revision; the saved copy carries the next revision.
    async fn save_transaction(&self, transaction: Transaction) -> Result<Transaction, LedgerError>;
    async fn get_transaction(&self, transaction_id: TransactionId) -> Result<Option<Transaction>, LedgerError>;
    async fn query_transactions(&self, filter: TransactionFilter) -> Result<Vec<Transaction>, LedgerError>;
    /// Physically removes a trashed, unsettled transaction.
    async fn remove_transaction(&self, transaction_id: TransactionId) -> Result<(), LedgerError>;

    /// Creates the session, locks every listed transaction into it and stores
    /// one result row per transfer.
    async fn commit_settlement(&self, draft: SettlementDraft) -> Result<SettlementSession, LedgerError>;
    /// Unlocks every transaction owned by the session and moves it to the
    /// trash. Returns the number of released transactions.
    async fn release_settlement(&self, session_id: SessionId, deleted_at: DateTime<Utc>) -> Result<usize, LedgerError>;
    async fn set_session_state(
        &self,
        session_id: SessionId,
        state: SessionState,
    ) -> Result<SettlementSession, LedgerError>;
    async fn get_session(&self, session_id: SessionId) -> Result<Option<SettlementSession>, LedgerError>;
    async fn list_sessions(&self) -> Result<Vec<SettlementSession>, LedgerError>;
    async fn get_session_results(&self, session_id: SessionId) -> Result<Vec<HistoricalSettlementResult>, LedgerError>;
    /// Result rows and owned transactions of a session, read from one snapshot.
    async fn get_session_contents(
        &self,
        session_id: SessionId,
    ) -> Result<(Vec<HistoricalSettlementResult>, Vec<Transaction>), LedgerError>;
    /// Removes a trashed session together with its result rows.
    async fn purge_session(&self, session_id: SessionId) -> Result<(), LedgerError>;
}

pub mod in_memory;
