use crate::core::errors::LedgerError;
use crate::core::models::{
    Activity, ActivityId, HistoricalSettlementResult, NewActivity, NewParticipant, Participant, ParticipantId,
    SessionId, SessionState, SettlementSession, Transaction, TransactionDraft, TransactionId, TrashState,
};
use crate::core::scope::TransactionFilter;
use crate::infrastructure::storage::{SettlementDraft, Storage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Clone, Default)]
struct Tables {
    participants: BTreeMap<ParticipantId, Participant>,
    activities: BTreeMap<ActivityId, Activity>,
    transactions: BTreeMap<TransactionId, Transaction>,
    sessions: BTreeMap<SessionId, SettlementSession>,
    results: BTreeMap<SessionId, Vec<HistoricalSettlementResult>>,
    next_participant_id: u64,
    next_activity_id: u64,
    next_transaction_id: u64,
    next_session_id: u64,
}

impl Tables {
    fn participant_id(&mut self) -> ParticipantId {
        self.next_participant_id += 1;
        ParticipantId(self.next_participant_id)
    }

    fn activity_id(&mut self) -> ActivityId {
        self.next_activity_id += 1;
        ActivityId(self.next_activity_id)
    }

    fn transaction_id(&mut self) -> TransactionId {
        self.next_transaction_id += 1;
        TransactionId(self.next_transaction_id)
    }

    fn session_id(&mut self) -> SessionId {
        self.next_session_id += 1;
        SessionId(self.next_session_id)
    }

    /// Matching transactions ordered by date, time, then id.
    fn select(&self, filter: &TransactionFilter) -> Vec<Transaction> {
        let mut transactions: Vec<Transaction> = self
            .transactions
            .values()
            .filter(|tx| filter.matches(tx))
            .cloned()
            .collect();
        transactions.sort_by(|a, b| (a.date, &a.time, a.id).cmp(&(b.date, &b.time, b.id)));
        transactions
    }
}

/// In-memory ledger store.
///
/// All tables sit behind one lock. Multi-row writes run against a scratch copy
/// of the tables that replaces the live copy only when every step succeeded,
/// so a failure half way through leaves nothing behind.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    tables: Arc<RwLock<Tables>>,
    fail_next_commit: Arc<AtomicBool>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `commit_settlement` fail after its transactions were
    /// stamped but before the result rows are written.
    pub fn inject_commit_failure(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    async fn write_atomically<T, F>(&self, apply: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Tables) -> Result<T, LedgerError> + Send,
    {
        let mut tables = self.tables.write().await;
        let mut scratch = tables.clone();
        let value = apply(&mut scratch)?;
        *tables = scratch;
        Ok(value)
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn insert_participant(
        &self,
        participant: NewParticipant,
        created_at: DateTime<Utc>,
    ) -> Result<Participant, LedgerError> {
        let mut tables = self.tables.write().await;
        if let Some(email) = participant.email.as_deref() {
            if tables.participants.values().any(|p| p.email.as_deref() == Some(email)) {
                return Err(LedgerError::DuplicateEmail(email.to_string()));
            }
        }
        let stored = Participant {
            id: tables.participant_id(),
            name: participant.name,
            email: participant.email,
            is_group_member: participant.is_group_member,
            has_login: participant.has_login,
            created_at,
        };
        tables.participants.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_participant(&self, participant_id: ParticipantId) -> Result<Option<Participant>, LedgerError> {
        let tables = self.tables.read().await;
        Ok(tables.participants.get(&participant_id).cloned())
    }

    async fn get_participant_by_email(&self, email: &str) -> Result<Option<Participant>, LedgerError> {
        let tables = self.tables.read().await;
        Ok(tables
            .participants
            .values()
            .find(|p| p.email.as_deref() == Some(email))
            .cloned())
    }

    async fn list_participants(&self) -> Result<Vec<Participant>, LedgerError> {
        let tables = self.tables.read().await;
        Ok(tables.participants.values().cloned().collect())
    }

    async fn insert_activity(&self, activity: NewActivity, created_at: DateTime<Utc>) -> Result<Activity, LedgerError> {
        let mut tables = self.tables.write().await;
        let stored = Activity {
            id: tables.activity_id(),
            name: activity.name,
            description: activity.description,
            start_date: activity.start_date,
            end_date: activity.end_date,
            is_active: true,
            archived_at: None,
            created_at,
        };
        tables.activities.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn save_activity(&self, activity: Activity) -> Result<(), LedgerError> {
        let mut tables = self.tables.write().await;
        match tables.activities.get_mut(&activity.id) {
            Some(stored) => {
                *stored = activity;
                Ok(())
            }
            None => Err(LedgerError::ActivityNotFound(activity.id)),
        }
    }

    async fn get_activity(&self, activity_id: ActivityId) -> Result<Option<Activity>, LedgerError> {
        let tables = self.tables.read().await;
        Ok(tables.activities.get(&activity_id).cloned())
    }

    async fn list_activities(&self) -> Result<Vec<Activity>, LedgerError> {
        let tables = self.tables.read().await;
        Ok(tables.activities.values().cloned().collect())
    }

    async fn insert_transaction(
        &self,
        draft: TransactionDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Transaction, LedgerError> {
        let mut tables = self.tables.write().await;
        let stored = Transaction {
            id: tables.transaction_id(),
            date: draft.date,
            time: draft.time,
            description: draft.description,
            amount: draft.amount,
            kind: draft.kind,
            payer_id: draft.payer_id,
            splits: draft.splits,
            category: draft.category,
            activity_id: draft.activity_id,
            settlement_session_id: None,
            trash: TrashState::Active,
            revision: 1,
            created_at,
            updated_at: created_at,
        };
        tables.transactions.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn save_transaction(&self, transaction: Transaction) -> Result<Transaction, LedgerError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .transactions
            .get_mut(&transaction.id)
            .ok_or(LedgerError::TransactionNotFound(transaction.id))?;
        if stored.is_settled() {
            return Err(LedgerError::TransactionSettled(transaction.id));
        }
        if stored.revision != transaction.revision {
            warn!(
                "Rejecting write to transaction {}: revision {} is stale (stored {})",
                transaction.id, transaction.revision, stored.revision
            );
            return Err(LedgerError::TransactionChanged(transaction.id));
        }
        *stored = Transaction {
            revision: transaction.revision + 1,
            settlement_session_id: None,
            ..transaction
        };
        Ok(stored.clone())
    }

    async fn get_transaction(&self, transaction_id: TransactionId) -> Result<Option<Transaction>, LedgerError> {
        let tables = self.tables.read().await;
        Ok(tables.transactions.get(&transaction_id).cloned())
    }

    async fn query_transactions(&self, filter: TransactionFilter) -> Result<Vec<Transaction>, LedgerError> {
        let tables = self.tables.read().await;
        Ok(tables.select(&filter))
    }

    async fn remove_transaction(&self, transaction_id: TransactionId) -> Result<(), LedgerError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .transactions
            .get(&transaction_id)
            .ok_or(LedgerError::TransactionNotFound(transaction_id))?;
        if stored.is_settled() {
            return Err(LedgerError::TransactionSettled(transaction_id));
        }
        if !stored.trash.is_trashed() {
            return Err(LedgerError::TransactionNotTrashed(transaction_id));
        }
        tables.transactions.remove(&transaction_id);
        Ok(())
    }

    async fn commit_settlement(&self, draft: SettlementDraft) -> Result<SettlementSession, LedgerError> {
        let fail_after_locking = self.fail_next_commit.swap(false, Ordering::SeqCst);
        self.write_atomically(move |tables| {
            let session = SettlementSession {
                id: tables.session_id(),
                created_at: draft.created_at,
                description: draft.description,
                activity_id: draft.activity_id,
                created_by: draft.created_by,
                state: SessionState::Active,
            };

            for (transaction_id, revision) in &draft.locks {
                let tx = tables
                    .transactions
                    .get_mut(transaction_id)
                    .ok_or(LedgerError::TransactionNotFound(*transaction_id))?;
                if tx.is_settled() || tx.trash.is_trashed() || tx.revision != *revision {
                    return Err(LedgerError::TransactionChanged(*transaction_id));
                }
                tx.settlement_session_id = Some(session.id);
            }

            if fail_after_locking {
                return Err(LedgerError::StorageError(format!(
                    "injected failure while committing session {}",
                    session.id
                )));
            }

            let results = draft
                .transfers
                .iter()
                .map(|t| HistoricalSettlementResult {
                    session_id: session.id,
                    from_id: t.from_id,
                    to_id: t.to_id,
                    amount: t.amount,
                })
                .collect();
            tables.results.insert(session.id, results);
            tables.sessions.insert(session.id, session.clone());
            debug!("Stored session {} locking {} transactions", session.id, draft.locks.len());
            Ok(session)
        })
        .await
    }

    async fn release_settlement(&self, session_id: SessionId, deleted_at: DateTime<Utc>) -> Result<usize, LedgerError> {
        self.write_atomically(move |tables| {
            let session = tables
                .sessions
                .get_mut(&session_id)
                .ok_or(LedgerError::SettlementNotFound(session_id))?;
            session.state = SessionState::Trashed { deleted_at };

            let mut released = 0;
            for tx in tables
                .transactions
                .values_mut()
                .filter(|tx| tx.settlement_session_id == Some(session_id))
            {
                tx.settlement_session_id = None;
                tx.revision += 1;
                tx.updated_at = deleted_at;
                released += 1;
            }
            Ok(released)
        })
        .await
    }

    async fn set_session_state(
        &self,
        session_id: SessionId,
        state: SessionState,
    ) -> Result<SettlementSession, LedgerError> {
        let mut tables = self.tables.write().await;
        let session = tables
            .sessions
            .get_mut(&session_id)
            .ok_or(LedgerError::SettlementNotFound(session_id))?;
        session.state = state;
        Ok(session.clone())
    }

    async fn get_session(&self, session_id: SessionId) -> Result<Option<SettlementSession>, LedgerError> {
        let tables = self.tables.read().await;
        Ok(tables.sessions.get(&session_id).cloned())
    }

    async fn list_sessions(&self) -> Result<Vec<SettlementSession>, LedgerError> {
        let tables = self.tables.read().await;
        Ok(tables.sessions.values().cloned().collect())
    }

    async fn get_session_results(&self, session_id: SessionId) -> Result<Vec<HistoricalSettlementResult>, LedgerError> {
        let tables = self.tables.read().await;
        Ok(tables.results.get(&session_id).cloned().unwrap_or_default())
    }

    async fn get_session_contents(
        &self,
        session_id: SessionId,
    ) -> Result<(Vec<HistoricalSettlementResult>, Vec<Transaction>), LedgerError> {
        let tables = self.tables.read().await;
        let results = tables.results.get(&session_id).cloned().unwrap_or_default();
        let transactions = tables.select(&TransactionFilter::owned_by(session_id));
        Ok((results, transactions))
    }

    async fn purge_session(&self, session_id: SessionId) -> Result<(), LedgerError> {
        self.write_atomically(move |tables| {
            let session = tables
                .sessions
                .remove(&session_id)
                .ok_or(LedgerError::SettlementNotFound(session_id))?;
            if !session.state.is_trashed() {
                return Err(LedgerError::SettlementNotTrashed(session_id));
            }
            tables.results.remove(&session_id);
            Ok(())
        })
        .await
    }
}
