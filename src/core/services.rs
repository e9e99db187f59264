use crate::core::balance::{calculate_balances, has_outstanding_balances};
use crate::core::constants::{
    ACTIVITY_ARCHIVED, ACTIVITY_CREATED, ACTIVITY_UNARCHIVED, MAX_CATEGORY_LENGTH, MAX_DESCRIPTION_LENGTH,
    MAX_NAME_LENGTH, PARTICIPANT_ADDED, SETTLEMENT_COMMITTED, SETTLEMENT_PURGED, SETTLEMENT_RESTORED,
    SETTLEMENT_UNDONE, TRANSACTION_CREATED, TRANSACTION_PURGED, TRANSACTION_RESTORED, TRANSACTION_TRASHED,
    TRANSACTION_UPDATED, TRANSACTIONS_BULK_UPDATED,
};
use crate::core::errors::LedgerError;
use crate::core::models::{
    Activity, ActivityId, AppLog, BulkTransactionUpdate, NewActivity, NewParticipant, Participant, ParticipantId,
    SessionId, SessionState, SettlementRecord, SettlementSession, Split, Transaction, TransactionDraft,
    TransactionId, TransactionView, Transfer, TrashState,
};
use crate::core::money::{has_cent_precision, round_money};
use crate::core::planner::plan_settlement;
use crate::core::scope::{Scope, ScopeLocks, TransactionFilter};
use crate::infrastructure::logging::{LogFilter, LoggingService};
use crate::infrastructure::storage::{SettlementDraft, Storage};
use chrono::{NaiveTime, Utc};
use futures::future::try_join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, error, info, warn};
use utoipa::ToSchema;

const MAX_AMOUNT: Decimal = dec!(1_000_000);

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, PartialEq, Eq)]
pub struct ParticipantBalance {
    pub participant_id: ParticipantId,
    #[schema(value_type = String, example = "-30.00")]
    pub balance: Decimal,
}

pub struct LedgerService<L: LoggingService, S: Storage> {
    storage: S,
    logging: L,
    scope_locks: ScopeLocks,
}

impl<L: LoggingService, S: Storage> LedgerService<L, S> {
    pub fn new(storage: S, logging: L) -> Self {
        info!("Initializing LedgerService");
        LedgerService {
            storage,
            logging,
            scope_locks: ScopeLocks::new(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // VALIDATION

    async fn require_participant(&self, participant_id: ParticipantId) -> Result<Participant, LedgerError> {
        self.storage
            .get_participant(participant_id)
            .await?
            .ok_or(LedgerError::ParticipantNotFound(participant_id))
    }

    async fn require_activity(&self, activity_id: ActivityId) -> Result<Activity, LedgerError> {
        self.storage
            .get_activity(activity_id)
            .await?
            .ok_or(LedgerError::ActivityNotFound(activity_id))
    }

    async fn require_transaction(&self, transaction_id: TransactionId) -> Result<Transaction, LedgerError> {
        self.storage
            .get_transaction(transaction_id)
            .await?
            .ok_or(LedgerError::TransactionNotFound(transaction_id))
    }

    async fn require_session(&self, session_id: SessionId) -> Result<SettlementSession, LedgerError> {
        self.storage
            .get_session(session_id)
            .await?
            .ok_or(LedgerError::SettlementNotFound(session_id))
    }

    async fn require_scope(&self, scope: Scope) -> Result<(), LedgerError> {
        if let Scope::Activity(activity_id) = scope {
            self.require_activity(activity_id).await?;
        }
        Ok(())
    }

    fn validate_string_input(&self, field: &str, value: &str, max_length: usize) -> Result<(), LedgerError> {
        if value.trim().is_empty() {
            return Err(LedgerError::invalid_input(
                field,
                &format!("Invalid {}", field),
                format!("{} cannot be empty", field),
            ));
        }
        if value.chars().count() > max_length {
            return Err(LedgerError::invalid_input(
                field,
                &format!("{} Too Long", field),
                format!("{} cannot exceed {} characters", field, max_length),
            ));
        }
        if value.chars().any(|c| c.is_control() || "<>{}[]".contains(c)) {
            return Err(LedgerError::invalid_input(
                field,
                &format!("Invalid {}", field),
                format!("{} contains invalid characters", field),
            ));
        }
        Ok(())
    }

    fn validate_amount_input(&self, field: &str, amount: Decimal) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_input(field, "Invalid Amount", "Amount must be greater than 0"));
        }
        if amount > MAX_AMOUNT {
            return Err(LedgerError::invalid_input(
                field,
                "Amount Too Large",
                "Amount cannot exceed 1,000,000",
            ));
        }
        if !has_cent_precision(amount) {
            return Err(LedgerError::invalid_input(
                field,
                "Invalid Amount",
                "Amount cannot have more than 2 decimal places",
            ));
        }
        Ok(())
    }

    fn validate_email(&self, email: &str) -> Result<(), LedgerError> {
        let well_formed = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'));
        if !well_formed {
            return Err(LedgerError::invalid_input("email", "Invalid email", format!("{} is not a valid email", email)));
        }
        Ok(())
    }

    async fn validate_splits(&self, splits: &[Split]) -> Result<(), LedgerError> {
        if splits.is_empty() {
            return Err(LedgerError::InvalidSplit("at least one split is required".to_string()));
        }
        let mut seen = HashSet::new();
        for split in splits {
            if split.weight == 0 {
                return Err(LedgerError::InvalidSplit(format!(
                    "weight of participant {} must be positive",
                    split.participant_id
                )));
            }
            if !seen.insert(split.participant_id) {
                return Err(LedgerError::InvalidSplit(format!(
                    "participant {} appears more than once",
                    split.participant_id
                )));
            }
            self.require_participant(split.participant_id).await?;
        }
        Ok(())
    }

    async fn validate_draft(&self, draft: &TransactionDraft) -> Result<(), LedgerError> {
        self.validate_string_input("description", &draft.description, MAX_DESCRIPTION_LENGTH)?;
        self.validate_amount_input("amount", draft.amount)?;
        if let Some(time) = draft.time.as_deref() {
            if NaiveTime::parse_from_str(time, "%H:%M").is_err() {
                return Err(LedgerError::invalid_input("time", "Invalid time", "Time must use the HH:MM format"));
            }
        }
        if let Some(category) = draft.category.as_deref() {
            self.validate_string_input("category", category, MAX_CATEGORY_LENGTH)?;
        }
        self.require_participant(draft.payer_id).await?;
        self.validate_splits(&draft.splits).await?;
        if let Some(activity_id) = draft.activity_id {
            self.require_activity(activity_id).await?;
        }
        Ok(())
    }

    /// Records an audit entry for a mutation that has already been applied.
    /// A failed audit write is logged and does not fail the mutation.
    async fn audit(&self, action: &str, details: serde_json::Value, actor_id: Option<ParticipantId>) {
        if let Err(e) = self.logging.log_action(action, details, actor_id).await {
            error!("Failed to record audit entry {}: {}", action, e);
        }
    }

    // PARTICIPANTS

    pub async fn add_participant(&self, participant: NewParticipant) -> Result<Participant, LedgerError> {
        self.validate_string_input("name", &participant.name, MAX_NAME_LENGTH)?;
        if let Some(email) = participant.email.as_deref() {
            self.validate_email(email)?;
            if self.storage.get_participant_by_email(email).await?.is_some() {
                return Err(LedgerError::DuplicateEmail(email.to_string()));
            }
        }

        let created = self.storage.insert_participant(participant, Utc::now()).await?;
        info!("Added participant {} ({})", created.id, created.name);
        self.audit(
            PARTICIPANT_ADDED,
            json!({ "participant_id": created.id, "name": created.name }),
            None,
        )
        .await;
        Ok(created)
    }

    pub async fn get_participant(&self, participant_id: ParticipantId) -> Result<Participant, LedgerError> {
        self.require_participant(participant_id).await
    }

    pub async fn list_participants(&self) -> Result<Vec<Participant>, LedgerError> {
        self.storage.list_participants().await
    }

    // ACTIVITIES

    pub async fn create_activity(&self, activity: NewActivity, actor: ParticipantId) -> Result<Activity, LedgerError> {
        self.require_participant(actor).await?;
        self.validate_string_input("name", &activity.name, MAX_NAME_LENGTH)?;
        if let Some(description) = activity.description.as_deref() {
            self.validate_string_input("description", description, MAX_DESCRIPTION_LENGTH)?;
        }
        if let (Some(start), Some(end)) = (activity.start_date, activity.end_date) {
            if end < start {
                return Err(LedgerError::invalid_input(
                    "end_date",
                    "Invalid date range",
                    "End date cannot be before start date",
                ));
            }
        }

        let created = self.storage.insert_activity(activity, Utc::now()).await?;
        info!("Created activity {} ({})", created.id, created.name);
        self.audit(
            ACTIVITY_CREATED,
            json!({ "activity_id": created.id, "name": created.name }),
            Some(actor),
        )
        .await;
        Ok(created)
    }

    pub async fn get_activity(&self, activity_id: ActivityId) -> Result<Activity, LedgerError> {
        self.require_activity(activity_id).await
    }

    pub async fn list_activities(&self, include_archived: bool) -> Result<Vec<Activity>, LedgerError> {
        let activities = self.storage.list_activities().await?;
        Ok(activities
            .into_iter()
            .filter(|a| include_archived || a.is_active)
            .collect())
    }

    pub async fn archive_activity(&self, activity_id: ActivityId, actor: ParticipantId) -> Result<Activity, LedgerError> {
        self.require_participant(actor).await?;
        let mut activity = self.require_activity(activity_id).await?;
        if !activity.is_active {
            return Ok(activity);
        }
        activity.is_active = false;
        activity.archived_at = Some(Utc::now());
        self.storage.save_activity(activity.clone()).await?;

        self.audit(ACTIVITY_ARCHIVED, json!({ "activity_id": activity_id }), Some(actor))
            .await;
        Ok(activity)
    }

    pub async fn unarchive_activity(
        &self,
        activity_id: ActivityId,
        actor: ParticipantId,
    ) -> Result<Activity, LedgerError> {
        self.require_participant(actor).await?;
        let mut activity = self.require_activity(activity_id).await?;
        if activity.is_active {
            return Ok(activity);
        }
        activity.is_active = true;
        activity.archived_at = None;
        self.storage.save_activity(activity.clone()).await?;

        self.audit(ACTIVITY_UNARCHIVED, json!({ "activity_id": activity_id }), Some(actor))
            .await;
        Ok(activity)
    }

    // TRANSACTIONS

    pub async fn create_transaction(
        &self,
        draft: TransactionDraft,
        actor: ParticipantId,
    ) -> Result<Transaction, LedgerError> {
        self.require_participant(actor).await?;
        self.validate_draft(&draft).await?;
        let draft = TransactionDraft {
            amount: round_money(draft.amount),
            ..draft
        };

        let _guard = self.scope_locks.acquire(Scope::from_activity(draft.activity_id)).await;
        let created = self.storage.insert_transaction(draft, Utc::now()).await?;
        info!(
            "Created {} transaction {} for {} paid by {}",
            created.kind, created.id, created.amount, created.payer_id
        );

        self.audit(
            TRANSACTION_CREATED,
            json!({
                "transaction_id": created.id,
                "amount": created.amount,
                "type": created.kind,
                "payer_id": created.payer_id,
                "activity_id": created.activity_id
            }),
            Some(actor),
        )
        .await;
        Ok(created)
    }

    pub async fn get_transaction(&self, transaction_id: TransactionId) -> Result<Transaction, LedgerError> {
        self.require_transaction(transaction_id).await
    }

    pub async fn list_transactions(&self, scope: Scope, view: TransactionView) -> Result<Vec<Transaction>, LedgerError> {
        self.require_scope(scope).await?;
        self.storage
            .query_transactions(TransactionFilter::listing(scope, view))
            .await
    }

    /// Replaces the editable fields of an unsettled, non-trashed transaction.
    pub async fn update_transaction(
        &self,
        transaction_id: TransactionId,
        draft: TransactionDraft,
        actor: ParticipantId,
    ) -> Result<Transaction, LedgerError> {
        self.require_participant(actor).await?;
        let current = self.require_transaction(transaction_id).await?;
        self.validate_draft(&draft).await?;

        let scopes = [
            Scope::from_activity(current.activity_id),
            Scope::from_activity(draft.activity_id),
        ];
        let _guards = self.scope_locks.acquire_all(&scopes).await;

        let current = self.require_transaction(transaction_id).await?;
        if current.is_settled() {
            warn!("Refusing to edit settled transaction {}", transaction_id);
            return Err(LedgerError::TransactionSettled(transaction_id));
        }
        if current.trash.is_trashed() {
            return Err(LedgerError::TransactionTrashed(transaction_id));
        }

        let updated = Transaction {
            date: draft.date,
            time: draft.time,
            description: draft.description,
            amount: round_money(draft.amount),
            kind: draft.kind,
            payer_id: draft.payer_id,
            splits: draft.splits,
            category: draft.category,
            activity_id: draft.activity_id,
            updated_at: Utc::now(),
            ..current
        };
        let saved = self.storage.save_transaction(updated).await?;
        debug!("Transaction {} now at revision {}", saved.id, saved.revision);

        self.audit(
            TRANSACTION_UPDATED,
            json!({ "transaction_id": saved.id, "amount": saved.amount, "activity_id": saved.activity_id }),
            Some(actor),
        )
        .await;
        Ok(saved)
    }

    /// Applies the same activity tag and/or splits to many transactions.
    ///
    /// Missing, settled and trashed transactions are skipped. Returns how many
    /// transactions were changed.
    pub async fn bulk_update_transactions(
        &self,
        update: BulkTransactionUpdate,
        actor: ParticipantId,
    ) -> Result<usize, LedgerError> {
        self.require_participant(actor).await?;
        let target_activity = update.target_activity();
        if target_activity.is_none() && update.splits.is_none() {
            return Err(LedgerError::invalid_input(
                "transaction_ids",
                "Nothing to update",
                "Provide an activity or splits to apply",
            ));
        }
        if let Some(Some(activity_id)) = target_activity {
            self.require_activity(activity_id).await?;
        }
        if let Some(splits) = update.splits.as_deref() {
            self.validate_splits(splits).await?;
        }

        let mut scopes = Vec::new();
        if let Some(activity_id) = target_activity {
            scopes.push(Scope::from_activity(activity_id));
        }
        for transaction_id in &update.transaction_ids {
            if let Some(tx) = self.storage.get_transaction(*transaction_id).await? {
                scopes.push(Scope::from_activity(tx.activity_id));
            }
        }
        let _guards = self.scope_locks.acquire_all(&scopes).await;

        let mut updated = 0;
        for transaction_id in &update.transaction_ids {
            let Some(mut tx) = self.storage.get_transaction(*transaction_id).await? else {
                debug!("Bulk update skips missing transaction {}", transaction_id);
                continue;
            };
            if tx.is_settled() || tx.trash.is_trashed() {
                debug!("Bulk update skips locked or trashed transaction {}", transaction_id);
                continue;
            }
            if let Some(activity_id) = target_activity {
                tx.activity_id = activity_id;
            }
            if let Some(splits) = &update.splits {
                tx.splits = splits.clone();
            }
            tx.updated_at = Utc::now();
            self.storage.save_transaction(tx).await?;
            updated += 1;
        }

        info!("Bulk updated {} of {} transactions", updated, update.transaction_ids.len());
        self.audit(
            TRANSACTIONS_BULK_UPDATED,
            json!({ "transaction_ids": update.transaction_ids, "updated": updated }),
            Some(actor),
        )
        .await;
        Ok(updated)
    }

    /// Moves a transaction to the trash. Trashing twice is a no-op.
    pub async fn soft_delete_transaction(
        &self,
        transaction_id: TransactionId,
        actor: ParticipantId,
    ) -> Result<Transaction, LedgerError> {
        self.require_participant(actor).await?;
        let current = self.require_transaction(transaction_id).await?;
        let _guard = self.scope_locks.acquire(Scope::from_activity(current.activity_id)).await;

        let current = self.require_transaction(transaction_id).await?;
        if current.is_settled() {
            warn!("Refusing to trash settled transaction {}", transaction_id);
            return Err(LedgerError::TransactionSettled(transaction_id));
        }
        if current.trash.is_trashed() {
            return Ok(current);
        }

        let now = Utc::now();
        let saved = self
            .storage
            .save_transaction(Transaction {
                trash: TrashState::Trashed { at: now },
                updated_at: now,
                ..current
            })
            .await?;
        info!("Transaction {} moved to trash", transaction_id);

        self.audit(TRANSACTION_TRASHED, json!({ "transaction_id": transaction_id }), Some(actor))
            .await;
        Ok(saved)
    }

    pub async fn restore_transaction(
        &self,
        transaction_id: TransactionId,
        actor: ParticipantId,
    ) -> Result<Transaction, LedgerError> {
        self.require_participant(actor).await?;
        let current = self.require_transaction(transaction_id).await?;
        let _guard = self.scope_locks.acquire(Scope::from_activity(current.activity_id)).await;

        let current = self.require_transaction(transaction_id).await?;
        if !current.trash.is_trashed() {
            return Err(LedgerError::TransactionNotTrashed(transaction_id));
        }

        let saved = self
            .storage
            .save_transaction(Transaction {
                trash: TrashState::Active,
                updated_at: Utc::now(),
                ..current
            })
            .await?;
        info!("Transaction {} restored from trash", transaction_id);

        self.audit(TRANSACTION_RESTORED, json!({ "transaction_id": transaction_id }), Some(actor))
            .await;
        Ok(saved)
    }

    /// Removes a trashed transaction for good.
    pub async fn permanent_delete_transaction(
        &self,
        transaction_id: TransactionId,
        actor: ParticipantId,
    ) -> Result<(), LedgerError> {
        self.require_participant(actor).await?;
        let current = self.require_transaction(transaction_id).await?;
        let _guard = self.scope_locks.acquire(Scope::from_activity(current.activity_id)).await;

        self.storage.remove_transaction(transaction_id).await?;
        info!("Transaction {} permanently deleted", transaction_id);

        self.audit(TRANSACTION_PURGED, json!({ "transaction_id": transaction_id }), Some(actor))
            .await;
        Ok(())
    }

    // BALANCES & SETTLEMENT

    async fn scope_balances(
        &self,
        scope: Scope,
    ) -> Result<(Vec<Transaction>, BTreeMap<ParticipantId, Decimal>), LedgerError> {
        let transactions = self
            .storage
            .query_transactions(TransactionFilter::settleable(scope))
            .await?;
        let participants = self.storage.list_participants().await?;
        let refs: Vec<&Transaction> = transactions.iter().collect();
        let balances = calculate_balances(&refs, &participants);
        debug!("Balances for {} over {} transactions: {:?}", scope, transactions.len(), balances);
        Ok((transactions, balances))
    }

    pub async fn get_balances(&self, scope: Scope) -> Result<Vec<ParticipantBalance>, LedgerError> {
        self.require_scope(scope).await?;
        let (_, balances) = self.scope_balances(scope).await?;
        Ok(balances
            .into_iter()
            .map(|(participant_id, balance)| ParticipantBalance {
                participant_id,
                balance,
            })
            .collect())
    }

    /// Whether anyone in the scope is owed or owes more than a cent.
    pub async fn has_outstanding_balances(&self, scope: Scope) -> Result<bool, LedgerError> {
        self.require_scope(scope).await?;
        let (_, balances) = self.scope_balances(scope).await?;
        Ok(has_outstanding_balances(&balances))
    }

    /// Read-only preview of the transfers a commit would record.
    pub async fn suggest_settlement(&self, scope: Scope) -> Result<Vec<Transfer>, LedgerError> {
        self.require_scope(scope).await?;
        let (_, balances) = self.scope_balances(scope).await?;
        plan_settlement(&balances)
    }

    /// Settles the scope: locks every active, unsettled transaction of the
    /// scope into a new session and records the planned transfers.
    pub async fn commit_settlement(
        &self,
        scope: Scope,
        actor: ParticipantId,
        description: Option<String>,
    ) -> Result<SettlementSession, LedgerError> {
        self.require_participant(actor).await?;
        self.require_scope(scope).await?;
        if let Some(description) = description.as_deref() {
            self.validate_string_input("description", description, MAX_DESCRIPTION_LENGTH)?;
        }

        let _guard = self.scope_locks.acquire(scope).await;
        let (transactions, balances) = self.scope_balances(scope).await?;
        let transfers = plan_settlement(&balances).inspect_err(|e| {
            error!("Refusing to commit settlement for {}: {}", scope, e);
        })?;
        if transfers.is_empty() {
            warn!("Nothing to settle for {}", scope);
            return Err(LedgerError::NothingToSettle);
        }

        let draft = SettlementDraft {
            activity_id: scope.activity_id(),
            description,
            created_by: actor,
            created_at: Utc::now(),
            locks: transactions.iter().map(|tx| (tx.id, tx.revision)).collect(),
            transfers: transfers.clone(),
        };
        let session = self.storage.commit_settlement(draft).await?;
        info!(
            "Committed settlement {} for {}: {} transactions, {} transfers",
            session.id,
            scope,
            transactions.len(),
            transfers.len()
        );

        self.audit(
            SETTLEMENT_COMMITTED,
            json!({
                "session_id": session.id,
                "activity_id": session.activity_id,
                "transaction_count": transactions.len(),
                "transfers": transfers
            }),
            Some(actor),
        )
        .await;
        Ok(session)
    }

    /// Releases the session's transactions and moves it to the trash. The
    /// result rows stay as an audit trail. Undoing a trashed session is a no-op.
    pub async fn undo_settlement(&self, session_id: SessionId, actor: ParticipantId) -> Result<usize, LedgerError> {
        self.require_participant(actor).await?;
        let session = self.require_session(session_id).await?;
        let _guard = self.scope_locks.acquire(Scope::from_activity(session.activity_id)).await;

        let session = self.require_session(session_id).await?;
        if session.state.is_trashed() {
            debug!("Settlement {} already in trash", session_id);
            return Ok(0);
        }

        let released = self.storage.release_settlement(session_id, Utc::now()).await?;
        info!("Undid settlement {}, released {} transactions", session_id, released);

        self.audit(
            SETTLEMENT_UNDONE,
            json!({ "session_id": session_id, "restored_count": released }),
            Some(actor),
        )
        .await;
        Ok(released)
    }

    /// Takes a session out of the trash without locking any transactions again.
    pub async fn restore_settlement(&self, session_id: SessionId, actor: ParticipantId) -> Result<(), LedgerError> {
        self.require_participant(actor).await?;
        let session = self.require_session(session_id).await?;
        let _guard = self.scope_locks.acquire(Scope::from_activity(session.activity_id)).await;

        let session = self.require_session(session_id).await?;
        if !session.state.is_trashed() {
            return Err(LedgerError::SettlementNotTrashed(session_id));
        }
        self.storage
            .set_session_state(session_id, SessionState::Restored)
            .await?;
        info!("Restored settlement {} from trash", session_id);

        self.audit(SETTLEMENT_RESTORED, json!({ "session_id": session_id }), Some(actor))
            .await;
        Ok(())
    }

    /// Deletes a trashed session and its result rows.
    pub async fn permanent_delete_settlement(
        &self,
        session_id: SessionId,
        actor: ParticipantId,
    ) -> Result<(), LedgerError> {
        self.require_participant(actor).await?;
        let session = self.require_session(session_id).await?;
        let _guard = self.scope_locks.acquire(Scope::from_activity(session.activity_id)).await;

        self.storage.purge_session(session_id).await?;
        info!("Settlement {} permanently deleted", session_id);

        self.audit(SETTLEMENT_PURGED, json!({ "session_id": session_id }), Some(actor))
            .await;
        Ok(())
    }

    async fn settlement_record(&self, session: SettlementSession) -> Result<SettlementRecord, LedgerError> {
        let (results, transactions) = self.storage.get_session_contents(session.id).await?;
        let total_amount = round_money(results.iter().map(|r| r.amount).sum());
        Ok(SettlementRecord {
            session,
            results,
            total_amount,
            transactions,
        })
    }

    async fn settlement_records<F>(&self, keep: F) -> Result<Vec<SettlementRecord>, LedgerError>
    where
        F: Fn(&SettlementSession) -> bool,
    {
        let mut sessions: Vec<SettlementSession> = self
            .storage
            .list_sessions()
            .await?
            .into_iter()
            .filter(|s| keep(s))
            .collect();
        sessions.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        try_join_all(sessions.into_iter().map(|session| self.settlement_record(session))).await
    }

    /// Active and restored sessions of a scope, newest first.
    pub async fn settlement_history(&self, scope: Scope) -> Result<Vec<SettlementRecord>, LedgerError> {
        self.require_scope(scope).await?;
        self.settlement_records(|s| !s.state.is_trashed() && scope.contains(s.activity_id))
            .await
    }

    /// Trashed sessions across all scopes, newest first.
    pub async fn settlement_trash(&self) -> Result<Vec<SettlementRecord>, LedgerError> {
        self.settlement_records(|s| s.state.is_trashed()).await
    }

    pub async fn get_app_logs(&self, filter: &LogFilter) -> Result<Vec<AppLog>, LedgerError> {
        self.logging.get_logs(filter).await
    }
}
