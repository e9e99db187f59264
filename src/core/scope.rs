//! Activity scoping.
//!
//! Every balance query, settlement suggestion, commit and history listing is
//! restricted to one [`Scope`]: either the global pool of untagged
//! transactions or the transactions tagged with one activity. Tagged
//! transactions never show up in the global pool.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::core::models::{ActivityId, SessionId, Transaction, TransactionView};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Global,
    Activity(ActivityId),
}

impl Scope {
    pub fn from_activity(activity_id: Option<ActivityId>) -> Self {
        match activity_id {
            Some(id) => Scope::Activity(id),
            None => Scope::Global,
        }
    }

    pub fn activity_id(&self) -> Option<ActivityId> {
        match self {
            Scope::Global => None,
            Scope::Activity(id) => Some(*id),
        }
    }

    /// Whether a record carrying `activity_id` belongs to this scope.
    pub fn contains(&self, activity_id: Option<ActivityId>) -> bool {
        self.activity_id() == activity_id
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Activity(id) => write!(f, "activity:{}", id),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SettlementFilter {
    #[default]
    Any,
    Unsettled,
    OwnedBy(SessionId),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrashFilter {
    #[default]
    Any,
    Active,
    Trashed,
}

/// Read filter understood by the ledger store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub scope: Option<Scope>,
    pub settlement: SettlementFilter,
    pub trash: TrashFilter,
}

impl TransactionFilter {
    /// Active, unsettled transactions of a scope: the input of balances and settlements.
    pub fn settleable(scope: Scope) -> Self {
        TransactionFilter {
            scope: Some(scope),
            settlement: SettlementFilter::Unsettled,
            trash: TrashFilter::Active,
        }
    }

    pub fn owned_by(session_id: SessionId) -> Self {
        TransactionFilter {
            scope: None,
            settlement: SettlementFilter::OwnedBy(session_id),
            trash: TrashFilter::Any,
        }
    }

    pub fn listing(scope: Scope, view: TransactionView) -> Self {
        match view {
            TransactionView::Unsettled => Self::settleable(scope),
            TransactionView::Trashed => TransactionFilter {
                scope: Some(scope),
                settlement: SettlementFilter::Unsettled,
                trash: TrashFilter::Trashed,
            },
        }
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        let in_scope = self.scope.is_none_or(|scope| scope.contains(tx.activity_id));
        let settlement = match self.settlement {
            SettlementFilter::Any => true,
            SettlementFilter::Unsettled => tx.settlement_session_id.is_none(),
            SettlementFilter::OwnedBy(id) => tx.settlement_session_id == Some(id),
        };
        let trash = match self.trash {
            TrashFilter::Any => true,
            TrashFilter::Active => !tx.trash.is_trashed(),
            TrashFilter::Trashed => tx.trash.is_trashed(),
        };
        in_scope && settlement && trash
    }
}

/// Narrows a transaction pool to what a scope's balances are computed from.
pub fn select_settleable<'a, I>(transactions: I, scope: Scope) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let filter = TransactionFilter::settleable(scope);
    transactions.into_iter().filter(|tx| filter.matches(tx)).collect()
}

/// One async mutex per scope. Mutations of the same scope run one at a time;
/// different scopes proceed in parallel.
#[derive(Default)]
pub struct ScopeLocks {
    locks: Mutex<HashMap<Scope, Arc<Mutex<()>>>>,
}

impl ScopeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, scope: Scope) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(scope).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Locks every distinct scope in `scopes`, always in ascending order so two
    /// callers asking for the same pair cannot deadlock.
    pub async fn acquire_all(&self, scopes: &[Scope]) -> Vec<OwnedMutexGuard<()>> {
        let mut ordered = scopes.to_vec();
        ordered.sort();
        ordered.dedup();
        let mut guards = Vec::with_capacity(ordered.len());
        for scope in ordered {
            guards.push(self.acquire(scope).await);
        }
        guards
    }
}
