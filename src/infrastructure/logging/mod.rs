pub mod in_memory;

use crate::core::errors::LedgerError;
use crate::core::models::{AppLog, ParticipantId};
use async_trait::async_trait;
use serde::Deserialize;
use utoipa::IntoParams;

/// Narrows the audit trail to one action and/or one actor. Empty matches everything.
#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogFilter {
    /// Audit action name, e.g. `settlement_committed`.
    pub action: Option<String>,
    pub actor_id: Option<ParticipantId>,
}

impl LogFilter {
    pub fn matches(&self, log: &AppLog) -> bool {
        self.action.as_deref().is_none_or(|action| log.action == action)
            && self.actor_id.is_none_or(|actor| log.actor_id == Some(actor))
    }
}

/// Audit trail of ledger mutations, separate from diagnostic `tracing` output.
#[async_trait]
pub trait LoggingService: Send + Sync {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        actor_id: Option<ParticipantId>,
    ) -> Result<(), LedgerError>;

    /// Matching entries, oldest first.
    async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<AppLog>, LedgerError>;
}
