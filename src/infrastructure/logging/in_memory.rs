use crate::core::errors::LedgerError;
use crate::core::models::{AppLog, ParticipantId};
use crate::infrastructure::logging::{LogFilter, LoggingService};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Append-only audit trail kept in process memory.
#[derive(Clone, Default)]
pub struct InMemoryLogging {
    entries: Arc<RwLock<Vec<AppLog>>>,
}

impl InMemoryLogging {
    pub fn new() -> Self {
        Self::default()
    }
}

fn into_details(action: &str, details: Value) -> Result<Map<String, Value>, LedgerError> {
    match details {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(LedgerError::LoggingError(format!(
            "details of {} must be a JSON object, got {}",
            action, other
        ))),
    }
}

#[async_trait]
impl LoggingService for InMemoryLogging {
    async fn log_action(
        &self,
        action: &str,
        details: Value,
        actor_id: Option<ParticipantId>,
    ) -> Result<(), LedgerError> {
        let entry = AppLog {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            actor_id,
            details: into_details(action, details)?.into_iter().collect(),
            timestamp: Utc::now(),
        };
        debug!("Audit {} by {:?}", entry.action, entry.actor_id);
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<AppLog>, LedgerError> {
        let entries = self.entries.read().await;
        Ok(entries.iter().filter(|log| filter.matches(log)).cloned().collect())
    }
}
