mod api_tests;
mod balance_tests;
mod transaction_tests;

use crate::core::models::{
    ActivityId, NewActivity, NewParticipant, Participant, ParticipantId, Split, Transaction, TransactionDraft,
    TransactionType,
};
use crate::core::errors::LedgerError;
use crate::core::models::AppLog;
use crate::core::services::LedgerService;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::logging::{LogFilter, LoggingService};
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

pub type TestService = LedgerService<InMemoryLogging, InMemoryStorage>;

pub fn create_test_service() -> TestService {
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    LedgerService::new(storage, logging)
}

/// Audit sink that rejects every write.
pub struct FailingLogging;

#[async_trait]
impl LoggingService for FailingLogging {
    async fn log_action(
        &self,
        action: &str,
        _details: serde_json::Value,
        _actor_id: Option<ParticipantId>,
    ) -> Result<(), LedgerError> {
        Err(LedgerError::LoggingError(format!("audit sink unavailable for {}", action)))
    }

    async fn get_logs(&self, _filter: &LogFilter) -> Result<Vec<AppLog>, LedgerError> {
        Ok(Vec::new())
    }
}

pub async fn add_participant(service: &TestService, name: &str) -> Participant {
    service
        .add_participant(NewParticipant {
            name: name.to_string(),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            is_group_member: true,
            has_login: false,
        })
        .await
        .unwrap()
}

/// Alice, Bob and Carol, in id order.
pub async fn seed_trio(service: &TestService) -> (ParticipantId, ParticipantId, ParticipantId) {
    let p1 = add_participant(service, "Alice").await.id;
    let p2 = add_participant(service, "Bob").await.id;
    let p3 = add_participant(service, "Carol").await.id;
    (p1, p2, p3)
}

pub async fn create_activity(service: &TestService, name: &str, actor: ParticipantId) -> ActivityId {
    service
        .create_activity(
            NewActivity {
                name: name.to_string(),
                description: None,
                start_date: None,
                end_date: None,
            },
            actor,
        )
        .await
        .unwrap()
        .id
}

pub fn draft(amount: Decimal, payer_id: ParticipantId, beneficiaries: &[ParticipantId]) -> TransactionDraft {
    TransactionDraft {
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        time: None,
        description: "Dinner".to_string(),
        amount,
        kind: TransactionType::Expense,
        payer_id,
        splits: beneficiaries.iter().map(|id| Split::new(*id, 1)).collect(),
        category: None,
        activity_id: None,
    }
}

pub async fn record(service: &TestService, draft: TransactionDraft) -> Transaction {
    let actor = draft.payer_id;
    service.create_transaction(draft, actor).await.unwrap()
}

/// Detached transaction for the pure balance functions.
pub fn sample_transaction(
    id: u64,
    kind: TransactionType,
    amount: Decimal,
    payer_id: ParticipantId,
    splits: Vec<Split>,
) -> Transaction {
    let now = chrono::Utc::now();
    Transaction {
        id: id.into(),
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        time: None,
        description: "Sample".to_string(),
        amount,
        kind,
        payer_id,
        splits,
        category: None,
        activity_id: None,
        settlement_session_id: None,
        trash: Default::default(),
        revision: 1,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_participants(ids: &[u64]) -> Vec<Participant> {
    ids.iter()
        .map(|id| Participant {
            id: (*id).into(),
            name: format!("P{}", id),
            email: None,
            is_group_member: true,
            has_login: false,
            created_at: chrono::Utc::now(),
        })
        .collect()
}
