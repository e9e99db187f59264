use utoipa::OpenApi;

use crate::{
    api::models::{
        ActorRequest, BulkUpdateRequest, BulkUpdateResponse, CommitSettlementRequest, CreateActivityRequest,
        ErrorResponse, TransactionRequest, UndoSettlementResponse,
    },
    core::{
        models::{
            Activity, AppLog, BulkTransactionUpdate, HistoricalSettlementResult, NewParticipant, Participant,
            SessionState, SettlementRecord, SettlementSession, Split, Transaction, TransactionDraft, TransactionType,
            TransactionView, Transfer,
        },
        services::ParticipantBalance,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::add_participant,
        super::handlers::list_participants,
        super::handlers::get_participant,
        super::handlers::create_activity,
        super::handlers::list_activities,
        super::handlers::get_activity,
        super::handlers::archive_activity,
        super::handlers::unarchive_activity,
        super::handlers::create_transaction,
        super::handlers::list_transactions,
        super::handlers::get_transaction,
        super::handlers::update_transaction,
        super::handlers::soft_delete_transaction,
        super::handlers::restore_transaction,
        super::handlers::permanent_delete_transaction,
        super::handlers::bulk_update_transactions,
        super::handlers::get_balances,
        super::handlers::suggest_settlement,
        super::handlers::commit_settlement,
        super::handlers::settlement_history,
        super::handlers::settlement_trash,
        super::handlers::undo_settlement,
        super::handlers::restore_settlement,
        super::handlers::permanent_delete_settlement,
        super::handlers::get_app_logs
    ),
    components(schemas(
        NewParticipant,
        CreateActivityRequest,
        ActorRequest,
        TransactionRequest,
        BulkUpdateRequest,
        BulkUpdateResponse,
        CommitSettlementRequest,
        UndoSettlementResponse,
        ErrorResponse,
        Participant,
        Activity,
        Split,
        TransactionType,
        TransactionView,
        Transaction,
        TransactionDraft,
        BulkTransactionUpdate,
        Transfer,
        SessionState,
        SettlementSession,
        HistoricalSettlementResult,
        SettlementRecord,
        ParticipantBalance,
        AppLog
    )),
    info(
        title = "Splitledger API",
        description = "API for recording shared expenses, computing balances and settling up",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
