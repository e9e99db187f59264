use crate::{
    api::models::*,
    core::{
        models::{
            Activity, ActivityId, AppLog, NewActivity, NewParticipant, Participant, ParticipantId, SessionId,
            SettlementRecord, SettlementSession, Transaction, TransactionId, Transfer,
        },
        scope::Scope,
        services::{LedgerService, ParticipantBalance},
    },
    infrastructure::{
        logging::{LogFilter, in_memory::InMemoryLogging},
        storage::in_memory::InMemoryStorage,
    },
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use std::sync::Arc;

pub type AppService = LedgerService<InMemoryLogging, InMemoryStorage>;

// Define API routes
pub fn api_routes(service: Arc<AppService>) -> Router {
    Router::new()
        .route("/participants", get(list_participants).post(add_participant))
        .route("/participants/{participant_id}", get(get_participant))
        .route("/activities", get(list_activities).post(create_activity))
        .route("/activities/{activity_id}", get(get_activity))
        .route("/activities/{activity_id}/archive", post(archive_activity))
        .route("/activities/{activity_id}/unarchive", post(unarchive_activity))
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/transactions/bulk", post(bulk_update_transactions))
        .route(
            "/transactions/{transaction_id}",
            get(get_transaction).put(update_transaction).delete(soft_delete_transaction),
        )
        .route("/transactions/{transaction_id}/restore", post(restore_transaction))
        .route(
            "/transactions/{transaction_id}/permanent",
            delete(permanent_delete_transaction),
        )
        .route("/balances", get(get_balances))
        .route("/settlements/suggest", get(suggest_settlement))
        .route("/settlements/commit", post(commit_settlement))
        .route("/settlements/history", get(settlement_history))
        .route("/settlements/trash", get(settlement_trash))
        .route("/settlements/{session_id}/undo", post(undo_settlement))
        .route("/settlements/{session_id}/restore", post(restore_settlement))
        .route("/settlements/{session_id}/permanent", delete(permanent_delete_settlement))
        .route("/logs", get(get_app_logs))
        .with_state(service)
}

#[utoipa::path(
    post,
    path = "/api/participants",
    request_body = NewParticipant,
    responses(
        (status = 201, description = "Participant created successfully", body = Participant),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
async fn add_participant(
    State(service): State<Arc<AppService>>,
    Json(req): Json<NewParticipant>,
) -> Result<(StatusCode, Json<Participant>), ApiError> {
    let participant = service.add_participant(req).await?;
    Ok((StatusCode::CREATED, Json(participant)))
}

#[utoipa::path(
    get,
    path = "/api/participants",
    responses(
        (status = 200, description = "All participants", body = Vec<Participant>)
    )
)]
async fn list_participants(State(service): State<Arc<AppService>>) -> Result<Json<Vec<Participant>>, ApiError> {
    Ok(Json(service.list_participants().await?))
}

#[utoipa::path(
    get,
    path = "/api/participants/{participant_id}",
    params(
        ("participant_id" = u64, Path, description = "ID of the participant")
    ),
    responses(
        (status = 200, description = "Participant retrieved successfully", body = Participant),
        (status = 404, description = "Participant not found", body = ErrorResponse)
    )
)]
async fn get_participant(
    State(service): State<Arc<AppService>>,
    Path(participant_id): Path<ParticipantId>,
) -> Result<Json<Participant>, ApiError> {
    Ok(Json(service.get_participant(participant_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/activities",
    request_body = CreateActivityRequest,
    responses(
        (status = 201, description = "Activity created successfully", body = Activity),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Creator not found", body = ErrorResponse)
    )
)]
async fn create_activity(
    State(service): State<Arc<AppService>>,
    Json(req): Json<CreateActivityRequest>,
) -> Result<(StatusCode, Json<Activity>), ApiError> {
    let activity = NewActivity {
        name: req.name,
        description: req.description,
        start_date: req.start_date,
        end_date: req.end_date,
    };
    let created = service.create_activity(activity, req.created_by_id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/activities",
    params(ActivityListQuery),
    responses(
        (status = 200, description = "Activities, archived ones only on request", body = Vec<Activity>)
    )
)]
async fn list_activities(
    State(service): State<Arc<AppService>>,
    Query(query): Query<ActivityListQuery>,
) -> Result<Json<Vec<Activity>>, ApiError> {
    Ok(Json(service.list_activities(query.include_archived).await?))
}

#[utoipa::path(
    get,
    path = "/api/activities/{activity_id}",
    params(
        ("activity_id" = u64, Path, description = "ID of the activity")
    ),
    responses(
        (status = 200, description = "Activity retrieved successfully", body = Activity),
        (status = 404, description = "Activity not found", body = ErrorResponse)
    )
)]
async fn get_activity(
    State(service): State<Arc<AppService>>,
    Path(activity_id): Path<ActivityId>,
) -> Result<Json<Activity>, ApiError> {
    Ok(Json(service.get_activity(activity_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/activities/{activity_id}/archive",
    params(
        ("activity_id" = u64, Path, description = "ID of the activity")
    ),
    request_body = ActorRequest,
    responses(
        (status = 200, description = "Activity archived", body = Activity),
        (status = 404, description = "Activity or actor not found", body = ErrorResponse)
    )
)]
async fn archive_activity(
    State(service): State<Arc<AppService>>,
    Path(activity_id): Path<ActivityId>,
    Json(req): Json<ActorRequest>,
) -> Result<Json<Activity>, ApiError> {
    Ok(Json(service.archive_activity(activity_id, req.actor_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/activities/{activity_id}/unarchive",
    params(
        ("activity_id" = u64, Path, description = "ID of the activity")
    ),
    request_body = ActorRequest,
    responses(
        (status = 200, description = "Activity unarchived", body = Activity),
        (status = 404, description = "Activity or actor not found", body = ErrorResponse)
    )
)]
async fn unarchive_activity(
    State(service): State<Arc<AppService>>,
    Path(activity_id): Path<ActivityId>,
    Json(req): Json<ActorRequest>,
) -> Result<Json<Activity>, ApiError> {
    Ok(Json(service.unarchive_activity(activity_id, req.actor_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = TransactionRequest,
    responses(
        (status = 201, description = "Transaction created successfully", body = Transaction),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Participant or activity not found", body = ErrorResponse)
    )
)]
async fn create_transaction(
    State(service): State<Arc<AppService>>,
    Json(req): Json<TransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let created = service.create_transaction(req.transaction, req.actor_id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/transactions",
    params(TransactionListQuery),
    responses(
        (status = 200, description = "Unsettled or trashed transactions of a scope", body = Vec<Transaction>),
        (status = 404, description = "Activity not found", body = ErrorResponse)
    )
)]
async fn list_transactions(
    State(service): State<Arc<AppService>>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let scope = Scope::from_activity(query.activity_id);
    Ok(Json(service.list_transactions(scope, query.view).await?))
}

#[utoipa::path(
    get,
    path = "/api/transactions/{transaction_id}",
    params(
        ("transaction_id" = u64, Path, description = "ID of the transaction")
    ),
    responses(
        (status = 200, description = "Transaction retrieved successfully", body = Transaction),
        (status = 404, description = "Transaction not found", body = ErrorResponse)
    )
)]
async fn get_transaction(
    State(service): State<Arc<AppService>>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Transaction>, ApiError> {
    Ok(Json(service.get_transaction(transaction_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/transactions/{transaction_id}",
    params(
        ("transaction_id" = u64, Path, description = "ID of the transaction")
    ),
    request_body = TransactionRequest,
    responses(
        (status = 200, description = "Transaction updated", body = Transaction),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 409, description = "Transaction is settled or trashed", body = ErrorResponse)
    )
)]
async fn update_transaction(
    State(service): State<Arc<AppService>>,
    Path(transaction_id): Path<TransactionId>,
    Json(req): Json<TransactionRequest>,
) -> Result<Json<Transaction>, ApiError> {
    let updated = service
        .update_transaction(transaction_id, req.transaction, req.actor_id)
        .await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/transactions/{transaction_id}",
    params(
        ("transaction_id" = u64, Path, description = "ID of the transaction"),
        ActorQuery
    ),
    responses(
        (status = 200, description = "Transaction moved to trash", body = Transaction),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 409, description = "Transaction is settled", body = ErrorResponse)
    )
)]
async fn soft_delete_transaction(
    State(service): State<Arc<AppService>>,
    Path(transaction_id): Path<TransactionId>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<Transaction>, ApiError> {
    Ok(Json(
        service
            .soft_delete_transaction(transaction_id, query.actor_id)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/transactions/{transaction_id}/restore",
    params(
        ("transaction_id" = u64, Path, description = "ID of the transaction")
    ),
    request_body = ActorRequest,
    responses(
        (status = 200, description = "Transaction restored", body = Transaction),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 409, description = "Transaction is not in the trash", body = ErrorResponse)
    )
)]
async fn restore_transaction(
    State(service): State<Arc<AppService>>,
    Path(transaction_id): Path<TransactionId>,
    Json(req): Json<ActorRequest>,
) -> Result<Json<Transaction>, ApiError> {
    Ok(Json(service.restore_transaction(transaction_id, req.actor_id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/transactions/{transaction_id}/permanent",
    params(
        ("transaction_id" = u64, Path, description = "ID of the transaction"),
        ActorQuery
    ),
    responses(
        (status = 204, description = "Transaction deleted"),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 409, description = "Transaction is not in the trash", body = ErrorResponse)
    )
)]
async fn permanent_delete_transaction(
    State(service): State<Arc<AppService>>,
    Path(transaction_id): Path<TransactionId>,
    Query(query): Query<ActorQuery>,
) -> Result<StatusCode, ApiError> {
    service
        .permanent_delete_transaction(transaction_id, query.actor_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/transactions/bulk",
    request_body = BulkUpdateRequest,
    responses(
        (status = 200, description = "Number of transactions changed", body = BulkUpdateResponse),
        (status = 400, description = "Bad request", body = ErrorResponse)
    )
)]
async fn bulk_update_transactions(
    State(service): State<Arc<AppService>>,
    Json(req): Json<BulkUpdateRequest>,
) -> Result<Json<BulkUpdateResponse>, ApiError> {
    let updated = service.bulk_update_transactions(req.update, req.actor_id).await?;
    Ok(Json(BulkUpdateResponse { updated }))
}

#[utoipa::path(
    get,
    path = "/api/balances",
    params(ScopeQuery),
    responses(
        (status = 200, description = "Balance of every participant in the scope", body = Vec<ParticipantBalance>),
        (status = 404, description = "Activity not found", body = ErrorResponse)
    )
)]
async fn get_balances(
    State(service): State<Arc<AppService>>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<Vec<ParticipantBalance>>, ApiError> {
    Ok(Json(service.get_balances(query.scope()).await?))
}

#[utoipa::path(
    get,
    path = "/api/settlements/suggest",
    params(ScopeQuery),
    responses(
        (status = 200, description = "Transfers that would settle the scope", body = Vec<Transfer>),
        (status = 404, description = "Activity not found", body = ErrorResponse),
        (status = 500, description = "Balances are inconsistent", body = ErrorResponse)
    )
)]
async fn suggest_settlement(
    State(service): State<Arc<AppService>>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<Vec<Transfer>>, ApiError> {
    Ok(Json(service.suggest_settlement(query.scope()).await?))
}

#[utoipa::path(
    post,
    path = "/api/settlements/commit",
    request_body = CommitSettlementRequest,
    responses(
        (status = 201, description = "Settlement committed", body = SettlementSession),
        (status = 400, description = "Nothing to settle", body = ErrorResponse),
        (status = 404, description = "Activity or actor not found", body = ErrorResponse),
        (status = 409, description = "A transaction changed while settling", body = ErrorResponse)
    )
)]
async fn commit_settlement(
    State(service): State<Arc<AppService>>,
    Json(req): Json<CommitSettlementRequest>,
) -> Result<(StatusCode, Json<SettlementSession>), ApiError> {
    let session = service
        .commit_settlement(Scope::from_activity(req.activity_id), req.actor_id, req.description)
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    get,
    path = "/api/settlements/history",
    params(ScopeQuery),
    responses(
        (status = 200, description = "Settlements of the scope, newest first", body = Vec<SettlementRecord>),
        (status = 404, description = "Activity not found", body = ErrorResponse)
    )
)]
async fn settlement_history(
    State(service): State<Arc<AppService>>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<Vec<SettlementRecord>>, ApiError> {
    Ok(Json(service.settlement_history(query.scope()).await?))
}

#[utoipa::path(
    get,
    path = "/api/settlements/trash",
    responses(
        (status = 200, description = "Trashed settlements, newest first", body = Vec<SettlementRecord>)
    )
)]
async fn settlement_trash(State(service): State<Arc<AppService>>) -> Result<Json<Vec<SettlementRecord>>, ApiError> {
    Ok(Json(service.settlement_trash().await?))
}

#[utoipa::path(
    post,
    path = "/api/settlements/{session_id}/undo",
    params(
        ("session_id" = u64, Path, description = "ID of the settlement session")
    ),
    request_body = ActorRequest,
    responses(
        (status = 200, description = "Settlement undone", body = UndoSettlementResponse),
        (status = 404, description = "Settlement not found", body = ErrorResponse)
    )
)]
async fn undo_settlement(
    State(service): State<Arc<AppService>>,
    Path(session_id): Path<SessionId>,
    Json(req): Json<ActorRequest>,
) -> Result<Json<UndoSettlementResponse>, ApiError> {
    let restored_count = service.undo_settlement(session_id, req.actor_id).await?;
    Ok(Json(UndoSettlementResponse { restored_count }))
}

#[utoipa::path(
    post,
    path = "/api/settlements/{session_id}/restore",
    params(
        ("session_id" = u64, Path, description = "ID of the settlement session")
    ),
    request_body = ActorRequest,
    responses(
        (status = 200, description = "Settlement restored"),
        (status = 404, description = "Settlement not found", body = ErrorResponse),
        (status = 409, description = "Settlement is not in the trash", body = ErrorResponse)
    )
)]
async fn restore_settlement(
    State(service): State<Arc<AppService>>,
    Path(session_id): Path<SessionId>,
    Json(req): Json<ActorRequest>,
) -> Result<StatusCode, ApiError> {
    service.restore_settlement(session_id, req.actor_id).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    delete,
    path = "/api/settlements/{session_id}/permanent",
    params(
        ("session_id" = u64, Path, description = "ID of the settlement session"),
        ActorQuery
    ),
    responses(
        (status = 204, description = "Settlement deleted"),
        (status = 404, description = "Settlement not found", body = ErrorResponse),
        (status = 409, description = "Settlement is not in the trash", body = ErrorResponse)
    )
)]
async fn permanent_delete_settlement(
    State(service): State<Arc<AppService>>,
    Path(session_id): Path<SessionId>,
    Query(query): Query<ActorQuery>,
) -> Result<StatusCode, ApiError> {
    service
        .permanent_delete_settlement(session_id, query.actor_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/logs",
    params(LogFilter),
    responses(
        (status = 200, description = "Application logs retrieved successfully", body = Vec<AppLog>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn get_app_logs(
    State(service): State<Arc<AppService>>,
    Query(filter): Query<LogFilter>,
) -> Result<Json<Vec<AppLog>>, ApiError> {
    let logs = service.get_app_logs(&filter).await?;
    Ok(Json(logs))
}
