use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::core::errors::{ErrorKind, FieldError, LedgerError};
use crate::core::models::{ActivityId, ParticipantId, TransactionDraft, TransactionView};
use crate::core::scope::Scope;

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct CreateActivityRequest {
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, example = "2024-06-01")]
    pub start_date: Option<chrono::NaiveDate>,
    #[schema(value_type = Option<String>, example = "2024-06-14")]
    pub end_date: Option<chrono::NaiveDate>,
    pub created_by_id: ParticipantId,
}

#[derive(Deserialize, ToSchema)]
pub struct ActorRequest {
    pub actor_id: ParticipantId,
}

#[derive(Deserialize, ToSchema)]
pub struct TransactionRequest {
    #[serde(flatten)]
    pub transaction: TransactionDraft,
    pub actor_id: ParticipantId,
}

#[derive(Deserialize, ToSchema)]
pub struct BulkUpdateRequest {
    #[serde(flatten)]
    pub update: crate::core::models::BulkTransactionUpdate,
    pub actor_id: ParticipantId,
}

#[derive(Deserialize, ToSchema)]
pub struct CommitSettlementRequest {
    pub activity_id: Option<ActivityId>,
    pub description: Option<String>,
    pub actor_id: ParticipantId,
}

#[derive(Serialize, ToSchema)]
pub struct BulkUpdateResponse {
    pub updated: usize,
}

#[derive(Serialize, ToSchema)]
pub struct UndoSettlementResponse {
    pub restored_count: usize,
}

// Query strings
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScopeQuery {
    /// Activity to scope to; omitted means the global pool.
    pub activity_id: Option<ActivityId>,
}

impl ScopeQuery {
    pub fn scope(&self) -> Scope {
        Scope::from_activity(self.activity_id)
    }
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TransactionListQuery {
    pub activity_id: Option<ActivityId>,
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub view: TransactionView,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActivityListQuery {
    #[serde(default)]
    pub include_archived: bool,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActorQuery {
    pub actor_id: ParticipantId,
}

// Error response struct
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub field: Option<FieldError>,
}

// Newtype wrapper for LedgerError to implement IntoResponse
pub struct ApiError(pub LedgerError);

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = match self.0.kind() {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "validation_error"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "conflict"),
            ErrorKind::Consistency => (StatusCode::INTERNAL_SERVER_ERROR, "consistency_error"),
            ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }
        let field = match &self.0 {
            LedgerError::InvalidInput(_, detail) => Some(detail.clone()),
            _ => None,
        };
        let body = ErrorResponse {
            error: self.0.to_string(),
            code: code.to_string(),
            field,
        };
        (status, Json(body)).into_response()
    }
}
