use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::ParticipantId;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub email: Option<String>,
    /// Members show up in the group overview; guests only take part in splits.
    pub is_group_member: bool,
    /// Whether the participant can sign in. Credentials live outside the ledger.
    pub has_login: bool,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct NewParticipant {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_group_member")]
    pub is_group_member: bool,
    #[serde(default)]
    pub has_login: bool,
}

fn default_group_member() -> bool {
    true
}
