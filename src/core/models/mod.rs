pub mod activity;
pub mod audit;
pub mod ids;
pub mod participant;
pub mod settlement;
pub mod state;
pub mod transaction;

pub use activity::{Activity, NewActivity};
pub use audit::AppLog;
pub use ids::{ActivityId, ParticipantId, SessionId, TransactionId};
pub use participant::{NewParticipant, Participant};
pub use settlement::{HistoricalSettlementResult, SessionState, SettlementRecord, SettlementSession, Transfer};
pub use state::TrashState;
pub use transaction::{
    BulkTransactionUpdate, Split, Transaction, TransactionDraft, TransactionType, TransactionView,
};
