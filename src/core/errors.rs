use serde::Serialize;
use thiserror::Error;

use crate::core::models::{ActivityId, ParticipantId, SessionId, TransactionId};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

impl FieldError {
    pub fn new(field: &str, title: &str, description: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            title: title.to_string(),
            description: description.into(),
        }
    }
}

/// Coarse classification of a [`LedgerError`], used by the API layer to pick
/// a status code and by callers that only care about the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Consistency,
    Internal,
}

#[derive(Error, Debug, Clone, Serialize, PartialEq, Eq)]
pub enum LedgerError {
    /// Generic input validation error with detailed field information
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),

    /// Splits are empty, duplicated or carry a non-positive weight
    #[error("Invalid split: {0}")]
    InvalidSplit(String),

    /// The scope has no outstanding balances
    #[error("Nothing to settle")]
    NothingToSettle,

    #[error("Participant {0} not found")]
    ParticipantNotFound(ParticipantId),

    #[error("Transaction {0} not found")]
    TransactionNotFound(TransactionId),

    #[error("Settlement {0} not found")]
    SettlementNotFound(SessionId),

    #[error("Activity {0} not found")]
    ActivityNotFound(ActivityId),

    /// Email is already used by another participant
    #[error("Email {0} already registered")]
    DuplicateEmail(String),

    /// Transaction is locked by a settlement session
    #[error("Transaction {0} is settled and cannot be modified")]
    TransactionSettled(TransactionId),

    #[error("Transaction {0} is not in the trash")]
    TransactionNotTrashed(TransactionId),

    /// Transaction is trashed and must be restored before it can be edited
    #[error("Transaction {0} is in the trash")]
    TransactionTrashed(TransactionId),

    /// Transaction changed between the balance snapshot and the commit
    #[error("Transaction {0} changed while settling")]
    TransactionChanged(TransactionId),

    #[error("Settlement {0} is not in the trash")]
    SettlementNotTrashed(SessionId),

    /// Internal invariant breach, never caused by user input
    #[error("Ledger consistency violated: {0}")]
    Consistency(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidInput(..)
            | LedgerError::InvalidSplit(_)
            | LedgerError::NothingToSettle => ErrorKind::Validation,
            LedgerError::ParticipantNotFound(_)
            | LedgerError::TransactionNotFound(_)
            | LedgerError::SettlementNotFound(_)
            | LedgerError::ActivityNotFound(_) => ErrorKind::NotFound,
            LedgerError::DuplicateEmail(_)
            | LedgerError::TransactionSettled(_)
            | LedgerError::TransactionNotTrashed(_)
            | LedgerError::TransactionTrashed(_)
            | LedgerError::TransactionChanged(_)
            | LedgerError::SettlementNotTrashed(_) => ErrorKind::Conflict,
            LedgerError::Consistency(_) => ErrorKind::Consistency,
            LedgerError::StorageError(_) | LedgerError::LoggingError(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn invalid_input(field: &str, title: &str, description: impl Into<String>) -> Self {
        LedgerError::InvalidInput(field.to_string(), FieldError::new(field, title, description))
    }
}
