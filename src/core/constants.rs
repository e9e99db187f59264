// Audit log action names.
pub const PARTICIPANT_ADDED: &str = "participant_added";
pub const ACTIVITY_CREATED: &str = "activity_created";
pub const ACTIVITY_ARCHIVED: &str = "activity_archived";
pub const ACTIVITY_UNARCHIVED: &str = "activity_unarchived";
pub const TRANSACTION_CREATED: &str = "transaction_created";
pub const TRANSACTION_UPDATED: &str = "transaction_updated";
pub const TRANSACTIONS_BULK_UPDATED: &str = "transactions_bulk_updated";
pub const TRANSACTION_TRASHED: &str = "transaction_trashed";
pub const TRANSACTION_RESTORED: &str = "transaction_restored";
pub const TRANSACTION_PURGED: &str = "transaction_purged";
pub const SETTLEMENT_COMMITTED: &str = "settlement_committed";
pub const SETTLEMENT_UNDONE: &str = "settlement_undone";
pub const SETTLEMENT_RESTORED: &str = "settlement_restored";
pub const SETTLEMENT_PURGED: &str = "settlement_purged";

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 255;
pub const MAX_CATEGORY_LENGTH: usize = 50;
