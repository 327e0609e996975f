use akhra_domain::{DateRangeError, RecordId, StatusTransitionError, UserId};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Journal entry has no transaction lines")]
    EmptyEntry,
    #[error("Journal entry is unbalanced: debits {debits} != credits {credits}")]
    Unbalanced { debits: Decimal, credits: Decimal },
    #[error("Invalid transaction line {index}: {reason}")]
    InvalidLine { index: usize, reason: String },
    #[error("Invalid {field} amount: {amount}")]
    InvalidAmount { field: &'static str, amount: Decimal },
    #[error("Account not found: {0}")]
    AccountNotFound(RecordId),
    #[error("Journal entry not found: {0}")]
    JournalEntryNotFound(RecordId),
    #[error("User not found: {0}")]
    UserNotFound(UserId),
    #[error("Member not found: {0}")]
    MemberNotFound(RecordId),
    #[error("Event not found: {0}")]
    EventNotFound(RecordId),
    #[error("Fee not found: {0}")]
    FeeNotFound(RecordId),
    #[error("Books not loaded")]
    BooksNotLoaded,
    #[error("Books not found: {0}")]
    BooksNotFound(String),
    #[error(transparent)]
    InvalidTransition(#[from] StatusTransitionError),
    #[error(transparent)]
    DateRange(#[from] DateRangeError),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
