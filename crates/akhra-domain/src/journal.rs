//! Journal entries and their transaction lines.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::{Identifiable, Record, RecordId, UserId};

/// Longest narration a journal entry may carry.
pub const NARRATION_MAX_LEN: usize = 255;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JournalEntry {
    pub id: RecordId,
    pub entry_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
    pub created_by: UserId,
}

impl Identifiable for JournalEntry {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Record for JournalEntry {}

/// One debit or credit movement against a single ledger account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionLine {
    pub id: RecordId,
    pub journal_id: RecordId,
    pub account_id: RecordId,
    pub debit_amount: Decimal,
    pub credit_amount: Decimal,
}

impl TransactionLine {
    /// Debit minus credit.
    pub fn signed_amount(&self) -> Decimal {
        self.debit_amount - self.credit_amount
    }
}

impl Identifiable for TransactionLine {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Record for TransactionLine {}

/// Journal header supplied by a caller before identities are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJournalEntry {
    pub entry_date: NaiveDate,
    pub narration: Option<String>,
}

impl NewJournalEntry {
    pub fn new(entry_date: NaiveDate) -> Self {
        Self {
            entry_date,
            narration: None,
        }
    }

    pub fn with_narration(mut self, narration: impl Into<String>) -> Self {
        self.narration = Some(narration.into());
        self
    }
}

/// Transaction line supplied by a caller; the parent id is assigned on posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTransactionLine {
    pub account_id: RecordId,
    pub debit_amount: Decimal,
    pub credit_amount: Decimal,
}

impl NewTransactionLine {
    pub fn new(account_id: RecordId, debit_amount: Decimal, credit_amount: Decimal) -> Self {
        Self {
            account_id,
            debit_amount,
            credit_amount,
        }
    }

    pub fn debit(account_id: RecordId, amount: Decimal) -> Self {
        Self::new(account_id, amount, Decimal::ZERO)
    }

    pub fn credit(account_id: RecordId, amount: Decimal) -> Self {
        Self::new(account_id, Decimal::ZERO, amount)
    }
}

/// A stored journal entry together with its lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostedEntry {
    pub entry: JournalEntry,
    pub lines: Vec<TransactionLine>,
}

impl PostedEntry {
    pub fn total_debits(&self) -> Decimal {
        self.lines.iter().map(|line| line.debit_amount).sum()
    }

    pub fn total_credits(&self) -> Decimal {
        self.lines.iter().map(|line| line.credit_amount).sum()
    }

    pub fn is_balanced(&self) -> bool {
        !self.lines.is_empty() && self.total_debits() == self.total_credits()
    }
}
