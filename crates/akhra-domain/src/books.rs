//! The `Books` aggregate: every table of one association's accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    account::{seeded_chart, LedgerAccount},
    cash_book::CashBookEntry,
    common::{RecordId, UserId},
    event::Event,
    journal::{JournalEntry, PostedEntry, TransactionLine},
    medicaid::MedicaidRequest,
    member::{Fee, Member},
    table::Table,
    user::User,
    voucher::Voucher,
};

/// Schema written by this build. Newer documents are refused on load.
pub const CURRENT_SCHEMA_VERSION: u8 = 1;

fn default_schema_version() -> u8 {
    CURRENT_SCHEMA_VERSION
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Books {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub accounts: Table<LedgerAccount>,
    #[serde(default)]
    pub users: Table<User>,
    #[serde(default)]
    pub journal_entries: Table<JournalEntry>,
    #[serde(default)]
    pub transactions: Table<TransactionLine>,
    #[serde(default)]
    pub cash_book: Table<CashBookEntry>,
    #[serde(default)]
    pub vouchers: Table<Voucher>,
    #[serde(default)]
    pub members: Table<Member>,
    #[serde(default)]
    pub fees: Table<Fee>,
    #[serde(default)]
    pub events: Table<Event>,
    #[serde(default)]
    pub medicaid_requests: Table<MedicaidRequest>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "default_schema_version")]
    pub schema_version: u8,
}

impl Books {
    /// Creates books seeded with the default chart of accounts and the admin operator.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        let mut accounts = Table::new();
        for account in seeded_chart() {
            accounts.seed(account);
        }
        let mut users = Table::new();
        users.seed(User::admin());
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            accounts,
            users,
            journal_entries: Table::new(),
            transactions: Table::new(),
            cash_book: Table::new(),
            vouchers: Table::new(),
            members: Table::new(),
            fees: Table::new(),
            events: Table::new(),
            medicaid_requests: Table::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn account(&self, id: RecordId) -> Option<&LedgerAccount> {
        self.accounts.get(id)
    }

    pub fn account_by_name(&self, name: &str) -> Option<&LedgerAccount> {
        let needle = name.trim();
        self.accounts
            .iter()
            .find(|account| account.name.eq_ignore_ascii_case(needle))
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(id.0)
    }

    pub fn user_by_name(&self, user_name: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|user| user.user_name.eq_ignore_ascii_case(user_name.trim()))
    }

    /// Lines of a journal entry in insertion order.
    pub fn lines_for(&self, journal_id: RecordId) -> Vec<&TransactionLine> {
        self.transactions
            .find(|line| line.journal_id == journal_id)
    }

    pub fn journal_entry(&self, id: RecordId) -> Option<PostedEntry> {
        let entry = self.journal_entries.get(id)?;
        Some(PostedEntry {
            entry: entry.clone(),
            lines: self.lines_for(id).into_iter().cloned().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{AccountType, CASH_ACCOUNT_ID};
    use crate::user::ADMIN_USER_ID;

    #[test]
    fn new_books_are_seeded() {
        let books = Books::new("Association");
        assert_eq!(books.accounts.count(), 5);
        assert_eq!(books.accounts.next_id(), 6);
        assert_eq!(
            books.account(CASH_ACCOUNT_ID).map(|a| a.account_type),
            Some(AccountType::Assets)
        );
        assert_eq!(
            books.user(ADMIN_USER_ID).map(|u| u.role.as_str()),
            Some("Administrator")
        );
        assert!(books.journal_entries.is_empty());
        assert_eq!(books.schema_version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn account_lookup_by_name_ignores_case() {
        let books = Books::new("Association");
        let fees = books.account_by_name("member fees").expect("seeded");
        assert_eq!(fees.id, 3);
        assert!(books.account_by_name("Payroll").is_none());
    }

    #[test]
    fn books_round_trip_through_json() {
        let books = Books::new("Association");
        let json = serde_json::to_string(&books).expect("serialize");
        let restored: Books = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, books);
    }
}
