use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use akhra_domain::Books;

use crate::{balance_service::BalanceService, CoreError};

/// Describes a persisted backup artifact for a set of books.
#[derive(Debug, Clone)]
pub struct BookBackupInfo {
    pub books: String,
    pub id: String,
    pub created_at: String,
    pub path: PathBuf,
}

/// Abstraction over persistence backends capable of storing books and backups.
pub trait BookStorage: Send + Sync {
    fn save_books(&self, name: &str, books: &Books) -> Result<(), CoreError>;
    fn load_books(&self, name: &str) -> Result<Books, CoreError>;
    fn list_books(&self) -> Result<Vec<String>, CoreError>;
    fn delete_books(&self, name: &str) -> Result<(), CoreError>;
    fn save_books_to_path(&self, books: &Books, path: &Path) -> Result<(), CoreError>;
    fn load_books_from_path(&self, path: &Path) -> Result<Books, CoreError>;
    fn backup_books(
        &self,
        name: &str,
        books: &Books,
        note: Option<&str>,
    ) -> Result<BookBackupInfo, CoreError>;
    fn list_backups(&self, name: &str) -> Result<Vec<BookBackupInfo>, CoreError>;
    fn restore_backup(&self, backup: &BookBackupInfo) -> Result<Books, CoreError>;
}

/// Detects dangling references, unbalanced entries and cash book drift within a snapshot.
pub fn book_warnings(books: &Books) -> Vec<String> {
    let account_ids: HashSet<_> = books.accounts.iter().map(|a| a.id).collect();
    let journal_ids: HashSet<_> = books.journal_entries.iter().map(|j| j.id).collect();
    let mut warnings = Vec::new();

    for line in books.transactions.iter() {
        if !account_ids.contains(&line.account_id) {
            warnings.push(format!(
                "transaction {} references unknown account {}",
                line.id, line.account_id
            ));
        }
        if !journal_ids.contains(&line.journal_id) {
            warnings.push(format!(
                "transaction {} references missing journal entry {}",
                line.id, line.journal_id
            ));
        }
    }

    for entry in books.journal_entries.iter() {
        if let Some(posted) = books.journal_entry(entry.id) {
            if posted.lines.is_empty() {
                warnings.push(format!("journal entry {} has no lines", entry.id));
            } else if !posted.is_balanced() {
                warnings.push(format!(
                    "journal entry {} is unbalanced: debits {} != credits {}",
                    entry.id,
                    posted.total_debits(),
                    posted.total_credits()
                ));
            }
        }
    }

    for voucher in books.vouchers.iter() {
        if !journal_ids.contains(&voucher.journal_id) {
            warnings.push(format!(
                "voucher {} references missing journal entry {}",
                voucher.id, voucher.journal_id
            ));
        }
    }

    for drift in BalanceService::replay_cash_book(books) {
        warnings.push(format!(
            "cash book entry {} on {} stores balance {} but replay gives {}",
            drift.entry_id, drift.entry_date, drift.stored, drift.expected
        ));
    }
    warnings
}
