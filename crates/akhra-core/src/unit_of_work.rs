//! Scoped, all-or-nothing writes against a [`Books`] aggregate.
//!
//! A unit of work snapshots the books when it begins. Dropping it without calling
//! [`UnitOfWork::commit`] puts the snapshot back, so an early `?` return or an
//! unwinding panic leaves the books exactly as they were, identity sequences included.

use akhra_domain::{
    Books, CashBookEntry, JournalEntry, NewCashBookEntry, NewJournalEntry, NewTransactionLine,
    RecordId, TransactionLine, UserId, Voucher, VoucherType,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::CoreError;

pub struct UnitOfWork<'a> {
    books: &'a mut Books,
    snapshot: Option<Books>,
}

impl<'a> UnitOfWork<'a> {
    pub fn begin(books: &'a mut Books) -> Self {
        let snapshot = Some(books.clone());
        debug!(books = %books.name, "unit of work started");
        Self { books, snapshot }
    }

    pub fn books(&self) -> &Books {
        self.books
    }

    pub fn books_mut(&mut self) -> &mut Books {
        self.books
    }

    /// Keeps every write made through this unit of work.
    pub fn commit(mut self) {
        self.snapshot = None;
        self.books.touch();
        debug!(books = %self.books.name, "unit of work committed");
    }

    /// Discards every write made through this unit of work.
    pub fn rollback(self) {
        drop(self);
    }

    pub fn insert_journal_entry(
        &mut self,
        created_by: UserId,
        entry: &NewJournalEntry,
    ) -> RecordId {
        self.books
            .journal_entries
            .insert_with(|id| JournalEntry {
                id,
                entry_date: entry.entry_date,
                narration: entry.narration.clone(),
                created_by,
            })
            .id
    }

    /// Inserts a line under `journal_id`. Both references must resolve.
    pub fn insert_line(
        &mut self,
        journal_id: RecordId,
        line: &NewTransactionLine,
    ) -> Result<TransactionLine, CoreError> {
        if !self.books.journal_entries.exists(journal_id) {
            return Err(CoreError::JournalEntryNotFound(journal_id));
        }
        if !self.books.accounts.exists(line.account_id) {
            return Err(CoreError::AccountNotFound(line.account_id));
        }
        let stored = self.books.transactions.insert_with(|id| TransactionLine {
            id,
            journal_id,
            account_id: line.account_id,
            debit_amount: line.debit_amount,
            credit_amount: line.credit_amount,
        });
        Ok(stored.clone())
    }

    pub fn insert_cash_entry(&mut self, entry: &NewCashBookEntry, balance: Decimal) -> CashBookEntry {
        self.books
            .cash_book
            .insert_with(|id| CashBookEntry {
                id,
                entry_date: entry.entry_date,
                description: entry.description.clone(),
                debit: entry.debit,
                credit: entry.credit,
                balance,
            })
            .clone()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn insert_voucher(
        &mut self,
        voucher_type: VoucherType,
        voucher_date: NaiveDate,
        member_id: Option<RecordId>,
        amount: Decimal,
        account_id: RecordId,
        journal_id: RecordId,
        remarks: Option<String>,
    ) -> Result<Voucher, CoreError> {
        if !self.books.journal_entries.exists(journal_id) {
            return Err(CoreError::JournalEntryNotFound(journal_id));
        }
        if !self.books.accounts.exists(account_id) {
            return Err(CoreError::AccountNotFound(account_id));
        }
        if let Some(member) = member_id {
            if !self.books.members.exists(member) {
                return Err(CoreError::MemberNotFound(member));
            }
        }
        let stored = self.books.vouchers.insert_with(|id| Voucher {
            id,
            voucher_type,
            voucher_date,
            member_id,
            amount,
            account_id,
            journal_id,
            remarks,
        });
        Ok(stored.clone())
    }
}

impl Drop for UnitOfWork<'_> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            warn!(books = %self.books.name, "unit of work rolled back");
            *self.books = snapshot;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use akhra_domain::{ADMIN_USER_ID, CASH_ACCOUNT_ID};
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
    }

    #[test]
    fn dropping_without_commit_restores_books_and_sequences() {
        let mut books = Books::new("Rollback");
        {
            let mut uow = UnitOfWork::begin(&mut books);
            let journal_id = uow.insert_journal_entry(ADMIN_USER_ID, &NewJournalEntry::new(date()));
            uow.insert_line(journal_id, &NewTransactionLine::debit(CASH_ACCOUNT_ID, dec!(5)))
                .expect("line insert");
            assert_eq!(uow.books().transactions.count(), 1);
        }
        assert!(books.journal_entries.is_empty());
        assert!(books.transactions.is_empty());
        assert_eq!(books.journal_entries.next_id(), 1);
    }

    #[test]
    fn commit_keeps_writes() {
        let mut books = Books::new("Commit");
        let mut uow = UnitOfWork::begin(&mut books);
        uow.insert_journal_entry(ADMIN_USER_ID, &NewJournalEntry::new(date()));
        uow.commit();
        assert_eq!(books.journal_entries.count(), 1);
    }

    #[test]
    fn line_insert_enforces_foreign_keys() {
        let mut books = Books::new("Keys");
        let mut uow = UnitOfWork::begin(&mut books);
        let err = uow
            .insert_line(9, &NewTransactionLine::debit(CASH_ACCOUNT_ID, dec!(1)))
            .unwrap_err();
        assert!(matches!(err, CoreError::JournalEntryNotFound(9)));

        let journal_id = uow.insert_journal_entry(ADMIN_USER_ID, &NewJournalEntry::new(date()));
        let err = uow
            .insert_line(journal_id, &NewTransactionLine::debit(99, dec!(1)))
            .unwrap_err();
        assert!(matches!(err, CoreError::AccountNotFound(99)));
    }
}
