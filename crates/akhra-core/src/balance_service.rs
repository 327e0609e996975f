//! Derived account balances and the cash book's carried-forward balance.

use akhra_domain::{
    Books, CashBookEntry, DateRange, NewCashBookEntry, RecordId, TransactionLine,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::{validation, CoreError, UnitOfWork};

/// Debit and credit totals posted to one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccountTotals {
    pub debits: Decimal,
    pub credits: Decimal,
}

impl AccountTotals {
    pub fn balance(&self) -> Decimal {
        self.debits - self.credits
    }
}

/// A transaction line joined with its journal header and account name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    pub line_id: RecordId,
    pub journal_id: RecordId,
    pub entry_date: NaiveDate,
    pub narration: Option<String>,
    pub account_id: RecordId,
    pub account_name: String,
    pub debit: Decimal,
    pub credit: Decimal,
}

/// A cash book row whose stored balance disagrees with a replay from the first row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashBookDrift {
    pub entry_id: RecordId,
    pub entry_date: NaiveDate,
    pub stored: Decimal,
    pub expected: Decimal,
}

pub struct BalanceService;

impl BalanceService {
    pub fn account_totals(books: &Books, account_id: RecordId) -> AccountTotals {
        books
            .transactions
            .iter()
            .filter(|line| line.account_id == account_id)
            .fold(AccountTotals::default(), |mut totals, line| {
                totals.debits += line.debit_amount;
                totals.credits += line.credit_amount;
                totals
            })
    }

    /// Sum of debits minus sum of credits. Zero for an account with no activity.
    pub fn account_balance(books: &Books, account_id: RecordId) -> Decimal {
        Self::account_totals(books, account_id).balance()
    }

    /// Balance carried by the latest cash book row (by date, then id).
    pub fn cash_balance(books: &Books) -> Decimal {
        Self::latest_cash_entry(books)
            .map(|entry| entry.balance)
            .unwrap_or(Decimal::ZERO)
    }

    fn latest_cash_entry(books: &Books) -> Option<&CashBookEntry> {
        books
            .cash_book
            .iter()
            .max_by_key(|entry| (entry.entry_date, entry.id))
    }

    pub fn append_cash_entry(
        books: &mut Books,
        entry: NewCashBookEntry,
    ) -> Result<CashBookEntry, CoreError> {
        let mut uow = UnitOfWork::begin(books);
        let stored = Self::append_cash_entry_in(&mut uow, entry)?;
        uow.commit();
        Ok(stored)
    }

    /// Appends a row carrying the previous latest balance forward. Earlier rows are
    /// never recomputed.
    pub fn append_cash_entry_in(
        uow: &mut UnitOfWork<'_>,
        entry: NewCashBookEntry,
    ) -> Result<CashBookEntry, CoreError> {
        if let Some(debit) = entry.debit {
            validation::check_amount("debit", debit)?;
        }
        if let Some(credit) = entry.credit {
            validation::check_amount("credit", credit)?;
        }
        let balance = Self::cash_balance(uow.books()) + entry.movement();
        let stored = uow.insert_cash_entry(&entry, balance);
        info!(
            entry_id = stored.id,
            date = %stored.entry_date,
            balance = %stored.balance,
            "cash book entry appended"
        );
        Ok(stored)
    }

    /// Cash book rows, newest first.
    pub fn cash_book(books: &Books) -> Vec<&CashBookEntry> {
        let mut rows: Vec<_> = books.cash_book.iter().collect();
        rows.sort_by(|a, b| (b.entry_date, b.id).cmp(&(a.entry_date, a.id)));
        rows
    }

    /// Lines posted to an account, newest entry date first.
    pub fn transactions_by_account(books: &Books, account_id: RecordId) -> Vec<LedgerRow> {
        Self::rows_where(books, |line, _| line.account_id == account_id)
    }

    /// Lines whose journal entry date falls in `range`, newest first.
    pub fn transactions_in_range(books: &Books, range: DateRange) -> Vec<LedgerRow> {
        Self::rows_where(books, |_, date| range.contains(date))
    }

    fn rows_where<P>(books: &Books, mut predicate: P) -> Vec<LedgerRow>
    where
        P: FnMut(&TransactionLine, NaiveDate) -> bool,
    {
        let mut rows: Vec<LedgerRow> = books
            .transactions
            .iter()
            .filter_map(|line| {
                let header = books.journal_entries.get(line.journal_id)?;
                if !predicate(line, header.entry_date) {
                    return None;
                }
                let account_name = books
                    .account(line.account_id)
                    .map(|account| account.name.clone())
                    .unwrap_or_default();
                Some(LedgerRow {
                    line_id: line.id,
                    journal_id: line.journal_id,
                    entry_date: header.entry_date,
                    narration: header.narration.clone(),
                    account_id: line.account_id,
                    account_name,
                    debit: line.debit_amount,
                    credit: line.credit_amount,
                })
            })
            .collect();
        rows.sort_by(|a, b| (b.entry_date, b.line_id).cmp(&(a.entry_date, a.line_id)));
        rows
    }

    /// Replays the cash book from its first row and reports rows whose stored
    /// balance differs from the replayed one. Stored balances are left untouched.
    pub fn replay_cash_book(books: &Books) -> Vec<CashBookDrift> {
        let mut rows: Vec<_> = books.cash_book.iter().collect();
        rows.sort_by_key(|entry| (entry.entry_date, entry.id));
        let mut running = Decimal::ZERO;
        let mut drift = Vec::new();
        for entry in rows {
            running += entry.movement();
            if entry.balance != running {
                drift.push(CashBookDrift {
                    entry_id: entry.id,
                    entry_date: entry.entry_date,
                    stored: entry.balance,
                    expected: running,
                });
            }
        }
        drift
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn cash_entries_carry_balance_forward() {
        let mut books = Books::new("Cash");
        let first = BalanceService::append_cash_entry(
            &mut books,
            NewCashBookEntry::receipt(day(1), dec!(500)),
        )
        .expect("append receipt");
        let second = BalanceService::append_cash_entry(
            &mut books,
            NewCashBookEntry::payment(day(2), dec!(200)),
        )
        .expect("append payment");

        assert_eq!(first.balance, dec!(500));
        assert_eq!(second.balance, dec!(300));
        assert_eq!(BalanceService::cash_balance(&books), dec!(300));
        assert!(BalanceService::replay_cash_book(&books).is_empty());
    }

    #[test]
    fn empty_cash_book_has_zero_balance() {
        let books = Books::new("Empty");
        assert_eq!(BalanceService::cash_balance(&books), Decimal::ZERO);
    }

    #[test]
    fn back_dated_entry_is_detected_as_drift() {
        let mut books = Books::new("Drift");
        BalanceService::append_cash_entry(&mut books, NewCashBookEntry::receipt(day(10), dec!(100)))
            .expect("append");
        BalanceService::append_cash_entry(&mut books, NewCashBookEntry::receipt(day(5), dec!(40)))
            .expect("append back-dated");

        // latest by date is still the day-10 row
        assert_eq!(BalanceService::cash_balance(&books), dec!(100));

        let drift = BalanceService::replay_cash_book(&books);
        assert_eq!(drift.len(), 2);
        assert_eq!(drift[0].entry_date, day(5));
        assert_eq!(drift[0].stored, dec!(140));
        assert_eq!(drift[0].expected, dec!(40));
    }

    #[test]
    fn negative_cash_amount_is_rejected_without_writing() {
        let mut books = Books::new("Reject");
        let result = BalanceService::append_cash_entry(
            &mut books,
            NewCashBookEntry::receipt(day(1), dec!(-5)),
        );
        assert!(matches!(result, Err(CoreError::InvalidAmount { .. })));
        assert!(books.cash_book.is_empty());
    }
}
