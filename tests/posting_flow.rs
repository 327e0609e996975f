mod common;

use std::path::Path;

use akhra_books::{AppError, BookManager};
use akhra_core::{
    storage::{BookBackupInfo, BookStorage},
    BalanceService, CoreError, ReportService,
};
use akhra_domain::{
    Books, DateRange, NewCashBookEntry, NewJournalEntry, NewMember, NewTransactionLine,
    NewVoucher, ADMIN_USER_ID, BANK_ACCOUNT_ID, CASH_ACCOUNT_ID, MEMBER_FEES_ACCOUNT_ID,
};
use chrono::NaiveDate;
use common::setup_test_env;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn fee_lines(amount: rust_decimal::Decimal) -> [NewTransactionLine; 2] {
    [
        NewTransactionLine::debit(CASH_ACCOUNT_ID, amount),
        NewTransactionLine::credit(MEMBER_FEES_ACCOUNT_ID, amount),
    ]
}

/// Storage that accepts nothing.
struct FailingStorage;

impl BookStorage for FailingStorage {
    fn save_books(&self, _name: &str, _books: &Books) -> Result<(), CoreError> {
        Err(CoreError::Storage("disk full".into()))
    }
    fn load_books(&self, name: &str) -> Result<Books, CoreError> {
        Err(CoreError::BooksNotFound(name.into()))
    }
    fn list_books(&self) -> Result<Vec<String>, CoreError> {
        Ok(Vec::new())
    }
    fn delete_books(&self, _name: &str) -> Result<(), CoreError> {
        Ok(())
    }
    fn save_books_to_path(&self, _books: &Books, _path: &Path) -> Result<(), CoreError> {
        Err(CoreError::Storage("disk full".into()))
    }
    fn load_books_from_path(&self, path: &Path) -> Result<Books, CoreError> {
        Err(CoreError::BooksNotFound(path.display().to_string()))
    }
    fn backup_books(
        &self,
        _name: &str,
        _books: &Books,
        _note: Option<&str>,
    ) -> Result<BookBackupInfo, CoreError> {
        Err(CoreError::Storage("disk full".into()))
    }
    fn list_backups(&self, _name: &str) -> Result<Vec<BookBackupInfo>, CoreError> {
        Ok(Vec::new())
    }
    fn restore_backup(&self, _backup: &BookBackupInfo) -> Result<Books, CoreError> {
        Err(CoreError::Storage("disk full".into()))
    }
}

#[test]
fn posted_entries_survive_a_reload() {
    let (mut manager, _) = setup_test_env();
    manager.create("Community Fund").expect("create");
    let posted = manager
        .post_journal_entry(
            ADMIN_USER_ID,
            NewJournalEntry::new(date(2024, 1, 5)).with_narration("January fees"),
            &fee_lines(dec!(100)),
        )
        .expect("post");
    assert_eq!(posted.lines.len(), 2);

    manager.close();
    manager.load("Community Fund").expect("reload");
    let books = manager.books().expect("books");
    assert_eq!(BalanceService::account_balance(books, CASH_ACCOUNT_ID), dec!(100));
    assert_eq!(
        BalanceService::account_balance(books, MEMBER_FEES_ACCOUNT_ID),
        dec!(-100)
    );
    assert_eq!(books.journal_entry(posted.entry.id), Some(posted));
}

#[test]
fn unbalanced_entries_are_rejected_and_not_saved() {
    let (mut manager, _) = setup_test_env();
    manager.create("Fund").expect("create");
    let err = manager
        .post_journal_entry(
            ADMIN_USER_ID,
            NewJournalEntry::new(date(2024, 1, 5)),
            &[
                NewTransactionLine::debit(CASH_ACCOUNT_ID, dec!(100)),
                NewTransactionLine::credit(MEMBER_FEES_ACCOUNT_ID, dec!(50)),
            ],
        )
        .unwrap_err();
    assert!(err.to_string().contains("debits 100 != credits 50"));

    manager.load("Fund").expect("reload");
    let books = manager.books().expect("books");
    assert!(books.journal_entries.is_empty());
    assert!(books.transactions.is_empty());
}

#[test]
fn failed_save_leaves_the_open_books_unchanged() {
    let mut manager = BookManager::new(Box::new(FailingStorage));
    manager.set_current(Books::new("Volatile"), Some("volatile".into()));
    let before = manager.books().expect("books").clone();

    let err = manager
        .post_journal_entry(
            ADMIN_USER_ID,
            NewJournalEntry::new(date(2024, 1, 5)),
            &fee_lines(dec!(100)),
        )
        .unwrap_err();
    assert!(matches!(err, AppError::Core(CoreError::Storage(_))));
    assert_eq!(manager.books().expect("books"), &before);

    let err = manager
        .append_cash_entry(NewCashBookEntry::receipt(date(2024, 1, 5), dec!(10)))
        .unwrap_err();
    assert!(matches!(err, AppError::Core(CoreError::Storage(_))));
    assert_eq!(manager.books().expect("books"), &before);
}

#[test]
fn unsaved_books_write_in_memory_only() {
    let mut manager = BookManager::new(Box::new(FailingStorage));
    manager.set_current(Books::new("Scratch"), None);
    manager
        .append_cash_entry(NewCashBookEntry::receipt(date(2024, 2, 1), dec!(500)))
        .expect("append");
    manager
        .append_cash_entry(NewCashBookEntry::payment(date(2024, 2, 2), dec!(200)))
        .expect("append");
    let books = manager.books().expect("books");
    assert_eq!(BalanceService::cash_balance(books), dec!(300));
    assert!(matches!(manager.save(), Err(AppError::Unnamed)));
}

#[test]
fn operations_without_books_report_not_loaded() {
    let (mut manager, _) = setup_test_env();
    let err = manager
        .append_cash_entry(NewCashBookEntry::receipt(date(2024, 1, 1), dec!(1)))
        .unwrap_err();
    assert!(matches!(err, AppError::BooksNotLoaded));
}

#[test]
fn creating_existing_books_is_refused() {
    let (mut manager, _) = setup_test_env();
    manager.create("Fund").expect("create");
    assert!(matches!(
        manager.create("fund"),
        Err(AppError::InvalidInput(_))
    ));
}

#[test]
fn vouchers_post_balanced_entries_for_members() {
    let (mut manager, _) = setup_test_env();
    manager.create("Fund").expect("create");
    let member = manager
        .add_member(NewMember::new("Amira Haddad", date(2023, 9, 1)))
        .expect("member");
    let issued = manager
        .issue_voucher(
            ADMIN_USER_ID,
            NewVoucher::receipt(date(2024, 3, 1), MEMBER_FEES_ACCOUNT_ID, dec!(40))
                .for_member(member.id),
        )
        .expect("voucher");
    assert!(issued.journal.is_balanced());

    let err = manager
        .issue_voucher(
            ADMIN_USER_ID,
            NewVoucher::payment(date(2024, 3, 2), BANK_ACCOUNT_ID, dec!(10)).for_member(99),
        )
        .unwrap_err();
    assert!(matches!(err, AppError::Core(CoreError::MemberNotFound(99))));

    let books = manager.books().expect("books");
    assert_eq!(books.vouchers.count(), 1);
    assert!(ReportService::trial_balance(books).is_balanced());
    let march = DateRange::new(date(2024, 3, 1), date(2024, 3, 31)).unwrap();
    assert_eq!(ReportService::total_income(books, march), dec!(40));
}

#[test]
fn medicaid_decisions_are_persisted() {
    let (mut manager, _) = setup_test_env();
    manager.create("Fund").expect("create");
    let member = manager
        .add_member(NewMember::new("Omar Said", date(2022, 1, 1)))
        .expect("member");
    let request = manager
        .submit_medicaid_request(member.id, date(2024, 4, 1), Some(dec!(300)), None)
        .expect("submit");

    assert!(manager
        .approve_medicaid_request(request.id, dec!(250))
        .expect("approve"));
    assert!(matches!(
        manager.approve_medicaid_request(request.id, dec!(10)),
        Err(AppError::Core(CoreError::InvalidTransition(_)))
    ));
    assert!(!manager.reject_medicaid_request(404).expect("missing"));

    manager.load("Fund").expect("reload");
    let stored = manager
        .books()
        .expect("books")
        .medicaid_requests
        .get(request.id)
        .cloned()
        .expect("request");
    assert_eq!(stored.approved_amount, Some(dec!(250)));
}

#[test]
fn backups_restore_earlier_state() {
    let (mut manager, _) = setup_test_env();
    manager.create("Fund").expect("create");
    manager
        .append_cash_entry(NewCashBookEntry::receipt(date(2024, 1, 1), dec!(100)))
        .expect("append");
    let backup = manager.backup(Some("before payment")).expect("backup");
    manager
        .append_cash_entry(NewCashBookEntry::payment(date(2024, 1, 2), dec!(40)))
        .expect("append");

    let report = manager.restore_backup(&backup.id).expect("restore");
    assert!(report.warnings.is_empty());
    let books = manager.books().expect("books");
    assert_eq!(BalanceService::cash_balance(books), dec!(100));
    assert!(manager.restore_backup("fund_19990101_0000.json").is_err());
}

#[test]
fn export_and_import_round_trip_through_a_path() {
    let (mut manager, _) = setup_test_env();
    manager.create("Fund").expect("create");
    manager
        .post_journal_entry(
            ADMIN_USER_ID,
            NewJournalEntry::new(date(2024, 1, 5)),
            &fee_lines(dec!(75)),
        )
        .expect("post");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("fund-export.json");
    manager.save_to_path(&path).expect("export");

    let (mut other, _) = setup_test_env();
    let report = other.load_from_path(&path).expect("import");
    assert_eq!(report.name, "Fund");
    assert_eq!(other.current_path(), Some(path.as_path()));
    assert_eq!(
        BalanceService::cash_balance(other.books().expect("books")),
        dec!(0)
    );
    assert_eq!(
        BalanceService::account_balance(other.books().expect("books"), CASH_ACCOUNT_ID),
        dec!(75)
    );
}
