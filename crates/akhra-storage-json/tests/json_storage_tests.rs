use akhra_core::{storage::BookStorage, BalanceService, CoreError, JournalService};
use akhra_domain::{
    Books, NewCashBookEntry, NewJournalEntry, NewTransactionLine, ADMIN_USER_ID, CASH_ACCOUNT_ID,
    MEMBER_FEES_ACCOUNT_ID,
};
use akhra_storage_json::{JsonBookStorage, StoragePaths};
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::fs;
use tempfile::{tempdir, TempDir};

fn storage_in(dir: &TempDir, retention: usize) -> (JsonBookStorage, StoragePaths) {
    let paths = StoragePaths {
        book_root: dir.path().join("books"),
        backup_root: dir.path().join("backups"),
    };
    let storage = JsonBookStorage::with_retention(paths.clone(), retention).expect("create storage");
    (storage, paths)
}

fn sample_books() -> Books {
    let mut books = Books::new("Community Fund");
    JournalService::post(
        &mut books,
        ADMIN_USER_ID,
        NewJournalEntry::new(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
        &[
            NewTransactionLine::debit(CASH_ACCOUNT_ID, dec!(100.50)),
            NewTransactionLine::credit(MEMBER_FEES_ACCOUNT_ID, dec!(100.50)),
        ],
    )
    .expect("post");
    BalanceService::append_cash_entry(
        &mut books,
        NewCashBookEntry::receipt(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), dec!(100.50)),
    )
    .expect("cash entry");
    books
}

#[test]
fn json_storage_can_save_and_load_books() {
    let dir = tempdir().expect("tempdir");
    let (storage, _) = storage_in(&dir, 5);
    let books = sample_books();

    storage.save_books("Community Fund", &books).expect("save books");
    let loaded = storage.load_books("community_fund").expect("load books");

    assert_eq!(loaded, books);
    assert_eq!(
        BalanceService::account_balance(&loaded, CASH_ACCOUNT_ID),
        dec!(100.50)
    );
    let path = storage.book_path("Community Fund");
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("json"));
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
    assert_eq!(
        storage.list_books().expect("list"),
        vec!["community_fund".to_string()]
    );
}

#[test]
fn amounts_are_written_as_strings() {
    let dir = tempdir().expect("tempdir");
    let (storage, _) = storage_in(&dir, 5);
    storage.save_books("fund", &sample_books()).expect("save");

    let raw = fs::read_to_string(storage.book_path("fund")).expect("read");
    assert!(raw.contains("\"100.50\""));
    assert!(raw.contains("\"schema_version\": 1"));
}

#[test]
fn missing_books_are_reported_by_name() {
    let dir = tempdir().expect("tempdir");
    let (storage, _) = storage_in(&dir, 5);
    let err = storage.load_books("nowhere").unwrap_err();
    assert!(matches!(err, CoreError::BooksNotFound(name) if name == "nowhere"));
}

#[test]
fn newer_schema_is_refused() {
    let dir = tempdir().expect("tempdir");
    let (storage, _) = storage_in(&dir, 5);
    let mut books = Books::new("Future");
    books.schema_version = 9;
    storage.save_books("future", &books).expect("save");

    let err = storage.load_books("future").unwrap_err();
    assert!(matches!(err, CoreError::Storage(_)));
}

#[test]
fn json_storage_creates_and_restores_backups() {
    let dir = tempdir().expect("tempdir");
    let (storage, paths) = storage_in(&dir, 5);
    let books = sample_books();
    storage.save_books("fund", &books).expect("save books");

    let info = storage
        .backup_books("fund", &books, Some("before close"))
        .expect("create backup");
    assert!(info.id.starts_with("fund_"));
    assert!(info.id.ends_with("_before-close.json"));
    assert_eq!(info.path.parent(), Some(paths.backup_root.join("fund").as_path()));

    let backups = storage.list_backups("fund").expect("list backups");
    assert!(backups.iter().any(|entry| entry.id == info.id));

    storage.delete_books("fund").expect("delete");
    assert!(storage.list_books().expect("list").is_empty());

    let restored = storage.restore_backup(&info).expect("restore backup");
    assert_eq!(restored, books);
    assert!(storage.book_path("fund").exists());
}

#[test]
fn retention_prunes_old_backups() {
    let dir = tempdir().expect("tempdir");
    let (storage, _) = storage_in(&dir, 2);
    let books = Books::new("Pruned");
    for note in ["one", "two", "three"] {
        storage
            .backup_books("pruned", &books, Some(note))
            .expect("backup");
    }
    assert_eq!(storage.list_backups("pruned").expect("list").len(), 2);
    assert_eq!(storage.retention(), 2);
}

#[test]
fn saves_never_prune_a_backup_with_a_note() {
    let dir = tempdir().expect("tempdir");
    let (storage, _) = storage_in(&dir, 1);
    let mut books = Books::new("Closing");
    storage.save_books("closing", &books).expect("first save");
    let named = storage
        .backup_books("closing", &books, Some("pre-close"))
        .expect("named backup");

    for suffix in ["a", "b", "c", "d"] {
        books.name = format!("Closing {suffix}");
        storage.save_books("closing", &books).expect("save");
    }

    let backups = storage.list_backups("closing").expect("list");
    assert!(backups.iter().any(|entry| entry.id == named.id));
    assert_eq!(backups.len(), 2);
}

#[test]
fn overwriting_a_book_keeps_the_previous_file_as_backup() {
    let dir = tempdir().expect("tempdir");
    let (storage, _) = storage_in(&dir, 5);
    let books = Books::new("Rolling");
    storage.save_books("rolling", &books).expect("first save");
    assert!(storage.list_backups("rolling").expect("list").is_empty());

    storage.save_books("rolling", &books).expect("second save");
    assert_eq!(storage.list_backups("rolling").expect("list").len(), 1);
}

#[test]
fn metadata_summarizes_each_book() {
    let dir = tempdir().expect("tempdir");
    let (storage, _) = storage_in(&dir, 5);
    storage.save_books("fund", &sample_books()).expect("save");
    storage.save_books("empty", &Books::new("Empty")).expect("save");

    let metadata = storage.list_book_metadata().expect("metadata");
    assert_eq!(metadata.len(), 2);
    assert_eq!(metadata[0].name, "Community Fund");
    assert_eq!(metadata[0].journal_entry_count, 1);
    assert_eq!(metadata[0].cash_balance, dec!(100.50));
    assert_eq!(metadata[1].account_count, 5);
}
