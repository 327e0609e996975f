use std::path::{Path, PathBuf};

use akhra_core::{
    storage::{book_warnings, BookBackupInfo, BookStorage},
    BalanceService, CoreError, EventService, FeeService, IssuedVoucher, JournalService,
    MedicaidService, MemberService, UnitOfWork, VoucherService,
};
use akhra_domain::{
    Books, CashBookEntry, Event, Fee, Member, MedicaidRequest, NewCashBookEntry, NewEvent,
    NewFee, NewJournalEntry, NewMember, NewTransactionLine, NewVoucher, PostedEntry, RecordId,
    UserId,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::errors::{AppError, Result};

/// Outcome of loading a set of books.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub name: String,
    pub warnings: Vec<String>,
    pub schema_version: u8,
}

/// Facade that coordinates the open books, persistence and backups.
///
/// Every mutation runs inside a [`UnitOfWork`] and is persisted before the unit
/// commits, so a failed save leaves the in-memory books exactly as they were.
pub struct BookManager {
    books: Option<Books>,
    current_name: Option<String>,
    current_path: Option<PathBuf>,
    storage: Box<dyn BookStorage>,
}

impl BookManager {
    pub fn new(storage: Box<dyn BookStorage>) -> Self {
        Self {
            books: None,
            current_name: None,
            current_path: None,
            storage,
        }
    }

    pub fn storage(&self) -> &dyn BookStorage {
        self.storage.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.books.is_some()
    }

    pub fn books(&self) -> Result<&Books> {
        self.books.as_ref().ok_or(AppError::BooksNotLoaded)
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// Replaces the open books without touching storage.
    pub fn set_current(&mut self, books: Books, name: Option<String>) {
        self.books = Some(books);
        self.current_name = name;
        self.current_path = None;
    }

    pub fn close(&mut self) {
        self.books = None;
        self.current_name = None;
        self.current_path = None;
    }

    pub fn list_books(&self) -> Result<Vec<String>> {
        Ok(self.storage.list_books()?)
    }

    /// Creates and saves fresh books seeded with the chart of accounts.
    pub fn create(&mut self, name: &str) -> Result<&Books> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput("book name cannot be empty".into()));
        }
        match self.storage.load_books(name) {
            Ok(_) => {
                return Err(AppError::InvalidInput(format!(
                    "books named `{name}` already exist"
                )))
            }
            Err(CoreError::BooksNotFound(_)) => {}
            Err(err) => return Err(err.into()),
        }
        let books = Books::new(name);
        self.storage.save_books(name, &books)?;
        info!(name, "books created");
        self.set_current(books, Some(name.to_string()));
        self.books()
    }

    pub fn load(&mut self, name: &str) -> Result<LoadReport> {
        let books = self.storage.load_books(name)?;
        let report = Self::report(name, &books);
        self.set_current(books, Some(name.to_string()));
        Ok(report)
    }

    pub fn load_from_path(&mut self, path: &Path) -> Result<LoadReport> {
        let books = self.storage.load_books_from_path(path)?;
        let report = Self::report(&books.name, &books);
        self.books = Some(books);
        self.current_name = None;
        self.current_path = Some(path.to_path_buf());
        Ok(report)
    }

    /// Writes the open books to wherever they were loaded from.
    pub fn save(&mut self) -> Result<()> {
        let books = self.books()?;
        persist(
            self.storage.as_ref(),
            self.current_name.as_deref(),
            self.current_path.as_deref(),
            books,
        )?
        .then_some(())
        .ok_or(AppError::Unnamed)
    }

    pub fn save_as(&mut self, name: &str) -> Result<()> {
        let books = self.books()?;
        self.storage.save_books(name, books)?;
        self.current_name = Some(name.to_string());
        self.current_path = None;
        Ok(())
    }

    pub fn save_to_path(&mut self, path: &Path) -> Result<()> {
        let books = self.books()?;
        self.storage.save_books_to_path(books, path)?;
        debug!(path = %path.display(), "books exported");
        Ok(())
    }

    pub fn backup(&self, note: Option<&str>) -> Result<BookBackupInfo> {
        let name = self.current_name.as_deref().ok_or(AppError::Unnamed)?;
        let info = self.storage.backup_books(name, self.books()?, note)?;
        info!(backup = %info.id, "backup created");
        Ok(info)
    }

    pub fn list_backups(&self) -> Result<Vec<BookBackupInfo>> {
        let name = self.current_name.as_deref().ok_or(AppError::Unnamed)?;
        Ok(self.storage.list_backups(name)?)
    }

    /// Restores a backup of the current books by id and makes it the open copy.
    pub fn restore_backup(&mut self, backup_id: &str) -> Result<LoadReport> {
        let backup = self
            .list_backups()?
            .into_iter()
            .find(|backup| backup.id == backup_id)
            .ok_or_else(|| AppError::InvalidInput(format!("backup `{backup_id}` not found")))?;
        let books = self.storage.restore_backup(&backup)?;
        info!(backup = %backup.id, "backup restored");
        let report = Self::report(&backup.books, &books);
        self.books = Some(books);
        Ok(report)
    }

    /// Runs `op` in a unit of work over the open books and persists the result
    /// before committing.
    pub fn write<T>(
        &mut self,
        op: impl FnOnce(&mut UnitOfWork<'_>) -> std::result::Result<T, CoreError>,
    ) -> Result<T> {
        let Self {
            books,
            current_name,
            current_path,
            storage,
        } = self;
        let books = books.as_mut().ok_or(AppError::BooksNotLoaded)?;
        let mut uow = UnitOfWork::begin(books);
        let value = op(&mut uow)?;
        uow.books_mut().touch();
        persist(
            storage.as_ref(),
            current_name.as_deref(),
            current_path.as_deref(),
            uow.books(),
        )?;
        uow.commit();
        Ok(value)
    }

    pub fn post_journal_entry(
        &mut self,
        created_by: UserId,
        entry: NewJournalEntry,
        lines: &[NewTransactionLine],
    ) -> Result<PostedEntry> {
        self.write(|uow| JournalService::post_in(uow, created_by, entry, lines))
    }

    pub fn append_cash_entry(&mut self, entry: NewCashBookEntry) -> Result<CashBookEntry> {
        self.write(|uow| BalanceService::append_cash_entry_in(uow, entry))
    }

    pub fn issue_voucher(&mut self, created_by: UserId, voucher: NewVoucher) -> Result<IssuedVoucher> {
        self.write(|uow| VoucherService::issue_in(uow, created_by, voucher))
    }

    pub fn add_member(&mut self, member: NewMember) -> Result<Member> {
        self.write(|uow| MemberService::add(uow.books_mut(), member))
    }

    pub fn remove_member(&mut self, member_id: RecordId) -> Result<()> {
        self.write(|uow| MemberService::remove(uow.books_mut(), member_id))
    }

    pub fn set_member_active(&mut self, member_id: RecordId, active: bool) -> Result<()> {
        self.write(|uow| MemberService::set_active(uow.books_mut(), member_id, active))
    }

    pub fn record_fee(&mut self, fee: NewFee) -> Result<Fee> {
        self.write(|uow| FeeService::record(uow.books_mut(), fee))
    }

    pub fn mark_fee_paid(
        &mut self,
        fee_id: RecordId,
        paid_date: NaiveDate,
        receipt_number: Option<String>,
    ) -> Result<()> {
        self.write(|uow| FeeService::mark_paid(uow.books_mut(), fee_id, paid_date, receipt_number))
    }

    pub fn add_event(&mut self, event: NewEvent) -> Result<Event> {
        self.write(|uow| EventService::add(uow.books_mut(), event))
    }

    pub fn record_event_expense(&mut self, event_id: RecordId, amount: Decimal) -> Result<()> {
        self.write(|uow| EventService::record_expense(uow.books_mut(), event_id, amount))
    }

    pub fn submit_medicaid_request(
        &mut self,
        member_id: RecordId,
        request_date: NaiveDate,
        amount_requested: Option<Decimal>,
        description: Option<String>,
    ) -> Result<MedicaidRequest> {
        self.write(|uow| {
            MedicaidService::submit(
                uow.books_mut(),
                member_id,
                request_date,
                amount_requested,
                description,
            )
        })
    }

    /// `Ok(false)` when no request has that id.
    pub fn approve_medicaid_request(&mut self, request_id: RecordId, amount: Decimal) -> Result<bool> {
        self.write(|uow| MedicaidService::approve(uow.books_mut(), request_id, amount))
    }

    /// `Ok(false)` when no request has that id.
    pub fn reject_medicaid_request(&mut self, request_id: RecordId) -> Result<bool> {
        self.write(|uow| MedicaidService::reject(uow.books_mut(), request_id))
    }

    fn report(name: &str, books: &Books) -> LoadReport {
        let warnings = book_warnings(books);
        for warning in &warnings {
            warn!(books = name, "{warning}");
        }
        info!(books = name, warnings = warnings.len(), "books loaded");
        LoadReport {
            name: name.to_string(),
            warnings,
            schema_version: books.schema_version,
        }
    }
}

/// Saves under the name if there is one, else to the path. Returns `false` when
/// the books have neither.
fn persist(
    storage: &dyn BookStorage,
    name: Option<&str>,
    path: Option<&Path>,
    books: &Books,
) -> std::result::Result<bool, CoreError> {
    match (name, path) {
        (Some(name), _) => storage.save_books(name, books).map(|_| true),
        (None, Some(path)) => storage.save_books_to_path(books, path).map(|_| true),
        (None, None) => Ok(false),
    }
}
