//! Double-entry posting of journal entries.

use akhra_domain::{Books, NewJournalEntry, NewTransactionLine, PostedEntry, RecordId, UserId};
use tracing::info;

use crate::{validation, CoreError, UnitOfWork};

/// Validates and persists journal entries together with their lines.
pub struct JournalService;

impl JournalService {
    /// Posts an entry in its own unit of work.
    pub fn post(
        books: &mut Books,
        created_by: UserId,
        entry: NewJournalEntry,
        lines: &[NewTransactionLine],
    ) -> Result<PostedEntry, CoreError> {
        let mut uow = UnitOfWork::begin(books);
        let posted = Self::post_in(&mut uow, created_by, entry, lines)?;
        uow.commit();
        Ok(posted)
    }

    /// Posts an entry inside a caller-owned unit of work.
    ///
    /// Nothing is written unless every check passes. A line whose account does not
    /// exist fails the insert, and the caller's unit of work discards the header and
    /// any earlier lines when it is dropped.
    pub fn post_in(
        uow: &mut UnitOfWork<'_>,
        created_by: UserId,
        entry: NewJournalEntry,
        lines: &[NewTransactionLine],
    ) -> Result<PostedEntry, CoreError> {
        let (total, _) = validation::check_entry(uow.books(), created_by, &entry, lines)?;
        let journal_id = uow.insert_journal_entry(created_by, &entry);
        let mut stored = Vec::with_capacity(lines.len());
        for line in lines {
            stored.push(uow.insert_line(journal_id, line)?);
        }
        let header = uow
            .books()
            .journal_entries
            .get(journal_id)
            .cloned()
            .ok_or(CoreError::JournalEntryNotFound(journal_id))?;
        info!(
            journal_id,
            date = %header.entry_date,
            lines = stored.len(),
            total = %total,
            "journal entry posted"
        );
        Ok(PostedEntry {
            entry: header,
            lines: stored,
        })
    }

    /// Checks an entry without writing anything.
    pub fn validate(
        books: &Books,
        created_by: UserId,
        entry: &NewJournalEntry,
        lines: &[NewTransactionLine],
    ) -> Result<(), CoreError> {
        validation::check_entry(books, created_by, entry, lines).map(|_| ())
    }

    /// Every entry with its lines, newest entry date first.
    pub fn entries(books: &Books) -> Vec<PostedEntry> {
        let mut headers: Vec<_> = books.journal_entries.iter().collect();
        headers.sort_by(|a, b| b.entry_date.cmp(&a.entry_date).then(b.id.cmp(&a.id)));
        headers
            .into_iter()
            .filter_map(|header| books.journal_entry(header.id))
            .collect()
    }

    pub fn entry(books: &Books, id: RecordId) -> Result<PostedEntry, CoreError> {
        books
            .journal_entry(id)
            .ok_or(CoreError::JournalEntryNotFound(id))
    }
}
