use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use akhra_core::{
    storage::{BookBackupInfo, BookStorage},
    BalanceService, CoreError,
};
use akhra_domain::{Books, CURRENT_SCHEMA_VERSION};
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

const FILE_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Directories the JSON backend reads from and writes to.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub book_root: PathBuf,
    pub backup_root: PathBuf,
}

/// Filesystem-backed JSON persistence for books and their backups.
#[derive(Clone)]
pub struct JsonBookStorage {
    paths: StoragePaths,
    retention: usize,
}

impl JsonBookStorage {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&paths.book_root)?;
        fs::create_dir_all(&paths.backup_root)?;
        Ok(Self {
            paths,
            retention: retention.max(1),
        })
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    pub fn book_path(&self, name: &str) -> PathBuf {
        self.paths
            .book_root
            .join(format!("{}.{}", canonical_name(name), FILE_EXTENSION))
    }

    /// Loads every stored book and summarizes it, ordered by display name.
    pub fn list_book_metadata(&self) -> Result<Vec<BookMetadata>, CoreError> {
        let mut entries = Vec::new();
        for slug in self.list_books()? {
            let books = self.load_books(&slug)?;
            entries.push(BookMetadata {
                path: self.book_path(&slug),
                slug,
                name: books.name.clone(),
                created_at: books.created_at,
                updated_at: books.updated_at,
                account_count: books.accounts.count(),
                journal_entry_count: books.journal_entries.count(),
                member_count: books.members.count(),
                cash_balance: BalanceService::cash_balance(&books),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.paths.backup_root.join(canonical_name(name))
    }

    fn next_backup_path(&self, name: &str, note: Option<&str>) -> Result<(PathBuf, String), CoreError> {
        let dir = self.backup_dir(name);
        fs::create_dir_all(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut stem = format!("{}_{}", canonical_name(name), timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        Ok((dir.join(format!("{stem}.{FILE_EXTENSION}")), timestamp))
    }

    /// Copies the current file aside before it is overwritten.
    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<(), CoreError> {
        if !path.exists() {
            return Ok(());
        }
        let (backup_path, _) = self.next_backup_path(name, None)?;
        fs::copy(path, &backup_path)?;
        debug!(path = %backup_path.display(), "previous book file backed up");
        self.prune_backups(name, BackupKind::Plain)
    }

    /// Keeps the newest `retention` backups of one kind, so the plain copies taken
    /// on every save never push out a backup that carries a note.
    fn prune_backups(&self, name: &str, kind: BackupKind) -> Result<(), CoreError> {
        let entries = self
            .list_backups(name)?
            .into_iter()
            .filter(|entry| BackupKind::of(&entry.id) == kind);
        for entry in entries.skip(self.retention) {
            debug!(path = %entry.path.display(), "pruning backup");
            let _ = fs::remove_file(entry.path);
        }
        Ok(())
    }
}

impl BookStorage for JsonBookStorage {
    fn save_books(&self, name: &str, books: &Books) -> Result<(), CoreError> {
        let path = self.book_path(name);
        self.backup_existing_file(name, &path)?;
        save_books_to_path(books, &path)
    }

    fn load_books(&self, name: &str) -> Result<Books, CoreError> {
        let path = self.book_path(name);
        if !path.exists() {
            return Err(CoreError::BooksNotFound(name.to_string()));
        }
        load_books_from_path(&path)
    }

    fn list_books(&self) -> Result<Vec<String>, CoreError> {
        if !self.paths.book_root.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.paths.book_root)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete_books(&self, name: &str) -> Result<(), CoreError> {
        let path = self.book_path(name);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn save_books_to_path(&self, books: &Books, path: &Path) -> Result<(), CoreError> {
        if path.starts_with(&self.paths.book_root) {
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                self.backup_existing_file(stem, path)?;
            }
        }
        save_books_to_path(books, path)
    }

    fn load_books_from_path(&self, path: &Path) -> Result<Books, CoreError> {
        load_books_from_path(path)
    }

    fn backup_books(
        &self,
        name: &str,
        books: &Books,
        note: Option<&str>,
    ) -> Result<BookBackupInfo, CoreError> {
        let (path, timestamp) = self.next_backup_path(name, note)?;
        write_atomic(&path, &serialize_books(books)?)?;
        let id = path
            .file_name()
            .and_then(|file| file.to_str())
            .unwrap_or_default()
            .to_string();
        self.prune_backups(name, BackupKind::of(&id))?;
        Ok(BookBackupInfo {
            books: canonical_name(name),
            id,
            created_at: timestamp,
            path,
        })
    }

    fn list_backups(&self, name: &str) -> Result<Vec<BookBackupInfo>, CoreError> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let slug = canonical_name(name);
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(BookBackupInfo {
                    books: slug.clone(),
                    id: file_name.to_string(),
                    created_at: file_name.to_string(),
                    path: path.clone(),
                });
            }
        }
        entries.sort_by(|a, b| {
            parse_backup_timestamp(&b.id)
                .cmp(&parse_backup_timestamp(&a.id))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(entries)
    }

    fn restore_backup(&self, backup: &BookBackupInfo) -> Result<Books, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!(
                "backup `{}` not found",
                backup.id
            )));
        }
        let restored = load_books_from_path(&backup.path)?;
        let target = self.book_path(&backup.books);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&backup.path, &target)?;
        Ok(restored)
    }
}

/// Saves books to an arbitrary path, staging through a temporary file.
pub fn save_books_to_path(books: &Books, path: &Path) -> Result<(), CoreError> {
    let tmp = tmp_path(path);
    write_atomic(&tmp, &serialize_books(books)?)?;
    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), "books saved");
    Ok(())
}

/// Loads books from the provided path, refusing documents from a newer schema.
pub fn load_books_from_path(path: &Path) -> Result<Books, CoreError> {
    let data = fs::read_to_string(path)?;
    let books: Books =
        serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))?;
    if books.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(CoreError::Storage(format!(
            "`{}` uses schema version {} but this build reads up to {}",
            path.display(),
            books.schema_version,
            CURRENT_SCHEMA_VERSION
        )));
    }
    debug!(path = %path.display(), "books loaded");
    Ok(books)
}

#[derive(Debug, Clone)]
pub struct BookMetadata {
    pub slug: String,
    pub name: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub account_count: usize,
    pub journal_entry_count: usize,
    pub member_count: usize,
    pub cash_balance: Decimal,
}

/// File-system slug for a book name: lowercase alphanumerics, everything else `_`.
pub fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "books".into()
    } else {
        sanitized
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackupKind {
    /// `<slug>_<YYYYMMDD>_<HHMM>.json`, as written on every save.
    Plain,
    /// `<slug>_<YYYYMMDD>_<HHMM>_<note>.json`.
    Noted,
}

impl BackupKind {
    /// Notes never contain `_`, so only plain names end on the timestamp pair.
    fn of(file_name: &str) -> Self {
        let stem = file_name
            .strip_suffix(&format!(".{FILE_EXTENSION}"))
            .unwrap_or(file_name);
        let mut tail = stem.rsplit('_');
        match (tail.next(), tail.next()) {
            (Some(time), Some(date)) if is_digits(date, 8) && is_digits(time, 4) => {
                BackupKind::Plain
            }
            _ => BackupKind::Noted,
        }
    }
}

/// Reads the `YYYYMMDD_HHMM` pair that follows the slug in a backup file name.
fn parse_backup_timestamp(file_name: &str) -> Option<DateTime<Utc>> {
    let stem = file_name.strip_suffix(&format!(".{FILE_EXTENSION}"))?;
    let segments: Vec<&str> = stem.split('_').collect();
    segments.windows(2).rev().find_map(|pair| {
        let (date, time) = (pair[0], pair[1]);
        if !is_digits(date, 8) || !is_digits(time, 4) {
            return None;
        }
        NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M")
            .ok()
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
    })
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

fn serialize_books(books: &Books) -> Result<String, CoreError> {
    serde_json::to_string_pretty(books).map_err(|err| CoreError::Serde(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_slugs_names() {
        assert_eq!(canonical_name("  Akhra Books 2024 "), "akhra_books_2024");
        assert_eq!(canonical_name("***"), "books");
    }

    #[test]
    fn backup_notes_are_sanitized() {
        assert_eq!(
            sanitize_backup_note(Some("Before year-end close!")),
            Some("before-year-end-close".to_string())
        );
        assert_eq!(sanitize_backup_note(Some("  ")), None);
        assert_eq!(sanitize_backup_note(None), None);
    }

    #[test]
    fn backup_timestamp_survives_notes_and_underscored_slugs() {
        let parsed = parse_backup_timestamp("club_funds_20240105_0930_pre-close.json")
            .expect("timestamp");
        assert_eq!(parsed.format("%Y-%m-%d %H:%M").to_string(), "2024-01-05 09:30");
        assert!(parse_backup_timestamp("club_funds.json").is_none());
    }

    #[test]
    fn backup_kind_follows_the_note_segment() {
        assert_eq!(BackupKind::of("club_funds_20240105_0930.json"), BackupKind::Plain);
        assert_eq!(
            BackupKind::of("club_funds_20240105_0930_pre-close.json"),
            BackupKind::Noted
        );
        assert_eq!(BackupKind::of("club_20240105_0930_2024.json"), BackupKind::Noted);
    }

    #[test]
    fn tmp_path_appends_suffix() {
        let tmp = tmp_path(Path::new("/data/books.json"));
        assert_eq!(tmp, PathBuf::from("/data/books.json.tmp"));
    }
}
