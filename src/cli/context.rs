//! Shared runtime state for CLI interactions and command execution.

use std::path::PathBuf;

use akhra_config::{resolve_base_dir, Config, ConfigManager};
use akhra_core::time::Clock;
use akhra_domain::{Books, UserId};
use akhra_storage_json::{JsonBookStorage, StoragePaths};
use chrono::NaiveDate;
use dialoguer::Confirm;

use super::{
    commands,
    error::{CliError, CommandError, LoopControl},
    output,
    parse::parse_date,
    registry::{CommandEntry, CommandRegistry},
    shell::parse_command_line,
    system_clock::SystemClock,
};
use crate::manager::{BookManager, LoadReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Signed-in operator. Journal entries and vouchers are created in their name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    pub id: UserId,
    pub user_name: String,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: BookManager,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub clock: Box<dyn Clock>,
    pub operator: Option<Operator>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, resolve_base_dir())
    }

    /// Builds a shell whose config, books and backups all live under `base`.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        if mode == CliMode::Script || !config.ui_color_enabled {
            output::set_color(false);
        }

        let paths = StoragePaths {
            book_root: config.resolve_book_root(&base),
            backup_root: config.resolve_backup_root(&base),
        };
        let storage = JsonBookStorage::with_retention(paths, config.backup_retention)?;

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let mut app = ShellContext {
            mode,
            registry,
            manager: BookManager::new(Box::new(storage)),
            config_manager,
            config,
            clock: Box::new(SystemClock),
            operator: None,
            last_command: None,
            running: true,
        };
        app.auto_load_last()?;
        Ok(app)
    }

    pub fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn books(&self) -> Result<&Books, CommandError> {
        Ok(self.manager.books()?)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// `today` or a `YYYY-MM-DD` date.
    pub fn date_arg(&self, input: &str) -> Result<NaiveDate, CommandError> {
        if input.eq_ignore_ascii_case("today") {
            Ok(self.today())
        } else {
            parse_date(input)
        }
    }

    pub fn operator_id(&self) -> Result<UserId, CommandError> {
        self.operator
            .as_ref()
            .map(|operator| operator.id)
            .ok_or(CommandError::NotSignedIn)
    }

    /// Signs `user_name` in against the open books and remembers them in the config.
    pub fn sign_in(&mut self, user_name: &str) -> Result<&Operator, CommandError> {
        let user = self
            .books()?
            .user_by_name(user_name)
            .filter(|user| user.is_active)
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!("no active user named `{user_name}`"))
            })?;
        let operator = Operator {
            id: user.user_id(),
            user_name: user.user_name.clone(),
        };
        self.config.operator = Some(operator.user_name.clone());
        self.persist_config()?;
        Ok(self.operator.insert(operator))
    }

    pub fn sign_out(&mut self) -> Result<Option<Operator>, CommandError> {
        self.config.operator = None;
        self.persist_config()?;
        Ok(self.operator.take())
    }

    pub fn persist_config(&self) -> Result<(), CommandError> {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    /// Records which books to reopen at the next start.
    pub fn remember_book(&mut self, name: Option<&str>) -> Result<(), CommandError> {
        self.config.last_opened_book = name.map(str::to_string);
        self.persist_config()
    }

    /// Reports load warnings and re-establishes the remembered operator.
    pub fn after_load(&mut self, report: &LoadReport) {
        for warning in &report.warnings {
            output::warning(warning);
        }
        self.restore_operator();
    }

    /// Signs the remembered operator back in if the open books know them.
    pub fn restore_operator(&mut self) {
        self.operator = None;
        let remembered = self.config.operator.clone();
        let restored = remembered.as_deref().and_then(|name| {
            let user = self.manager.books().ok()?.user_by_name(name)?;
            user.is_active.then(|| Operator {
                id: user.user_id(),
                user_name: user.user_name.clone(),
            })
        });
        self.operator = restored;
    }

    fn auto_load_last(&mut self) -> Result<(), CliError> {
        let Some(name) = self.config.last_opened_book.clone() else {
            return Ok(());
        };
        match self.manager.load(&name) {
            Ok(report) => {
                output::info(format!("Loaded books `{name}`."));
                self.after_load(&report);
            }
            Err(err) => {
                output::warning(format!("Could not reopen `{name}`: {err}"));
                self.config.last_opened_book = None;
                self.config_manager.save(&self.config)?;
            }
        }
        Ok(())
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn prompt(&self) -> String {
        let books = self.manager.current_name().unwrap_or("no books");
        match &self.operator {
            Some(operator) => format!("akhra[{books}] {}> ", operator.user_name),
            None => format!("akhra[{books}]> "),
        }
    }

    /// Tokenizes and runs one input line.
    pub fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };
        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        if raw.starts_with('#') {
            return Ok(LoopControl::Continue);
        }

        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.last_command = Some(line.trim().to_string());

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = self.registry.suggest(input) {
            output::info(format!("Did you mean `{best}`?"));
        }
    }

    /// Asks before destructive steps in interactive mode; scripts always proceed.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|err| CommandError::Message(err.to_string()))
    }

    pub(crate) fn confirm_exit(&self) -> bool {
        self.confirm("Exit shell?").unwrap_or(true)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::BooksNotLoaded => {
                output::error(&err);
                output::hint("Try `book new \"Community Fund\"` to get started.");
            }
            CommandError::NotSignedIn => {
                output::error(&err);
                output::hint("The seeded operator is `admin`.");
            }
            other => output::error(other),
        }
    }
}

#[cfg(test)]
pub(crate) fn process_script(base: PathBuf, lines: &[&str]) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::with_base_dir(CliMode::Script, base)?;
    for line in lines {
        match app.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => app.report_error(err),
        }
    }
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use akhra_core::BalanceService;
    use akhra_domain::{ADMIN_USER_ID, CASH_ACCOUNT_ID};
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    #[test]
    fn scripted_posting_updates_balances() {
        let dir = tempdir().expect("tempdir");
        let app = process_script(
            dir.path().to_path_buf(),
            &[
                "book new \"Community Fund\"",
                "login admin",
                "journal post 2024-01-05 \"January fees\" Cash dr 100 \"Member Fees\" cr 100",
            ],
        )
        .expect("script");

        let books = app.books().expect("books");
        assert_eq!(BalanceService::account_balance(books, CASH_ACCOUNT_ID), dec!(100));
        assert_eq!(app.operator_id().ok(), Some(ADMIN_USER_ID));
        assert_eq!(app.config.last_opened_book.as_deref(), Some("Community Fund"));
    }

    #[test]
    fn last_book_and_operator_are_restored() {
        let dir = tempdir().expect("tempdir");
        process_script(
            dir.path().to_path_buf(),
            &["book new Fund", "login admin", "cash add 2024-02-01 receipt 500"],
        )
        .expect("first session");

        let app = ShellContext::with_base_dir(CliMode::Script, dir.path().to_path_buf())
            .expect("second session");
        assert_eq!(app.manager.current_name(), Some("Fund"));
        assert_eq!(
            app.operator.as_ref().map(|op| op.user_name.as_str()),
            Some("admin")
        );
        let books = app.books().expect("books");
        assert_eq!(BalanceService::cash_balance(books), dec!(500));
    }

    #[test]
    fn posting_requires_a_signed_in_operator() {
        let dir = tempdir().expect("tempdir");
        let mut app = process_script(dir.path().to_path_buf(), &["book new Fund"]).expect("script");
        let err = app
            .process_line("journal post 2024-01-05 - Cash dr 10 Bank cr 10")
            .unwrap_err();
        assert!(matches!(err, CommandError::NotSignedIn));
        assert!(app.books().expect("books").journal_entries.is_empty());
    }

    #[test]
    fn exit_stops_the_loop() {
        let dir = tempdir().expect("tempdir");
        let mut app =
            ShellContext::with_base_dir(CliMode::Script, dir.path().to_path_buf()).expect("shell");
        assert_eq!(app.process_line("exit").ok(), Some(LoopControl::Exit));
        assert!(!app.running);
        assert_eq!(app.process_line("# comment").ok(), Some(LoopControl::Continue));
    }
}
