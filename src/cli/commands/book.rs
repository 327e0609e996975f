use std::path::Path;

use akhra_core::{storage::book_warnings, BalanceService};

use crate::cli::{
    commands::subcommand,
    context::ShellContext,
    error::{CommandError, CommandResult},
    output,
    registry::CommandEntry,
    table::{Table, TableColumn, TableRenderer},
};

const USAGE: &str =
    "book <new|load|list|info|save|export|import|backup|backups|restore|check|close> [args]";

const SUBCOMMAND_USAGES: &[&str] = &[
    "book new <name>",
    "book load <name>",
    "book list",
    "book info",
    "book save [name]",
    "book export <path>",
    "book import <path>",
    "book backup [note]",
    "book backups",
    "book restore <backup-id>",
    "book check",
    "book close",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "book",
        "Create, open, save and back up books",
        USAGE,
        cmd_book,
    )
    .with_usages(SUBCOMMAND_USAGES)]
}

fn cmd_book(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = subcommand(args, USAGE)?;
    match action.as_str() {
        "new" => handle_new(context, rest),
        "load" | "open" => handle_load(context, rest),
        "list" => handle_list(context),
        "info" => handle_info(context),
        "save" => handle_save(context, rest),
        "export" => handle_export(context, rest),
        "import" => handle_import(context, rest),
        "backup" => handle_backup(context, rest),
        "backups" => handle_backups(context),
        "restore" => handle_restore(context, rest),
        "check" => handle_check(context),
        "close" => handle_close(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown book subcommand `{other}`"
        ))),
    }
}

fn handle_new(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = args.join(" ");
    if name.trim().is_empty() {
        return Err(CommandError::usage("book new <name>"));
    }
    let accounts = context.manager.create(&name)?.accounts.count();
    context.remember_book(Some(name.trim()))?;
    context.restore_operator();
    output::success(format!(
        "New books `{}` created with {accounts} accounts.",
        name.trim()
    ));
    Ok(())
}

fn handle_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = args.join(" ");
    if name.trim().is_empty() {
        return Err(CommandError::usage("book load <name>"));
    }
    let report = context.manager.load(name.trim())?;
    context.remember_book(Some(name.trim()))?;
    context.after_load(&report);
    output::success(format!("Loaded books `{}`.", name.trim()));
    Ok(())
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let names = context.manager.list_books()?;
    if names.is_empty() {
        output::info("No books saved yet.");
        return Ok(());
    }
    let current = context
        .manager
        .current_name()
        .map(akhra_storage_json::canonical_name);
    for name in names {
        let marker = if current.as_deref() == Some(name.as_str()) {
            "*"
        } else {
            " "
        };
        output::info(format!("{marker} {name}"));
    }
    Ok(())
}

fn handle_info(context: &mut ShellContext) -> CommandResult {
    let books = context.books()?;
    let location = match (context.manager.current_name(), context.manager.current_path()) {
        (Some(name), _) => format!("stored as `{name}`"),
        (None, Some(path)) => path.display().to_string(),
        (None, None) => "unsaved".into(),
    };
    output::section(&books.name);
    output::two_column(&[
        ("Id", books.id.to_string()),
        ("Location", location),
        ("Schema", format!("v{}", books.schema_version)),
        ("Created", books.created_at.to_rfc3339()),
        ("Updated", books.updated_at.to_rfc3339()),
        ("Accounts", books.accounts.count().to_string()),
        ("Journal entries", books.journal_entries.count().to_string()),
        ("Cash book rows", books.cash_book.count().to_string()),
        ("Vouchers", books.vouchers.count().to_string()),
        ("Members", books.members.count().to_string()),
        (
            "Cash balance",
            output::amount(BalanceService::cash_balance(books)),
        ),
    ]);
    Ok(())
}

fn handle_save(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        context.manager.save()?;
        output::success("Books saved.");
        return Ok(());
    }
    let name = args.join(" ");
    context.manager.save_as(&name)?;
    context.remember_book(Some(&name))?;
    output::success(format!("Books saved as `{name}`."));
    Ok(())
}

fn handle_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [path] = args else {
        return Err(CommandError::usage("book export <path>"));
    };
    context.manager.save_to_path(Path::new(path))?;
    output::success(format!("Books exported to {path}."));
    Ok(())
}

fn handle_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [path] = args else {
        return Err(CommandError::usage("book import <path>"));
    };
    let report = context.manager.load_from_path(Path::new(path))?;
    context.remember_book(None)?;
    context.after_load(&report);
    output::success(format!("Imported books `{}` from {path}.", report.name));
    Ok(())
}

fn handle_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = (!args.is_empty()).then(|| args.join(" "));
    let backup = context.manager.backup(note.as_deref())?;
    output::success(format!("Backup created: {}", backup.id));
    Ok(())
}

fn handle_backups(context: &mut ShellContext) -> CommandResult {
    let backups = context.manager.list_backups()?;
    if backups.is_empty() {
        output::info("No backups yet.");
        return Ok(());
    }
    let mut table = Table::new(
        Some("Backups"),
        vec![TableColumn::new("Id", 30), TableColumn::new("Created", 20)],
    );
    for backup in backups {
        table.add_row(vec![backup.id, backup.created_at]);
    }
    TableRenderer::render(&table);
    Ok(())
}

fn handle_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [backup_id] = args else {
        return Err(CommandError::usage("book restore <backup-id>"));
    };
    if !context.confirm(&format!("Replace the current books with {backup_id}?"))? {
        output::info("Restore cancelled.");
        return Ok(());
    }
    let report = context.manager.restore_backup(backup_id)?;
    context.after_load(&report);
    output::success(format!("Restored {backup_id}."));
    Ok(())
}

fn handle_check(context: &mut ShellContext) -> CommandResult {
    let warnings = book_warnings(context.books()?);
    if warnings.is_empty() {
        output::success("No problems found.");
    }
    for warning in warnings {
        output::warning(warning);
    }
    Ok(())
}

fn handle_close(context: &mut ShellContext) -> CommandResult {
    context.manager.close();
    context.operator = None;
    context.remember_book(None)?;
    output::info("Books closed.");
    Ok(())
}
