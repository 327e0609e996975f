use akhra_core::{AccountService, JournalService};
use akhra_domain::{NewJournalEntry, NewTransactionLine, PostedEntry};

use crate::cli::{
    commands::subcommand,
    context::ShellContext,
    error::{CommandError, CommandResult},
    output,
    parse::{optional_text, parse_amount, parse_id, Side},
    registry::CommandEntry,
    table::{Table, TableColumn, TableRenderer},
};

const USAGE: &str = "journal <post|check|list|show> [args]";
const POST_USAGE: &str = "journal post <date> <narration|-> (<account> <dr|cr> <amount>)...";

const SUBCOMMAND_USAGES: &[&str] = &[
    POST_USAGE,
    "journal check <date> <narration|-> (<account> <dr|cr> <amount>)...",
    "journal list [from to]",
    "journal show <id>",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "journal",
        "Post balanced journal entries and review them",
        USAGE,
        cmd_journal,
    )
    .with_usages(SUBCOMMAND_USAGES)]
}

fn cmd_journal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = subcommand(args, USAGE)?;
    match action.as_str() {
        "post" => handle_post(context, rest, false),
        "check" => handle_post(context, rest, true),
        "list" => handle_list(context, rest),
        "show" => handle_show(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown journal subcommand `{other}`"
        ))),
    }
}

/// Parses `<date> <narration> (<account> <side> <amount>)...` into an entry and its lines.
fn parse_entry(
    context: &ShellContext,
    args: &[&str],
) -> Result<(NewJournalEntry, Vec<NewTransactionLine>), CommandError> {
    let [date, narration, lines @ ..] = args else {
        return Err(CommandError::usage(POST_USAGE));
    };
    if lines.is_empty() || lines.len() % 3 != 0 {
        return Err(CommandError::usage(POST_USAGE));
    }
    let books = context.books()?;
    let mut entry = NewJournalEntry::new(context.date_arg(date)?);
    if let Some(text) = optional_text(Some(*narration)) {
        entry = entry.with_narration(text);
    }
    let lines = lines
        .chunks_exact(3)
        .map(|chunk| -> Result<NewTransactionLine, CommandError> {
            let account = AccountService::resolve(books, chunk[0])?;
            let amount = parse_amount(chunk[2])?;
            Ok(match chunk[1].parse::<Side>()? {
                Side::Debit => NewTransactionLine::debit(account.id, amount),
                Side::Credit => NewTransactionLine::credit(account.id, amount),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((entry, lines))
}

fn handle_post(context: &mut ShellContext, args: &[&str], dry_run: bool) -> CommandResult {
    context.books()?;
    let operator = context.operator_id()?;
    let (entry, lines) = parse_entry(context, args)?;
    if dry_run {
        JournalService::validate(context.books()?, operator, &entry, &lines)?;
        output::success("Entry is balanced and can be posted.");
        return Ok(());
    }
    let posted = context.manager.post_journal_entry(operator, entry, &lines)?;
    output::success(format!(
        "Journal entry #{} posted ({} lines, {}).",
        posted.entry.id,
        posted.lines.len(),
        output::amount(posted.total_debits())
    ));
    Ok(())
}

fn handle_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let range = match args {
        [] => None,
        [from, to] => Some((context.date_arg(from)?, context.date_arg(to)?)),
        _ => return Err(CommandError::usage("journal list [from to]")),
    };
    let entries: Vec<PostedEntry> = JournalService::entries(context.books()?)
        .into_iter()
        .filter(|posted| {
            range.map_or(true, |(from, to)| {
                posted.entry.entry_date >= from && posted.entry.entry_date <= to
            })
        })
        .collect();
    if entries.is_empty() {
        output::info("No journal entries.");
        return Ok(());
    }
    let mut table = Table::new(
        Some("Journal"),
        vec![
            TableColumn::new("Id", 4),
            TableColumn::new("Date", 10),
            TableColumn::new("Narration", 30),
            TableColumn::new("Lines", 5),
            TableColumn::numeric("Amount", 12),
        ],
    );
    for posted in entries {
        table.add_row(vec![
            format!("#{}", posted.entry.id),
            posted.entry.entry_date.to_string(),
            posted.entry.narration.clone().unwrap_or_default(),
            posted.lines.len().to_string(),
            output::amount(posted.total_debits()),
        ]);
    }
    TableRenderer::render(&table);
    Ok(())
}

fn handle_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(CommandError::usage("journal show <id>"));
    };
    let books = context.books()?;
    let posted = JournalService::entry(books, parse_id("journal", id)?)?;
    let created_by = books
        .user(posted.entry.created_by)
        .map(|user| user.user_name.clone())
        .unwrap_or_else(|| posted.entry.created_by.to_string());

    output::section(format!("Journal entry #{}", posted.entry.id));
    output::two_column(&[
        ("Date", posted.entry.entry_date.to_string()),
        (
            "Narration",
            posted.entry.narration.clone().unwrap_or_else(|| "-".into()),
        ),
        ("Created by", created_by),
    ]);
    let mut table = Table::new(
        None::<String>,
        vec![
            TableColumn::new("Account", 20),
            TableColumn::numeric("Debit", 12),
            TableColumn::numeric("Credit", 12),
        ],
    );
    for line in &posted.lines {
        let account = books
            .account(line.account_id)
            .map(|account| account.name.clone())
            .unwrap_or_else(|| format!("#{}", line.account_id));
        table.add_row(vec![
            account,
            output::amount(line.debit_amount),
            output::amount(line.credit_amount),
        ]);
    }
    table.add_row(vec![
        "Total".to_string(),
        output::amount(posted.total_debits()),
        output::amount(posted.total_credits()),
    ]);
    TableRenderer::render(&table);
    Ok(())
}
