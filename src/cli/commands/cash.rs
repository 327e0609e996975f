use akhra_core::BalanceService;
use akhra_domain::NewCashBookEntry;

use crate::cli::{
    commands::subcommand,
    context::ShellContext,
    error::{CommandError, CommandResult},
    output,
    parse::parse_amount,
    registry::CommandEntry,
    table::{Table, TableColumn, TableRenderer},
};

const USAGE: &str = "cash <add|list|balance|check> [args]";
const ADD_USAGE: &str = "cash add <date> <receipt|payment> <amount> [description]";

const SUBCOMMAND_USAGES: &[&str] = &[
    ADD_USAGE,
    "cash list",
    "cash balance",
    "cash check",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "cash",
        "Record cash book movements and check the running balance",
        USAGE,
        cmd_cash,
    )
    .with_usages(SUBCOMMAND_USAGES)]
}

fn cmd_cash(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = subcommand(args, USAGE)?;
    match action.as_str() {
        "add" => handle_add(context, rest),
        "list" => handle_list(context),
        "balance" => handle_balance(context),
        "check" => handle_check(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown cash subcommand `{other}`"
        ))),
    }
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [date, kind, amount, description @ ..] = args else {
        return Err(CommandError::usage(ADD_USAGE));
    };
    let date = context.date_arg(date)?;
    let amount = parse_amount(amount)?;
    let mut entry = match kind.to_ascii_lowercase().as_str() {
        "receipt" | "in" => NewCashBookEntry::receipt(date, amount),
        "payment" | "out" => NewCashBookEntry::payment(date, amount),
        _ => return Err(CommandError::usage(ADD_USAGE)),
    };
    if !description.is_empty() {
        entry = entry.with_description(description.join(" "));
    }
    let stored = context.manager.append_cash_entry(entry)?;
    output::success(format!(
        "Cash book entry #{} recorded. Balance {}.",
        stored.id,
        output::amount(stored.balance)
    ));
    Ok(())
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let books = context.books()?;
    let rows = BalanceService::cash_book(books);
    if rows.is_empty() {
        output::info("The cash book is empty.");
        return Ok(());
    }
    let mut table = Table::new(
        Some("Cash book"),
        vec![
            TableColumn::new("Id", 4),
            TableColumn::new("Date", 10),
            TableColumn::new("Description", 24),
            TableColumn::numeric("Debit", 10),
            TableColumn::numeric("Credit", 10),
            TableColumn::numeric("Balance", 12),
        ],
    );
    for row in rows {
        table.add_row(vec![
            row.id.to_string(),
            row.entry_date.to_string(),
            row.description.clone().unwrap_or_default(),
            output::optional_amount(row.debit),
            output::optional_amount(row.credit),
            output::amount(row.balance),
        ]);
    }
    TableRenderer::render(&table);
    Ok(())
}

fn handle_balance(context: &mut ShellContext) -> CommandResult {
    let balance = BalanceService::cash_balance(context.books()?);
    output::info(format!(
        "Cash balance: {} {}",
        output::amount(balance),
        context.config.currency
    ));
    Ok(())
}

fn handle_check(context: &mut ShellContext) -> CommandResult {
    let drift = BalanceService::replay_cash_book(context.books()?);
    if drift.is_empty() {
        output::success("Cash book balances are consistent.");
        return Ok(());
    }
    for row in drift {
        output::warning(format!(
            "Entry #{} on {} stores {} but replays to {}.",
            row.entry_id,
            row.entry_date,
            output::amount(row.stored),
            output::amount(row.expected)
        ));
    }
    Ok(())
}
