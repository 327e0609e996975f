use akhra_core::{AccountService, BalanceService};

use crate::cli::{
    commands::subcommand,
    context::ShellContext,
    error::{CommandError, CommandResult},
    output,
    registry::CommandEntry,
    table::{Table, TableColumn, TableRenderer},
};

const USAGE: &str = "account <list|show> [account]";

const SUBCOMMAND_USAGES: &[&str] = &[
    "account list",
    "account show <id|name>",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "account",
        "Inspect the chart of accounts and account ledgers",
        USAGE,
        cmd_account,
    )
    .with_usages(SUBCOMMAND_USAGES)]
}

fn cmd_account(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = subcommand(args, USAGE)?;
    match action.as_str() {
        "list" => handle_list(context),
        "show" => handle_show(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown account subcommand `{other}`"
        ))),
    }
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let books = context.books()?;
    let mut table = Table::new(
        Some("Chart of accounts"),
        vec![
            TableColumn::new("Id", 3),
            TableColumn::new("Name", 20),
            TableColumn::new("Type", 11),
            TableColumn::new("Cash", 4),
            TableColumn::numeric("Balance", 12),
        ],
    );
    for account in AccountService::chart(books) {
        table.add_row(vec![
            account.id.to_string(),
            account.name.clone(),
            account.account_type.to_string(),
            if account.is_cash_account { "yes" } else { "" }.to_string(),
            output::amount(BalanceService::account_balance(books, account.id)),
        ]);
    }
    TableRenderer::render(&table);
    Ok(())
}

fn handle_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::usage("account show <id|name>"));
    }
    let books = context.books()?;
    let account = AccountService::resolve(books, &args.join(" "))?;
    let totals = BalanceService::account_totals(books, account.id);

    output::section(format!("{} ({})", account.name, account.account_type));
    output::two_column(&[
        ("Debits", output::amount(totals.debits)),
        ("Credits", output::amount(totals.credits)),
        ("Balance", output::amount(totals.balance())),
    ]);

    let rows = BalanceService::transactions_by_account(books, account.id);
    if rows.is_empty() {
        output::info("No transactions posted.");
        return Ok(());
    }
    let mut table = Table::new(
        None::<String>,
        vec![
            TableColumn::new("Date", 10),
            TableColumn::new("Entry", 5),
            TableColumn::new("Narration", 24),
            TableColumn::numeric("Debit", 10),
            TableColumn::numeric("Credit", 10),
        ],
    );
    for row in rows {
        table.add_row(vec![
            row.entry_date.to_string(),
            format!("#{}", row.journal_id),
            row.narration.unwrap_or_default(),
            output::amount(row.debit),
            output::amount(row.credit),
        ]);
    }
    TableRenderer::render(&table);
    Ok(())
}
