use akhra_core::{BalanceService, CoreError, ReportService, SummaryService};
use akhra_domain::DateRange;

use crate::cli::{
    commands::subcommand,
    context::ShellContext,
    error::{CommandError, CommandResult},
    output,
    parse::parse_year,
    registry::CommandEntry,
    table::{Table, TableColumn, TableRenderer},
};

const USAGE: &str = "report <trial|income|month|ledger|dashboard> [args]";

const INCOME_USAGE: &str = "report income <from> <to> | <year>";
const LEDGER_USAGE: &str = "report ledger <from> <to> | <year>";

const SUBCOMMAND_USAGES: &[&str] = &[
    "report trial",
    INCOME_USAGE,
    "report month",
    LEDGER_USAGE,
    "report dashboard",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "report",
        "Trial balance, income statement and dashboard figures",
        USAGE,
        cmd_report,
    )
    .with_usages(SUBCOMMAND_USAGES)]
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = subcommand(args, USAGE)?;
    match action.as_str() {
        "trial" => handle_trial(context),
        "income" => handle_income(context, rest),
        "month" => handle_month(context),
        "ledger" => handle_ledger(context, rest),
        "dashboard" => handle_dashboard(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown report subcommand `{other}`"
        ))),
    }
}

/// `<from> <to>` as given, or a single `<year>` for the whole calendar year.
fn range_arg(
    context: &ShellContext,
    args: &[&str],
    usage: &str,
) -> Result<DateRange, CommandError> {
    match args {
        [year] => {
            let year = parse_year(year)?;
            DateRange::calendar_year(year)
                .ok_or_else(|| CommandError::InvalidArguments(format!("invalid year `{year}`")))
        }
        [from, to] => DateRange::new(context.date_arg(from)?, context.date_arg(to)?)
            .map_err(|err| CoreError::from(err).into()),
        _ => Err(CommandError::usage(usage)),
    }
}

fn handle_trial(context: &mut ShellContext) -> CommandResult {
    let trial = ReportService::trial_balance(context.books()?);
    let mut table = Table::new(
        Some("Trial balance"),
        vec![
            TableColumn::new("Account", 20),
            TableColumn::new("Type", 11),
            TableColumn::numeric("Debits", 12),
            TableColumn::numeric("Credits", 12),
            TableColumn::numeric("Balance", 12),
        ],
    );
    for row in &trial.rows {
        table.add_row(vec![
            row.account_name.clone(),
            row.account_type.to_string(),
            output::amount(row.debits),
            output::amount(row.credits),
            output::amount(row.balance),
        ]);
    }
    table.add_row(vec![
        "Total".to_string(),
        String::new(),
        output::amount(trial.total_debits),
        output::amount(trial.total_credits),
        output::amount(trial.total_debits - trial.total_credits),
    ]);
    TableRenderer::render(&table);
    if trial.is_balanced() {
        output::success("Trial balance agrees.");
    } else {
        output::warning("Trial balance does not agree.");
    }
    Ok(())
}

fn handle_income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let range = range_arg(context, args, INCOME_USAGE)?;
    let statement = ReportService::income_statement(context.books()?, range);
    output::section(format!("Income statement {}", statement.range));
    output::two_column(&[
        ("Income", output::amount(statement.total_income)),
        ("Expense", output::amount(statement.total_expense)),
        ("Net income", output::amount(statement.net_income())),
    ]);
    Ok(())
}

fn handle_month(context: &mut ShellContext) -> CommandResult {
    let mtd = ReportService::month_to_date(context.books()?, context.today());
    output::section(format!("Month to date {}", mtd.statement.range));
    output::two_column(&[
        ("Income", output::amount(mtd.statement.total_income)),
        ("Expense", output::amount(mtd.statement.total_expense)),
        ("Net income", output::amount(mtd.statement.net_income())),
        ("Cash balance", output::amount(mtd.cash_balance)),
    ]);
    Ok(())
}

fn handle_ledger(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let range = range_arg(context, args, LEDGER_USAGE)?;
    let rows = BalanceService::transactions_in_range(context.books()?, range);
    if rows.is_empty() {
        output::info(format!("No transactions between {range}."));
        return Ok(());
    }
    let mut table = Table::new(
        Some(format!("Transactions {range}")),
        vec![
            TableColumn::new("Date", 10),
            TableColumn::new("Entry", 5),
            TableColumn::new("Account", 18),
            TableColumn::new("Narration", 24),
            TableColumn::numeric("Debit", 10),
            TableColumn::numeric("Credit", 10),
        ],
    );
    for row in rows {
        table.add_row(vec![
            row.entry_date.to_string(),
            format!("#{}", row.journal_id),
            row.account_name,
            row.narration.unwrap_or_default(),
            output::amount(row.debit),
            output::amount(row.credit),
        ]);
    }
    TableRenderer::render(&table);
    Ok(())
}

fn handle_dashboard(context: &mut ShellContext) -> CommandResult {
    let summary = SummaryService::dashboard(context.books()?, context.clock.as_ref());
    output::section(format!("Dashboard as of {}", summary.as_of));
    output::two_column(&[
        (
            "Members",
            format!("{} ({} active)", summary.total_members, summary.active_members),
        ),
        (
            "Fees this year",
            output::amount(summary.fees_collected_this_year),
        ),
        ("Pending fees", summary.pending_fees.to_string()),
        ("Upcoming events", summary.upcoming_events.to_string()),
        (
            "Event budget",
            output::amount(summary.event_budget_this_year),
        ),
        (
            "Pending medicaid",
            summary.pending_medicaid_requests.to_string(),
        ),
        (
            "Medicaid approved",
            output::amount(summary.total_medicaid_approved),
        ),
        ("Cash balance", output::amount(summary.cash_balance)),
        ("Month income", output::amount(summary.month_income)),
        ("Month expense", output::amount(summary.month_expense)),
        ("Month net", output::amount(summary.month_net)),
    ]);
    Ok(())
}
