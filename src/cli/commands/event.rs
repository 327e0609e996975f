use akhra_core::EventService;
use akhra_domain::{Event, NewEvent};
use chrono::Datelike;

use crate::cli::{
    commands::subcommand,
    context::ShellContext,
    error::{CommandError, CommandResult},
    output,
    parse::{parse_amount, parse_id, parse_year},
    registry::CommandEntry,
    table::{Table, TableColumn, TableRenderer},
};

const USAGE: &str = "event <add|expense|list|report> [args]";

const SUBCOMMAND_USAGES: &[&str] = &[
    "event add <name> <date> [budget]",
    "event expense <id> <amount>",
    "event list [upcoming|past|over]",
    "event report [year]",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "event",
        "Plan events and compare budgets with actual expenses",
        USAGE,
        cmd_event,
    )
    .with_usages(SUBCOMMAND_USAGES)]
}

fn cmd_event(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = subcommand(args, USAGE)?;
    match action.as_str() {
        "add" => handle_add(context, rest),
        "expense" => handle_expense(context, rest),
        "list" => handle_list(context, rest),
        "report" => handle_report(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown event subcommand `{other}`"
        ))),
    }
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (name, date, budget) = match args {
        [name, date] => (name, date, None),
        [name, date, budget] => (name, date, Some(parse_amount(budget)?)),
        _ => return Err(CommandError::usage("event add <name> <date> [budget]")),
    };
    let mut event = NewEvent::new(*name, context.date_arg(date)?);
    if let Some(budget) = budget {
        event = event.with_budget(budget);
    }
    let stored = context.manager.add_event(event)?;
    output::success(format!("Event #{} `{}` added.", stored.id, stored.name));
    Ok(())
}

fn handle_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id, amount] = args else {
        return Err(CommandError::usage("event expense <id> <amount>"));
    };
    let event_id = parse_id("event", id)?;
    context
        .manager
        .record_event_expense(event_id, parse_amount(amount)?)?;
    let event = EventService::get(context.books()?, event_id)?;
    match event.budget_variance() {
        Some(variance) if event.is_over_budget() => output::warning(format!(
            "Event #{event_id} is over budget by {}.",
            output::amount(-variance)
        )),
        _ => output::success(format!("Expense recorded for event #{event_id}.")),
    }
    Ok(())
}

fn handle_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let today = context.today();
    let books = context.books()?;
    let (title, events) = match args.first().map(|arg| arg.to_ascii_lowercase()) {
        None => ("Events", books.events.iter().collect::<Vec<_>>()),
        Some(filter) if filter == "upcoming" => {
            ("Upcoming events", EventService::upcoming(books, today))
        }
        Some(filter) if filter == "past" => ("Past events", EventService::past(books, today)),
        Some(filter) if filter == "over" => ("Over budget", EventService::over_budget(books)),
        Some(_) => return Err(CommandError::usage("event list [upcoming|past|over]")),
    };
    render(title, events);
    Ok(())
}

fn handle_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let year = match args.first() {
        Some(year) => parse_year(year)?,
        None => context.today().year(),
    };
    let report = EventService::budget_report(context.books()?, year);
    output::section(format!("Event budget {year}"));
    output::two_column(&[
        ("Budget", output::amount(report.total_budget)),
        ("Expenses", output::amount(report.total_expenses)),
        ("Variance", output::amount(report.variance())),
        ("Over budget", report.over_budget.len().to_string()),
    ]);
    if !report.over_budget.is_empty() {
        render("Over budget", report.over_budget.iter().collect());
    }
    Ok(())
}

fn render(title: &str, events: Vec<&Event>) {
    if events.is_empty() {
        output::info("No events found.");
        return;
    }
    let mut table = Table::new(
        Some(title),
        vec![
            TableColumn::new("Id", 4),
            TableColumn::new("Name", 22),
            TableColumn::new("Date", 10),
            TableColumn::numeric("Budget", 10),
            TableColumn::numeric("Actual", 10),
            TableColumn::numeric("Variance", 10),
        ],
    );
    for event in events {
        table.add_row(vec![
            event.id.to_string(),
            event.name.clone(),
            event.event_date.to_string(),
            output::optional_amount(event.budget_amount),
            output::optional_amount(event.actual_expense),
            output::optional_amount(event.budget_variance()),
        ]);
    }
    TableRenderer::render(&table);
}
