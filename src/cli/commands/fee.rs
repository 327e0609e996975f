use akhra_core::FeeService;
use akhra_domain::{Fee, NewFee};

use crate::cli::{
    commands::subcommand,
    context::ShellContext,
    error::{CommandError, CommandResult},
    output,
    parse::{optional_text, parse_amount, parse_id, parse_year},
    registry::CommandEntry,
    table::{Table, TableColumn, TableRenderer},
};

const USAGE: &str = "fee <record|pay|list|pending|total> [args]";

const SUBCOMMAND_USAGES: &[&str] = &[
    "fee record <member-id> <month> <year> <amount>",
    "fee pay <fee-id> <date> [receipt-number]",
    "fee list [member-id]",
    "fee pending",
    "fee total [month] <year>",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "fee",
        "Record monthly member fees and their payment",
        USAGE,
        cmd_fee,
    )
    .with_usages(SUBCOMMAND_USAGES)]
}

fn cmd_fee(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = subcommand(args, USAGE)?;
    match action.as_str() {
        "record" => handle_record(context, rest),
        "pay" => handle_pay(context, rest),
        "list" => handle_list(context, rest),
        "pending" => {
            let fees = FeeService::pending(context.books()?);
            render(context, "Pending fees", fees)
        }
        "total" => handle_total(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown fee subcommand `{other}`"
        ))),
    }
}

fn handle_record(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [member, month, year, amount] = args else {
        return Err(CommandError::usage(
            "fee record <member-id> <month> <year> <amount>",
        ));
    };
    let month: u32 = month
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid month `{month}`")))?;
    let fee = NewFee::monthly(
        parse_id("member", member)?,
        month,
        parse_year(year)?,
        parse_amount(amount)?,
    );
    let stored = context.manager.record_fee(fee)?;
    output::success(format!("Fee #{} recorded.", stored.id));
    Ok(())
}

fn handle_pay(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [fee, date, receipt @ ..] = args else {
        return Err(CommandError::usage("fee pay <fee-id> <date> [receipt-number]"));
    };
    let fee_id = parse_id("fee", fee)?;
    let date = context.date_arg(date)?;
    context
        .manager
        .mark_fee_paid(fee_id, date, optional_text(receipt.first().copied()))?;
    output::success(format!("Fee #{fee_id} marked paid on {date}."));
    Ok(())
}

fn handle_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let books = context.books()?;
    let fees = match args {
        [] => books.fees.iter().collect(),
        [member] => FeeService::by_member(books, parse_id("member", member)?),
        _ => return Err(CommandError::usage("fee list [member-id]")),
    };
    render(context, "Fees", fees)
}

fn handle_total(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let books = context.books()?;
    let (label, total) = match args {
        [year] => {
            let year = parse_year(year)?;
            (year.to_string(), FeeService::total_collected(books, year))
        }
        [month, year] => {
            let month: u32 = month
                .parse()
                .map_err(|_| CommandError::InvalidArguments(format!("invalid month `{month}`")))?;
            let year = parse_year(year)?;
            (
                format!("{year}-{month:02}"),
                FeeService::total_collected_in_month(books, month, year),
            )
        }
        _ => return Err(CommandError::usage("fee total [month] <year>")),
    };
    output::info(format!("Fees collected in {label}: {}", output::amount(total)));
    Ok(())
}

fn render(context: &ShellContext, title: &str, fees: Vec<&Fee>) -> CommandResult {
    if fees.is_empty() {
        output::info("No fees found.");
        return Ok(());
    }
    let books = context.books()?;
    let mut table = Table::new(
        Some(title),
        vec![
            TableColumn::new("Id", 4),
            TableColumn::new("Member", 20),
            TableColumn::new("Period", 7),
            TableColumn::numeric("Amount", 10),
            TableColumn::new("Paid", 10),
            TableColumn::new("Receipt", 10),
        ],
    );
    for fee in fees {
        let member = books
            .members
            .get(fee.member_id)
            .map(|member| member.full_name.clone())
            .unwrap_or_else(|| format!("#{}", fee.member_id));
        let period = match (fee.fee_month, fee.fee_year) {
            (Some(month), Some(year)) => format!("{year}-{month:02}"),
            _ => "-".into(),
        };
        table.add_row(vec![
            fee.id.to_string(),
            member,
            period,
            output::optional_amount(fee.amount),
            fee.paid_date
                .map(|date| date.to_string())
                .unwrap_or_else(|| "unpaid".into()),
            fee.receipt_number.clone().unwrap_or_default(),
        ]);
    }
    TableRenderer::render(&table);
    Ok(())
}
