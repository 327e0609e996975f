use akhra_core::MedicaidService;
use akhra_domain::MedicaidStatus;

use crate::cli::{
    commands::subcommand,
    context::ShellContext,
    error::{CommandError, CommandResult},
    output,
    parse::{optional_text, parse_amount, parse_enum, parse_id},
    registry::CommandEntry,
    table::{Table, TableColumn, TableRenderer},
};

const USAGE: &str = "medicaid <submit|approve|reject|list|totals> [args]";

const SUBCOMMAND_USAGES: &[&str] = &[
    "medicaid submit <member-id> <date> [amount|-] [description]",
    "medicaid approve <id> <amount>",
    "medicaid reject <id>",
    "medicaid list [pending|approved|rejected]",
    "medicaid totals",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "medicaid",
        "Track Medicaid assistance requests from submission to decision",
        USAGE,
        cmd_medicaid,
    )
    .with_usages(SUBCOMMAND_USAGES)]
}

fn cmd_medicaid(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = subcommand(args, USAGE)?;
    match action.as_str() {
        "submit" => handle_submit(context, rest),
        "approve" => handle_approve(context, rest),
        "reject" => handle_reject(context, rest),
        "list" => handle_list(context, rest),
        "totals" => handle_totals(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown medicaid subcommand `{other}`"
        ))),
    }
}

fn handle_submit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [member, date, rest @ ..] = args else {
        return Err(CommandError::usage(
            "medicaid submit <member-id> <date> [amount|-] [description]",
        ));
    };
    let amount = match optional_text(rest.first().copied()) {
        Some(amount) => Some(parse_amount(&amount)?),
        None => None,
    };
    let description = rest
        .get(1..)
        .filter(|words| !words.is_empty())
        .map(|words| words.join(" "));
    let member_id = parse_id("member", member)?;
    let request_date = context.date_arg(date)?;
    let stored = context
        .manager
        .submit_medicaid_request(member_id, request_date, amount, description)?;
    output::success(format!(
        "Medicaid request #{} submitted ({}).",
        stored.id, stored.status
    ));
    Ok(())
}

fn handle_approve(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id, amount] = args else {
        return Err(CommandError::usage("medicaid approve <id> <amount>"));
    };
    let request_id = parse_id("request", id)?;
    if context
        .manager
        .approve_medicaid_request(request_id, parse_amount(amount)?)?
    {
        output::success(format!("Medicaid request #{request_id} approved."));
    } else {
        output::warning(format!("No medicaid request #{request_id}."));
    }
    Ok(())
}

fn handle_reject(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(CommandError::usage("medicaid reject <id>"));
    };
    let request_id = parse_id("request", id)?;
    if context.manager.reject_medicaid_request(request_id)? {
        output::success(format!("Medicaid request #{request_id} rejected."));
    } else {
        output::warning(format!("No medicaid request #{request_id}."));
    }
    Ok(())
}

fn handle_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let books = context.books()?;
    let requests = match args.first() {
        Some(status) => MedicaidService::by_status(books, parse_enum::<MedicaidStatus>(status)?),
        None => {
            let mut all: Vec<_> = books.medicaid_requests.iter().collect();
            all.sort_by(|a, b| (b.request_date, b.id).cmp(&(a.request_date, a.id)));
            all
        }
    };
    if requests.is_empty() {
        output::info("No medicaid requests.");
        return Ok(());
    }
    let mut table = Table::new(
        Some("Medicaid requests"),
        vec![
            TableColumn::new("Id", 4),
            TableColumn::new("Member", 20),
            TableColumn::new("Date", 10),
            TableColumn::numeric("Requested", 10),
            TableColumn::numeric("Approved", 10),
            TableColumn::new("Status", 8),
        ],
    );
    for request in requests {
        let member = books
            .members
            .get(request.member_id)
            .map(|member| member.full_name.clone())
            .unwrap_or_else(|| format!("#{}", request.member_id));
        table.add_row(vec![
            request.id.to_string(),
            member,
            request.request_date.to_string(),
            output::optional_amount(request.amount_requested),
            output::optional_amount(request.approved_amount),
            request.status.to_string(),
        ]);
    }
    TableRenderer::render(&table);
    Ok(())
}

fn handle_totals(context: &mut ShellContext) -> CommandResult {
    let books = context.books()?;
    output::two_column(&[
        ("Requested", output::amount(MedicaidService::total_requested(books))),
        ("Approved", output::amount(MedicaidService::total_approved(books))),
        ("Pending", MedicaidService::pending(books).len().to_string()),
    ]);
    Ok(())
}
