use akhra_core::MemberService;
use akhra_domain::NewMember;

use crate::cli::{
    commands::subcommand,
    context::ShellContext,
    error::{CommandError, CommandResult},
    output,
    parse::{parse_id, take_option},
    registry::CommandEntry,
    table::{Table, TableColumn, TableRenderer},
};

const USAGE: &str = "member <add|list|show|remove|activate|deactivate> [args]";
const ADD_USAGE: &str = "member add <name> <join-date> [--email <email>] [--mobile <mobile>]";

const SUBCOMMAND_USAGES: &[&str] = &[
    ADD_USAGE,
    "member list [search]",
    "member show <id>",
    "member remove <id>",
    "member <activate|deactivate> <id>",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "member",
        "Maintain the member register",
        USAGE,
        cmd_member,
    )
    .with_usages(SUBCOMMAND_USAGES)]
}

fn cmd_member(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = subcommand(args, USAGE)?;
    match action.as_str() {
        "add" => handle_add(context, rest),
        "list" => handle_list(context, rest),
        "show" => handle_show(context, rest),
        "remove" => handle_remove(context, rest),
        "activate" => handle_set_active(context, rest, true),
        "deactivate" => handle_set_active(context, rest, false),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown member subcommand `{other}`"
        ))),
    }
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (email, args) = take_option(args, "--email")?;
    let (mobile, args) = take_option(&args, "--mobile")?;
    let [name, join_date] = args.as_slice() else {
        return Err(CommandError::usage(ADD_USAGE));
    };
    let mut member = NewMember::new(*name, context.date_arg(join_date)?);
    if let Some(email) = email {
        member = member.with_email(email);
    }
    if let Some(mobile) = mobile {
        member = member.with_mobile(mobile);
    }
    let stored = context.manager.add_member(member)?;
    output::success(format!("Member #{} `{}` added.", stored.id, stored.full_name));
    Ok(())
}

fn handle_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let books = context.books()?;
    let members = MemberService::search(books, &args.join(" "));
    if members.is_empty() {
        output::info("No members found.");
        return Ok(());
    }
    let mut table = Table::new(
        Some("Members"),
        vec![
            TableColumn::new("Id", 4),
            TableColumn::new("Name", 24),
            TableColumn::new("Joined", 10),
            TableColumn::new("Active", 6),
            TableColumn::new("Email", 20),
        ],
    );
    for member in members {
        table.add_row(vec![
            member.id.to_string(),
            member.full_name.clone(),
            member.join_date.to_string(),
            if member.is_active { "yes" } else { "no" }.to_string(),
            member.email.clone().unwrap_or_default(),
        ]);
    }
    TableRenderer::render(&table);
    Ok(())
}

fn handle_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(CommandError::usage("member show <id>"));
    };
    let details = MemberService::details(context.books()?, parse_id("member", id)?)?;
    let member = &details.member;
    output::section(format!("Member #{} {}", member.id, member.full_name));
    output::two_column(&[
        ("Joined", member.join_date.to_string()),
        ("Active", member.is_active.to_string()),
        ("Email", member.email.clone().unwrap_or_else(|| "-".into())),
        ("Mobile", member.mobile.clone().unwrap_or_else(|| "-".into())),
        ("Fees", details.fees.len().to_string()),
        (
            "Unpaid fees",
            details.fees.iter().filter(|fee| !fee.is_paid()).count().to_string(),
        ),
        ("Medicaid requests", details.medicaid_requests.len().to_string()),
        ("Vouchers", details.vouchers.len().to_string()),
    ]);
    Ok(())
}

fn handle_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(CommandError::usage("member remove <id>"));
    };
    let member_id = parse_id("member", id)?;
    if !context.confirm(&format!("Remove member #{member_id}?"))? {
        output::info("Member kept.");
        return Ok(());
    }
    context.manager.remove_member(member_id)?;
    output::success(format!("Member #{member_id} removed."));
    Ok(())
}

fn handle_set_active(context: &mut ShellContext, args: &[&str], active: bool) -> CommandResult {
    let [id] = args else {
        return Err(CommandError::usage("member <activate|deactivate> <id>"));
    };
    let member_id = parse_id("member", id)?;
    context.manager.set_member_active(member_id, active)?;
    let state = if active { "active" } else { "inactive" };
    output::success(format!("Member #{member_id} is now {state}."));
    Ok(())
}
