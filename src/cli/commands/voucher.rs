use akhra_core::{AccountService, VoucherService};
use akhra_domain::{NewVoucher, VoucherType};

use crate::cli::{
    commands::subcommand,
    context::ShellContext,
    error::{CommandError, CommandResult},
    output,
    parse::{parse_amount, parse_enum, parse_id, take_option},
    registry::CommandEntry,
    table::{Table, TableColumn, TableRenderer},
};

const USAGE: &str = "voucher <receipt|payment|list> [args]";
const ISSUE_USAGE: &str =
    "voucher <receipt|payment> <date> <account> <amount> [--member <id>] [--cash <account>] [remarks]";

const SUBCOMMAND_USAGES: &[&str] = &[
    ISSUE_USAGE,
    "voucher list [receipt|payment]",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "voucher",
        "Issue receipt and payment vouchers against the cash account",
        USAGE,
        cmd_voucher,
    )
    .with_usages(SUBCOMMAND_USAGES)]
}

fn cmd_voucher(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = subcommand(args, USAGE)?;
    match action.as_str() {
        "receipt" => handle_issue(context, VoucherType::Receipt, rest),
        "payment" => handle_issue(context, VoucherType::Payment, rest),
        "list" => handle_list(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown voucher subcommand `{other}`"
        ))),
    }
}

fn handle_issue(context: &mut ShellContext, kind: VoucherType, args: &[&str]) -> CommandResult {
    let (member, args) = take_option(args, "--member")?;
    let (cash, args) = take_option(&args, "--cash")?;
    let [date, account, amount, remarks @ ..] = args.as_slice() else {
        return Err(CommandError::usage(ISSUE_USAGE));
    };
    context.books()?;
    let operator = context.operator_id()?;

    let books = context.books()?;
    let account_id = AccountService::resolve(books, account)?.id;
    let date = context.date_arg(date)?;
    let amount = parse_amount(amount)?;
    let mut voucher = NewVoucher::new(kind, date, account_id, amount);
    if let Some(member) = member {
        voucher = voucher.for_member(parse_id("member", member)?);
    }
    if let Some(cash) = cash {
        voucher = voucher.via_cash_account(AccountService::resolve(books, cash)?.id);
    }
    if !remarks.is_empty() {
        voucher = voucher.with_remarks(remarks.join(" "));
    }

    let issued = context.manager.issue_voucher(operator, voucher)?;
    output::success(format!(
        "{} voucher #{} issued as journal entry #{}.",
        issued.voucher.voucher_type, issued.voucher.id, issued.journal.entry.id
    ));
    Ok(())
}

fn handle_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let books = context.books()?;
    let vouchers = match args.first() {
        Some(kind) => VoucherService::by_type(books, parse_enum(kind)?),
        None => VoucherService::list(books),
    };
    if vouchers.is_empty() {
        output::info("No vouchers issued.");
        return Ok(());
    }
    let mut table = Table::new(
        Some("Vouchers"),
        vec![
            TableColumn::new("Id", 4),
            TableColumn::new("Type", 8),
            TableColumn::new("Date", 10),
            TableColumn::new("Account", 18),
            TableColumn::new("Member", 6),
            TableColumn::numeric("Amount", 12),
            TableColumn::new("Remarks", 20),
        ],
    );
    for voucher in vouchers {
        let account = books
            .account(voucher.account_id)
            .map(|account| account.name.clone())
            .unwrap_or_else(|| format!("#{}", voucher.account_id));
        table.add_row(vec![
            voucher.id.to_string(),
            voucher.voucher_type.to_string(),
            voucher.voucher_date.to_string(),
            account,
            voucher
                .member_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            output::amount(voucher.amount),
            voucher.remarks.clone().unwrap_or_default(),
        ]);
    }
    TableRenderer::render(&table);
    Ok(())
}
