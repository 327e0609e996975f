pub mod account;
pub mod book;
pub mod cash;
pub mod config;
pub mod event;
pub mod fee;
pub mod journal;
pub mod login;
pub mod medicaid;
pub mod member;
pub mod report;
pub mod system;
pub mod voucher;

use crate::cli::registry::{CommandEntry, CommandRegistry};

const ROOT_COMMAND_ORDER: &[&str] = &[
    "book", "login", "logout", "account", "journal", "cash", "voucher", "member", "fee", "event",
    "medicaid", "report", "config", "help", "version", "exit",
];

pub(crate) fn all_entries() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(book::definitions());
    commands.extend(login::definitions());
    commands.extend(account::definitions());
    commands.extend(journal::definitions());
    commands.extend(cash::definitions());
    commands.extend(voucher::definitions());
    commands.extend(member::definitions());
    commands.extend(fee::definitions());
    commands.extend(event::definitions());
    commands.extend(medicaid::definitions());
    commands.extend(report::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let mut entries = all_entries();
    entries.sort_by_key(|entry| {
        ROOT_COMMAND_ORDER
            .iter()
            .position(|name| entry.name.eq_ignore_ascii_case(name))
            .unwrap_or(ROOT_COMMAND_ORDER.len())
    });
    for entry in entries {
        registry.register(entry);
    }
}

/// Splits `args` into the subcommand and its arguments, or fails with `usage`.
pub(crate) fn subcommand<'a>(
    args: &'a [&'a str],
    usage: &str,
) -> Result<(String, &'a [&'a str]), crate::cli::CommandError> {
    match args.split_first() {
        Some((action, rest)) => Ok((action.to_lowercase(), rest)),
        None => Err(crate::cli::CommandError::usage(usage)),
    }
}
