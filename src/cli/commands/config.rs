use akhra_config::Config;

use crate::cli::{
    commands::subcommand,
    context::ShellContext,
    error::{CommandError, CommandResult},
    output,
    registry::CommandEntry,
};

const USAGE: &str = "config <show|set|backup|backups|restore> [args]";

const SUBCOMMAND_USAGES: &[&str] = &[
    "config show",
    "config set <key> <value>",
    "config backup [note]",
    "config backups",
    "config restore <backup-name>",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show and change preferences",
        USAGE,
        cmd_config,
    )
    .with_usages(SUBCOMMAND_USAGES)]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = subcommand(args, USAGE)?;
    match action.as_str() {
        "show" => handle_show(context),
        "set" => handle_set(context, rest),
        "backup" => handle_backup(context, rest),
        "backups" => handle_backups(context),
        "restore" => handle_restore(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config subcommand `{other}`"
        ))),
    }
}

fn handle_show(context: &mut ShellContext) -> CommandResult {
    let config = &context.config;
    let base = context.config_manager.base_dir();
    let optional = |value: Option<&str>| value.unwrap_or("-").to_string();
    output::section("Configuration");
    output::two_column(&[
        ("currency", config.currency.clone()),
        ("ui_color_enabled", config.ui_color_enabled.to_string()),
        ("operator", optional(config.operator.as_deref())),
        ("last_opened_book", optional(config.last_opened_book.as_deref())),
        (
            "book_root",
            config.resolve_book_root(base).display().to_string(),
        ),
        (
            "backup_root",
            config.resolve_backup_root(base).display().to_string(),
        ),
        ("backup_retention", config.backup_retention.to_string()),
    ]);
    Ok(())
}

fn handle_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [key, value @ ..] = args else {
        return Err(CommandError::InvalidArguments(format!(
            "usage: config set <key> <value> (keys: {})",
            Config::KEYS.join(", ")
        )));
    };
    context.config.set(key, &value.join(" "))?;
    context.persist_config()?;
    if *key == "ui_color_enabled" {
        output::set_color(context.config.ui_color_enabled);
    }
    if matches!(*key, "book_root" | "backup_root" | "backup_retention") {
        output::hint("Storage settings take effect the next time the shell starts.");
    }
    output::success(format!("`{key}` updated."));
    Ok(())
}

fn handle_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = (!args.is_empty()).then(|| args.join(" "));
    let name = context
        .config_manager
        .backup(&context.config, note.as_deref())?;
    output::success(format!("Configuration backup created: {name}"));
    Ok(())
}

fn handle_backups(context: &mut ShellContext) -> CommandResult {
    let names = context.config_manager.list_backups()?;
    if names.is_empty() {
        output::info("No configuration backups yet.");
    }
    for name in names {
        output::info(name);
    }
    Ok(())
}

fn handle_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name] = args else {
        return Err(CommandError::usage("config restore <backup-name>"));
    };
    let restored = context.config_manager.restore(name)?;
    context.config = restored;
    context.persist_config()?;
    output::success(format!("Configuration restored from {name}."));
    Ok(())
}
