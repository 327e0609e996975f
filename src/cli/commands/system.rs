use akhra_domain::CURRENT_SCHEMA_VERSION;

use crate::cli::{
    context::ShellContext,
    error::{CommandError, CommandResult},
    output,
    registry::CommandEntry,
    table::{Table, TableColumn, TableRenderer},
};
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Akhra Books {}", meta.version));
    let mut rows = meta.rows();
    rows.insert(1, ("Schema ver", format!("v{CURRENT_SCHEMA_VERSION}")));
    output::two_column(&rows);
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(&name.to_lowercase()) {
            Some(entry) => {
                output::section(entry.name);
                output::info(entry.description);
                output::info(format!("usage: {}", entry.usage));
                for usage in entry.usages {
                    output::info(format!("usage: {usage}"));
                }
            }
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    let mut table = Table::new(
        Some("Commands"),
        vec![TableColumn::new("Command", 10), TableColumn::new("Description", 30)],
    );
    for entry in context.registry.list() {
        table.add_row(vec![entry.name, entry.description]);
    }
    TableRenderer::render(&table);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
