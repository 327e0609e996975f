use std::{
    borrow::Cow,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use thiserror::Error;
use tracing::{debug, info};

use super::{
    context::{CliMode, ShellContext},
    error::{CliError, LoopControl},
    output,
    registry::CommandEntry,
};
use crate::utils::build_info;

/// Set to run commands from stdin without a line editor.
pub const SCRIPT_ENV_VAR: &str = "AKHRA_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV_VAR).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::from_entries(context.registry.list())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output::section(format!("Akhra Books {}", build_info::current().version));
    match context.manager.current_name() {
        Some(name) => output::info(format!("Working on `{name}`. Type `help` to list commands.")),
        None => output::hint("No books open. Start with `book new <name>` or `book load <name>`."),
    }

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                if run_line(context, trimmed) == Some(LoopControl::Exit) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit() {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

/// Runs one command per stdin line. A failing command is reported and the
/// script carries on with the next line.
fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    let mut executed = 0usize;
    let mut failed = 0usize;
    for (index, line) in stdin.lock().lines().enumerate() {
        if !context.running {
            break;
        }
        let line = line?;
        debug!(line = index + 1, input = %line.trim(), "script line");
        executed += 1;
        match run_line(context, &line) {
            Some(LoopControl::Exit) => break,
            Some(LoopControl::Continue) => {}
            None => failed += 1,
        }
    }
    info!(executed, failed, "script finished");
    Ok(())
}

/// `None` when the command failed; the error has already been reported.
fn run_line(context: &mut ShellContext, line: &str) -> Option<LoopControl> {
    match context.process_line(line) {
        Ok(control) => Some(control),
        Err(err) => {
            context.report_error(err);
            None
        }
    }
}

/// Completes command names and the subcommand word listed in each usage line.
struct CommandHelper {
    commands: Vec<(String, Vec<String>)>,
}

impl CommandHelper {
    fn from_entries(entries: Vec<&CommandEntry>) -> Self {
        let mut commands: Vec<(String, Vec<String>)> = entries
            .into_iter()
            .map(|entry| (entry.name.to_ascii_lowercase(), subcommands_of(entry.usage)))
            .collect();
        commands.sort_by(|a, b| a.0.cmp(&b.0));
        commands.dedup_by(|a, b| a.0 == b.0);
        Self { commands }
    }

    fn candidates(&self, words: &[&str], needle: &str) -> Vec<String> {
        let pool: Vec<&String> = match words {
            [] => self.commands.iter().map(|(name, _)| name).collect(),
            [command] => self
                .commands
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(command))
                .map(|(_, subs)| subs.iter().collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        pool.into_iter()
            .filter(|word| word.starts_with(needle))
            .cloned()
            .collect()
    }
}

/// `book <new|load|list> [args]` yields `new`, `load` and `list`.
fn subcommands_of(usage: &str) -> Vec<String> {
    let Some(open) = usage.find('<') else {
        return Vec::new();
    };
    let Some(close) = usage[open..].find('>') else {
        return Vec::new();
    };
    let group = &usage[open + 1..open + close];
    if !group.contains('|') {
        return Vec::new();
    }
    group.split('|').map(str::to_string).collect()
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let words: Vec<&str> = prefix[..start].split_whitespace().collect();
        let needle = prefix[start..].to_ascii_lowercase();
        let candidates = self
            .candidates(&words, &needle)
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

/// Input that could not be split into words, such as an unterminated quote.
#[derive(Debug, Error)]
#[error("could not read input: {0}")]
pub(crate) struct ParseError(String);

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    shell_words::split(input).map_err(|err| ParseError(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{commands, registry::CommandRegistry};

    fn helper() -> CommandHelper {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        CommandHelper::from_entries(registry.list())
    }

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = parse_command_line("journal post 2024-01-05 \"Member Fees\" cr 10")
            .expect("tokens");
        assert_eq!(tokens[3], "Member Fees");
        let err = parse_command_line("book new \"unterminated").unwrap_err();
        assert!(err.to_string().starts_with("could not read input"));
    }

    #[test]
    fn usage_groups_become_subcommands() {
        assert_eq!(
            subcommands_of("cash <add|list|balance|check> [args]"),
            vec!["add", "list", "balance", "check"]
        );
        assert!(subcommands_of("login [user]").is_empty());
        assert!(subcommands_of("journal show <id>").is_empty());
    }

    #[test]
    fn completion_covers_commands_then_subcommands() {
        let helper = helper();
        assert_eq!(helper.candidates(&[], "me"), vec!["medicaid", "member"]);
        assert_eq!(helper.candidates(&["medicaid"], "re"), vec!["reject"]);
        assert!(helper.candidates(&["medicaid", "approve"], "").is_empty());
    }
}
