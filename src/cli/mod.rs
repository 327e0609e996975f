pub mod commands;
pub mod context;
pub mod error;
pub mod output;
pub mod parse;
pub mod registry;
pub mod shell;
pub mod system_clock;
pub mod table;

pub use context::{CliMode, ShellContext};
pub use error::{CliError, CommandError, CommandResult, LoopControl};
pub use shell::run_cli;
