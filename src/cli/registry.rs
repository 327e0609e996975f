use std::collections::HashMap;

use super::{context::ShellContext, error::CommandResult};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    /// One usage line per subcommand, listed by `help <command>`.
    pub usages: &'static [&'static str],
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            usages: &[],
            handler,
        }
    }

    pub fn with_usages(mut self, usages: &'static [&'static str]) -> Self {
        self.usages = usages;
        self
    }
}

/// Root commands by name, remembering registration order for `help`.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandEntry>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: CommandEntry) {
        let name = entry.name;
        if self.commands.insert(name, entry).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.commands.get(name)
    }

    pub fn list(&self) -> Vec<&CommandEntry> {
        self.order
            .iter()
            .filter_map(|name| self.commands.get(name))
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.commands.get(name).map(|entry| entry.handler)
    }

    /// Closest registered name within an edit distance of three.
    pub fn suggest(&self, input: &str) -> Option<&'static str> {
        let input = input.to_ascii_lowercase();
        self.names()
            .map(|name| (strsim::levenshtein(name, &input), name))
            .filter(|(distance, _)| *distance <= 3)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, name)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut ShellContext, _: &[&str]) -> CommandResult {
        Ok(())
    }

    #[test]
    fn registration_keeps_order_and_ignores_duplicates() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandEntry::new("journal", "", "", noop));
        registry.register(CommandEntry::new("cash", "", "", noop));
        registry.register(CommandEntry::new("journal", "again", "", noop));

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["journal", "cash"]);
        assert_eq!(registry.get("journal").map(|e| e.description), Some("again"));
        assert!(registry.handler("voucher").is_none());
    }

    #[test]
    fn suggestions_pick_the_nearest_name() {
        let mut registry = CommandRegistry::new();
        for name in ["journal", "report", "voucher"] {
            registry.register(CommandEntry::new(name, "", "", noop));
        }
        assert_eq!(registry.suggest("jurnal"), Some("journal"));
        assert_eq!(registry.suggest("REPROT"), Some("report"));
        assert_eq!(registry.suggest("xxxxxxxxxx"), None);
    }

    #[test]
    fn every_subcommand_group_documents_its_usages() {
        let mut registry = CommandRegistry::new();
        crate::cli::commands::register_all(&mut registry);
        for entry in registry.list() {
            if !entry.usage.contains('|') {
                continue;
            }
            assert!(!entry.usages.is_empty(), "`{}` lists no subcommand usages", entry.name);
            for line in entry.usages {
                assert!(line.starts_with(entry.name), "`{line}` belongs to `{}`", entry.name);
            }
        }
        let voucher = registry.get("voucher").expect("voucher registered");
        assert!(voucher
            .usages
            .iter()
            .any(|line| line.starts_with("voucher <receipt|payment> <date>")));
    }
}
