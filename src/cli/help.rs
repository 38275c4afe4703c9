use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub fn print_overview(registry: &CommandRegistry) {
    output::section("Available commands");
    for entry in registry.list() {
        output::info(format!("  {:<14} {}", entry.name, entry.description));
    }
    output::info("Use `help <command>` for details. Add `--snapshot <name>` to pick a building.");
}

pub fn print_command(entry: &CommandEntry) {
    output::section(format!("Help: {}", entry.name));
    output::info(format!("  Description: {}", entry.description));
    output::info(format!("  Usage: {}", entry.usage));
}

/// Unknown-command warning plus the closest known name, if any.
pub fn print_unknown(registry: &CommandRegistry, input: &str) {
    output::warning(format!(
        "Unknown command `{input}`. Type `help` to see available commands."
    ));
    if let Some(best) = registry.suggest(input) {
        output::info(format!("Suggestion: `{best}`?"));
    }
}
