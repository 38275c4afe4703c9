pub mod commands;
pub mod context;
mod help;
pub mod output;
pub mod registry;
mod shell;

use once_cell::sync::Lazy;

pub use context::{CliContext, CommandError, CommandResult};
pub use registry::CommandRegistry;
pub use shell::{run_cli, SCRIPT_ENV};

static REGISTRY: Lazy<CommandRegistry> = Lazy::new(commands::build_registry);

/// Every command the report CLI understands.
pub fn command_registry() -> &'static CommandRegistry {
    &REGISTRY
}
