pub mod maintenance;
pub mod report;
pub mod system;

use crate::cli::context::CommandError;
use crate::cli::registry::CommandRegistry;

pub(crate) fn build_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    for entry in report::definitions()
        .into_iter()
        .chain(maintenance::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
    registry
}

fn too_many(args: &[&str], max: usize, usage: &str) -> Result<(), CommandError> {
    if args.len() > max {
        return Err(CommandError::InvalidArguments(format!("usage: {usage}")));
    }
    Ok(())
}

