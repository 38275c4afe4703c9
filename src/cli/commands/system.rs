use vaad_core::storage::SnapshotStorage;

use super::too_many;
use crate::cli::context::{CliContext, CommandError, CommandResult};
use crate::cli::registry::CommandEntry;
use crate::cli::{command_registry, help, output};
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "snapshots",
            "List stored building snapshots",
            "snapshots",
            cmd_snapshots,
        ),
        CommandEntry::new(
            "backup",
            "Back up the selected snapshot",
            "backup [note]",
            cmd_backup,
        ),
        CommandEntry::new(
            "backups",
            "List backups of the selected snapshot",
            "backups",
            cmd_backups,
        ),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Stop reading a command script", "exit", cmd_exit),
    ]
}

fn cmd_snapshots(context: &mut CliContext, args: &[&str]) -> CommandResult {
    too_many(args, 0, "snapshots")?;
    let rows = context.storage().list_snapshot_metadata()?;
    output::section("Snapshots");
    if rows.is_empty() {
        output::info("No snapshots stored yet.");
    }
    for row in rows {
        output::row(
            &row.slug,
            format!(
                "{}  {} residents, {} records, updated {}",
                row.building,
                row.resident_count,
                row.record_count,
                context.date(row.updated_at.date_naive())
            ),
        );
    }
    Ok(())
}

fn cmd_backup(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let note = (!args.is_empty()).then(|| args.join(" "));
    let name = context.snapshot_name()?;
    let snapshot = context.load_snapshot()?;
    let info = context
        .storage()
        .backup_snapshot(&name, &snapshot, note.as_deref())?;
    output::success(format!("Backup written: {}", info.id));
    Ok(())
}

fn cmd_backups(context: &mut CliContext, args: &[&str]) -> CommandResult {
    too_many(args, 0, "backups")?;
    let name = context.snapshot_name()?;
    let backups = context.storage().list_backups(&name)?;
    output::section(format!("Backups of {name}"));
    if backups.is_empty() {
        output::info("No backups yet.");
    }
    for backup in backups {
        output::row(&backup.id, backup.created_at);
    }
    Ok(())
}

fn cmd_version(_context: &mut CliContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Vaad Ledger {}", meta.short()));
    for (label, value) in meta.rows() {
        output::row(label, value);
    }
    Ok(())
}

fn cmd_help(_context: &mut CliContext, args: &[&str]) -> CommandResult {
    let registry = command_registry();
    match args.first() {
        Some(name) => match registry.get(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => help::print_unknown(registry, name),
        },
        None => help::print_overview(registry),
    }
    Ok(())
}

fn cmd_exit(_context: &mut CliContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
