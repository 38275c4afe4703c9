use uuid::Uuid;
use vaad_core::{public_api::api_upcoming_maintenance, MaintenanceService};
use vaad_domain::{PeriodicMaintenance, UPCOMING_WINDOW_DAYS};

use super::too_many;
use crate::cli::context::{parse_date, CliContext, CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "maintenance",
            "Maintenance tasks with their due status",
            "maintenance [YYYY-MM-DD]",
            cmd_maintenance,
        ),
        CommandEntry::new(
            "performed",
            "Record a task as done and schedule the next one",
            "performed <task-id> [YYYY-MM-DD]",
            cmd_performed,
        ),
        CommandEntry::new("pause", "Deactivate a task", "pause <task-id>", cmd_pause),
        CommandEntry::new("resume", "Reactivate a task", "resume <task-id>", cmd_resume),
    ]
}

/// Accepts a full id or an unambiguous prefix of one.
fn resolve_task_id(tasks: &[PeriodicMaintenance], raw: &str) -> Result<Uuid, CommandError> {
    if let Ok(id) = Uuid::parse_str(raw) {
        return Ok(id);
    }
    let needle = raw.trim().to_lowercase();
    let matches: Vec<Uuid> = tasks
        .iter()
        .map(|task| task.id)
        .filter(|id| !needle.is_empty() && id.to_string().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(CommandError::InvalidArguments(format!("no task matches `{raw}`"))),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{raw}` matches several tasks"
        ))),
    }
}

fn cmd_maintenance(context: &mut CliContext, args: &[&str]) -> CommandResult {
    too_many(args, 1, "maintenance [YYYY-MM-DD]")?;
    let now = match args.first() {
        Some(raw) => parse_date(raw)?,
        None => context.today(),
    };
    let reader = context.reader()?;
    let views = MaintenanceService::list(&reader, now)?;
    let upcoming = api_upcoming_maintenance(&reader, now)?;

    output::section(format!("Maintenance ({})", context.date(now)));
    if views.is_empty() {
        output::info("No maintenance tasks.");
        return Ok(());
    }
    for view in &views {
        let id = view.task.id.to_string();
        let line = format!(
            "{}  {}  {}  [{}]",
            context.date(view.task.next_due),
            view.task.frequency,
            view.status,
            &id[..8]
        );
        if view.is_upcoming {
            output::warning(format!("{}: {line}", view.task.title));
        } else {
            output::row(&view.task.title, line);
        }
    }
    output::row(format!("Due within {UPCOMING_WINDOW_DAYS} days"), upcoming.len());
    Ok(())
}

fn cmd_performed(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let usage = "performed <task-id> [YYYY-MM-DD]";
    too_many(args, 2, usage)?;
    let Some(raw_id) = args.first() else {
        return Err(CommandError::InvalidArguments(format!("usage: {usage}")));
    };
    let now = match args.get(1) {
        Some(raw) => parse_date(raw)?,
        None => context.today(),
    };

    let mut snapshot = context.load_snapshot()?;
    let id = resolve_task_id(&snapshot.maintenance, raw_id)?;
    let task = MaintenanceService::mark_as_performed(&mut snapshot.maintenance, id, now)?;
    let message = format!(
        "{} performed on {}; next due {}",
        task.title,
        context.date(now),
        context.date(task.next_due)
    );
    context.save_snapshot(&mut snapshot, "maintenance")?;
    output::success(message);
    Ok(())
}

fn set_active(context: &mut CliContext, args: &[&str], active: bool) -> CommandResult {
    let usage = if active { "resume <task-id>" } else { "pause <task-id>" };
    let [raw_id] = args else {
        return Err(CommandError::InvalidArguments(format!("usage: {usage}")));
    };
    let mut snapshot = context.load_snapshot()?;
    let id = resolve_task_id(&snapshot.maintenance, raw_id)?;
    if !MaintenanceService::set_active(&mut snapshot.maintenance, id, active)? {
        output::info("Nothing to change.");
        return Ok(());
    }
    context.save_snapshot(&mut snapshot, "maintenance")?;
    output::success(if active { "Task resumed." } else { "Task paused." });
    Ok(())
}

fn cmd_pause(context: &mut CliContext, args: &[&str]) -> CommandResult {
    set_active(context, args, false)
}

fn cmd_resume(context: &mut CliContext, args: &[&str]) -> CommandResult {
    set_active(context, args, true)
}
