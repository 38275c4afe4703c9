use std::io::{self, BufRead};

use shell_words::split;
use tracing::debug;

use crate::cli::context::{CliContext, CommandError};
use crate::cli::{command_registry, help, output};
use crate::errors::AppError;

/// When set, commands are read line by line from stdin.
pub const SCRIPT_ENV: &str = "VAAD_LEDGER_CLI_SCRIPT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CliMode {
    OneShot,
    Script,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Invocation {
    snapshot: Option<String>,
    words: Vec<String>,
}

/// Entry point for the binary. `args` excludes the program name.
pub fn run_cli(args: impl IntoIterator<Item = String>) -> Result<(), AppError> {
    let invocation = parse_invocation(args)?;
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::OneShot
    };

    let mut context = CliContext::from_env(invocation.snapshot)?;
    output::set_color_enabled(context.config.ui_color_enabled);
    debug!(?mode, "starting cli");

    match mode {
        CliMode::Script => run_script(&mut context),
        CliMode::OneShot if invocation.words.is_empty() => {
            help::print_overview(command_registry());
            Ok(())
        }
        CliMode::OneShot => {
            let words: Vec<&str> = invocation.words.iter().map(String::as_str).collect();
            match dispatch(&mut context, &words) {
                Ok(()) | Err(CommandError::ExitRequested) => Ok(()),
                Err(CommandError::App(err)) => Err(err),
                Err(CommandError::InvalidArguments(message)) => Err(AppError::Input(message)),
            }
        }
    }
}

/// Pulls `--snapshot <name>` / `--snapshot=<name>` out of the argument list.
fn parse_invocation(args: impl IntoIterator<Item = String>) -> Result<Invocation, AppError> {
    let mut invocation = Invocation::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--snapshot" {
            let name = args
                .next()
                .ok_or_else(|| AppError::input("--snapshot needs a name"))?;
            invocation.snapshot = Some(name);
        } else if let Some(name) = arg.strip_prefix("--snapshot=") {
            invocation.snapshot = Some(name.to_string());
        } else {
            invocation.words.push(arg);
        }
    }
    Ok(invocation)
}

fn run_script(context: &mut CliContext) -> Result<(), AppError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line.map_err(|err| AppError::Core(err.into()))?;
        let tokens = match split(&line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                continue;
            }
        };
        if tokens.is_empty() || tokens[0].starts_with('#') {
            continue;
        }
        let words: Vec<&str> = tokens.iter().map(String::as_str).collect();
        match dispatch(context, &words) {
            Ok(()) => {}
            Err(CommandError::ExitRequested) => context.running = false,
            Err(err) => report_error(&err),
        }
    }
    Ok(())
}

fn dispatch(context: &mut CliContext, words: &[&str]) -> Result<(), CommandError> {
    let Some((raw, args)) = words.split_first() else {
        return Ok(());
    };
    let registry = command_registry();
    let name = raw.to_lowercase();
    match registry.get(&name) {
        Some(entry) => {
            debug!(command = entry.name, args = args.len(), "dispatching");
            (entry.handler)(context, args)
        }
        None => {
            help::print_unknown(registry, raw);
            Err(CommandError::InvalidArguments(format!("unknown command `{raw}`")))
        }
    }
}

fn report_error(err: &CommandError) {
    match err {
        CommandError::App(app) => output::error(app.user_message()),
        other => output::error(other),
    }
}
