use vaad_ledger::{cli::output, cli::run_cli, init};

fn main() {
    init();

    if let Err(err) = run_cli(std::env::args().skip(1)) {
        tracing::debug!(error = %err, "command failed");
        output::error(err.user_message());
        std::process::exit(1);
    }
}
