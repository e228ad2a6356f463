use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::Parser;
use protocol_mirror_cli::{Cli, Status, run, telemetry};

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = telemetry::init_tracing(cli.verbose) {
        eprintln!("warning: {err}");
    }

    let color = cli.color.enabled(io::stderr().is_terminal());
    let stdout = io::stdout();
    let stderr = io::stderr();
    match run(&cli, color, &mut stdout.lock(), &mut stderr.lock()) {
        Ok(status) => status.into(),
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("error: {err:#}");
            Status::Failure.into()
        }
    }
}
