use clap::Parser;
use docai_lib::cli::{exit_status_for, run_cli, Cli};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "docai_lib=debug,docai=info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> ExitCode {
    // .env has to be in the environment before clap resolves `env = ...` args.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run_cli(cli) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("Error: {}", err);
            exit_status_for(&err).into()
        }
    }
}
