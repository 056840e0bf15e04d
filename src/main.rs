use action_docs::cli::{failure_annotation, run, Cli};
use action_docs_core::{DocError, ExitCode};
use clap::Parser;
use std::panic;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries outputs and workflow commands.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise tracing: {e}"))?;
    tracing::info!("CLI application startup: tracing initialised, environment loaded");

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to parse CLI arguments");
            println!("{}", failure_annotation(e.to_string().trim_end()));
            process::exit(ExitCode::Validation as i32);
        }
    };
    tracing::info!("CLI arguments parsed, invoking run");

    let code = match panic::catch_unwind(|| run(cli)) {
        Ok(Ok(_)) => {
            tracing::info!("CLI completed successfully");
            ExitCode::Success as i32
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "CLI exited with error");
            println!("{}", failure_annotation(&e.to_string()));
            e.downcast_ref::<DocError>()
                .map_or(1, |doc_err| doc_err.exit_code() as i32)
        }
        Err(_) => {
            tracing::error!("Something terrible happened");
            println!("{}", failure_annotation("Something terrible happened"));
            1
        }
    };
    process::exit(code);
}
