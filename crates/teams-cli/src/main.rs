//! Teams CLI application
//!
//! Reads chats, channels and the activity feed of the Teams web app from the
//! terminal, for people and for scripts.
//!
//! # Credentials
//!
//! `teams login --ests-auth-persistent <cookie>` stores a session cookie and
//! the refresh token it yields in `~/.teams-cli/<profile>.json`. Every later
//! command rotates the refresh token, falls back to the cookie when the token
//! has been revoked, and writes the new token back.
//!
//! # Output
//!
//! On a terminal the commands print short summaries. With `--json`, or when
//! piped, each command prints one JSON line `{"command", "profile", "data"}`
//! and errors become `{"error": "..."}`.

mod args;
mod commands;
mod console;
mod output;
mod progress;
mod router;
mod session;

use args::Cli;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn";
const VERBOSE_LOG_FILTER: &str = "teams=debug,teams_core=debug";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    init_tracing(cli.verbose);
    let context = console::RenderContext::detect(cli.json, cli.no_color);

    let Some(command) = cli.command.as_ref() else {
        let _ = Cli::command().print_help();
        return ExitCode::FAILURE;
    };

    match router::route(&cli, command, &context).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            output::print_error(&context, &e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so stdout stays machine-readable. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
