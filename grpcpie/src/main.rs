//! # grpcpie CLI Entry Point
//!
//! The main executable for the grpcpie tool. This file drives the application lifecycle:
//!
//! 1. **Initialization**: Installs the tracing subscriber and parses arguments using [`cli::Cli`].
//! 2. **Assembly**: Turns the raw arguments into a [`grpcpie_core::Call`].
//! 3. **Execution**: Delegates resolution, request building and the RPC to the [`Invoker`].
//! 4. **Presentation**: Prints the response to standard output, or a diagnostic to standard
//!    error followed by exit status 1.

mod cli;
mod formatter;

use clap::Parser;
use cli::Cli;
use formatter::{FormattedString, Response};
use grpcpie_core::Invoker;
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    let args = Cli::parse();
    let format = args.format;

    let call = match args.into_call() {
        Ok(call) => call,
        Err(err) => {
            eprint!("{}", FormattedString::from(err));
            process::exit(1);
        }
    };
    tracing::debug!(?call, "call assembled");

    match Invoker::new().exec(&call).await {
        Ok(response) => print!("{}", FormattedString::from(Response(response, format))),
        Err(err) => {
            eprint!("{}", FormattedString::from(err));
            process::exit(1);
        }
    }
}

/// Logs go to stderr, so stdout carries nothing but the response.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
