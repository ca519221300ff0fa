//! plugctl - control smart plugs on the local network.
//!
//! Discovers plugs via broadcast, queries single-device status, and
//! toggles relay state. Suitable for scripts; errors map to distinct
//! exit codes.

mod cli;
mod commands;
mod error;
mod output;

use std::time::Duration;

use clap::Parser;
use plugctl_core::{parse_bind_addr, Transport};

use cli::{Cli, Commands};
use error::{exit_codes, CliError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let local = match &cli.local {
        Some(addr) => Some(parse_bind_addr(addr)?),
        None => None,
    };
    let transport = Transport::new()
        .with_local(local)
        .with_read_deadline(Duration::from_millis(cli.timeout_ms));

    match cli.command {
        Commands::List(args) => commands::run_list(args, &transport).await,
        Commands::Status(args) => commands::run_status(args, &transport).await,
        Commands::On(args) => commands::run_switch(args, &transport, true).await,
        Commands::Off(args) => commands::run_switch(args, &transport, false).await,
    }
}
