//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// plugctl - control smart plugs on the local network
#[derive(Parser, Debug)]
#[command(name = "plugctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Reply deadline in milliseconds
    #[arg(long, global = true, default_value = "1000", env = "PLUGCTL_TIMEOUT_MS")]
    pub timeout_ms: u64,

    /// Local address to bind UDP sockets to (IP or IP:port)
    #[arg(long, global = true, env = "PLUGCTL_LOCAL")]
    pub local: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List smart plugs on the local network
    #[command(visible_alias = "ls", alias = "l")]
    List(ListArgs),

    /// Show status of a single device
    Status(StatusArgs),

    /// Turn a device's relay on
    On(SwitchArgs),

    /// Turn a device's relay off
    Off(SwitchArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Human-readable table
    Table,
    /// Pretty-printed JSON
    Json,
    /// Prometheus file service discovery JSON
    Promsd,
}

// ==================== List ====================

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: Format,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,
}

// ==================== Status ====================

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Device address (IP or IP:port)
    pub address: String,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: Format,
}

// ==================== On / Off ====================

#[derive(Args, Debug)]
pub struct SwitchArgs {
    /// Device address (IP or IP:port)
    pub address: String,
}
