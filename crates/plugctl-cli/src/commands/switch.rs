//! On/off command implementation.

use plugctl_core::{parse_addr, set_relay_state, Transport};

use crate::cli::SwitchArgs;
use crate::error::CliError;

/// Send a relay command. The device never acknowledges, so this only
/// reports that the command was sent.
pub async fn run_switch(args: SwitchArgs, transport: &Transport, on: bool) -> Result<(), CliError> {
    let addr = parse_addr(&args.address)?;
    set_relay_state(transport, addr, on).await?;

    let state = if on { "on" } else { "off" };
    println!("Sent {} command to {}", state, addr);
    Ok(())
}
