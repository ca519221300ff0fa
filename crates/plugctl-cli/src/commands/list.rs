//! List command implementation.

use plugctl_core::{discover, Transport};

use crate::cli::ListArgs;
use crate::error::CliError;
use crate::output::{get_formatter, write_output};

/// Broadcast a discovery query and print whatever answered.
pub async fn run_list(args: ListArgs, transport: &Transport) -> Result<(), CliError> {
    let devices = discover(transport).await?;

    let formatter = get_formatter(args.format);
    write_output(args.output.as_deref(), &formatter.format_devices(&devices))?;

    if devices.is_empty() {
        return Err(CliError::NoDevicesFound);
    }
    Ok(())
}
