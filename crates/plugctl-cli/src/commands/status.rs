//! Status command implementation.

use plugctl_core::{parse_addr, query_device, Transport};

use crate::cli::StatusArgs;
use crate::error::CliError;
use crate::output::get_formatter;

/// Query a single device and print its status.
pub async fn run_status(args: StatusArgs, transport: &Transport) -> Result<(), CliError> {
    let addr = parse_addr(&args.address)?;
    let info = query_device(transport, addr).await?;

    // A reply carrying a non-zero error code has no trustworthy fields.
    info.err().map_err(plugctl_core::CoreError::from)?;

    let formatter = get_formatter(args.format);
    println!("{}", formatter.format_device(&info));
    Ok(())
}
