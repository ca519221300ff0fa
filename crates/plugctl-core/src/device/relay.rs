//! Relay control.

use std::net::SocketAddr;

use crate::error::Result;
use crate::protocol::Envelope;
use crate::transport::Transport;

/// Switch the relay at `remote` on or off.
///
/// Devices send no acknowledgment for this command, so success only means
/// the datagram was written; the state change itself cannot be confirmed
/// from this call.
pub async fn set_relay_state(transport: &Transport, remote: SocketAddr, on: bool) -> Result<()> {
    let request = Envelope::relay_request(on);
    transport.send(&request, remote, false).await?;
    Ok(())
}
