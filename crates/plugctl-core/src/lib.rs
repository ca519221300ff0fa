//! Core library for discovering and controlling smart plugs over their
//! UDP protocol.
//!
//! The protocol is a single ciphered JSON datagram per message. This crate
//! covers the wire codec, the UDP transport with deadline-bounded reply
//! collection, the typed `get_sysinfo` projection, and the fire-and-forget
//! relay command.

pub mod device;
pub mod error;
pub mod protocol;
pub mod transport;

pub use device::{discover, query_device, query_sysinfo, set_relay_state, Projection, SysInfo};
pub use error::{CoreError, DeviceError, ProtocolError, Result};
pub use protocol::Envelope;
pub use transport::{broadcast_addr, parse_addr, parse_bind_addr, Transport, DEVICE_PORT};
