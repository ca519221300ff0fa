//! UDP transport: address parsing and deadline-bounded send/receive.

pub mod addr;
pub mod udp;

pub use addr::{broadcast_addr, parse_addr, parse_bind_addr, DEVICE_PORT};
pub use udp::{Transport, DEFAULT_READ_DEADLINE};
