//! Wire protocol layer: the stream cipher and the JSON envelope codec.

pub mod cipher;
pub mod envelope;

pub use envelope::{Envelope, MODULE_RELAY, MODULE_SYSINFO};
