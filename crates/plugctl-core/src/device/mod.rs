//! Device operations: status queries, discovery, and relay control.

pub mod relay;
pub mod sysinfo;

pub use relay::set_relay_state;
pub use sysinfo::{discover, query_device, query_sysinfo, Projection, SysInfo};
