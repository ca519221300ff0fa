//! Target address parsing.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::CoreError;

/// UDP port smart plugs listen on.
pub const DEVICE_PORT: u16 = 9999;

fn parse_with_default_port(target: &str, default_port: u16) -> Result<SocketAddr, CoreError> {
    if let Ok(addr) = target.parse::<SocketAddr>() {
        return Ok(addr);
    }
    if let Ok(ip) = target.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, default_port));
    }
    Err(CoreError::BadTarget(format!(
        "{target:?} is not an IP address or IP:port pair"
    )))
}

/// Parse a device target. A bare IP gets the default device port.
pub fn parse_addr(target: &str) -> Result<SocketAddr, CoreError> {
    parse_with_default_port(target, DEVICE_PORT)
}

/// Parse a local bind address. A bare IP gets port 0, so concurrent
/// callers binding the same interface get distinct ephemeral ports.
pub fn parse_bind_addr(target: &str) -> Result<SocketAddr, CoreError> {
    parse_with_default_port(target, 0)
}

/// The limited-broadcast address devices answer discovery on.
pub fn broadcast_addr() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::BROADCAST), DEVICE_PORT)
}
