//! Error types for plugctl core.

use std::net::SocketAddr;

use thiserror::Error;

/// Wire codec errors.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("failed to serialize envelope: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("datagram did not decipher to valid JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Device-level failures: protocol violations in replies, device-reported
/// errors, and single-target reply cardinality.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("no response from {addr}")]
    NoResponse { addr: SocketAddr },

    #[error("{count} responses for single-target query to {addr}")]
    TooManyResponses { addr: SocketAddr, count: usize },

    #[error("reply from {addr} is missing the {module} payload")]
    MissingModule { addr: String, module: &'static str },

    #[error("reply from {addr} has a malformed {module} payload: {source}")]
    BadPayload {
        addr: String,
        module: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("device {addr} reported error code {code}: {message}")]
    Reported {
        addr: String,
        code: i64,
        message: String,
    },
}

/// Core error type for shared operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    #[error("bad target: {0}")]
    BadTarget(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
