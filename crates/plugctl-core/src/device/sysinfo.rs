//! Status query (`get_sysinfo`) projection and the queries built on it.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DeviceError, Result};
use crate::protocol::{Envelope, MODULE_SYSINFO};
use crate::transport::{broadcast_addr, Transport};

/// How to treat replies that fail to project to a [`SysInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Any unprojectable reply fails the whole call. Used for direct
    /// single-target queries.
    Strict,
    /// Unprojectable replies are skipped. Used for broadcast discovery,
    /// where the domain may carry replies we do not understand.
    Lenient,
}

/// Typed projection of a `get_sysinfo` reply.
///
/// When `error_code` is non-zero the device rejected the request and the
/// remaining fields are not meaningful; see [`SysInfo::err`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SysInfo {
    /// Address the reply came from. Not part of the wire payload.
    #[serde(skip_deserializing)]
    pub peer: Option<SocketAddr>,

    #[serde(rename = "err_code")]
    pub error_code: i64,
    #[serde(rename = "error_msg")]
    pub error_message: String,

    pub active_mode: String,
    pub alias: String,
    #[serde(rename = "deviceId")]
    pub device_id: String,
    #[serde(rename = "dev_name")]
    pub device_name: String,
    pub feature: String,
    #[serde(rename = "hwId")]
    pub hardware_id: String,
    #[serde(rename = "hw_ver")]
    pub hardware_version: String,
    pub icon_hash: String,
    pub led_off: i64,
    pub mac: String,
    pub mic_type: String,
    pub model: String,
    pub ntc_code: i64,
    #[serde(rename = "oemId")]
    pub oem_id: String,
    /// Seconds the relay has been on.
    pub on_time: i64,
    /// Relay state, 0 = off, 1 = on.
    pub relay_state: i64,
    /// Radio signal strength in dBm.
    pub rssi: i64,
    #[serde(rename = "sw_ver")]
    pub software_version: String,
    pub status: String,
    pub updating: i64,
}

fn peer_label(peer: Option<SocketAddr>) -> String {
    peer.map(|a| a.to_string())
        .unwrap_or_else(|| "<unknown>".to_string())
}

impl SysInfo {
    /// Project the `get_sysinfo` module out of a reply envelope.
    pub fn from_envelope(reply: &Envelope) -> std::result::Result<Self, DeviceError> {
        let module = reply
            .module(MODULE_SYSINFO)
            .ok_or_else(|| DeviceError::MissingModule {
                addr: peer_label(reply.peer),
                module: MODULE_SYSINFO,
            })?;
        let mut info: SysInfo =
            serde_json::from_value(module.clone()).map_err(|source| DeviceError::BadPayload {
                addr: peer_label(reply.peer),
                module: MODULE_SYSINFO,
                source,
            })?;
        info.peer = reply.peer;
        Ok(info)
    }

    /// Surface a device-reported application error as a typed failure.
    pub fn err(&self) -> std::result::Result<(), DeviceError> {
        if self.error_code == 0 {
            return Ok(());
        }
        Err(DeviceError::Reported {
            addr: peer_label(self.peer),
            code: self.error_code,
            message: if self.error_message.is_empty() {
                "no message".to_string()
            } else {
                self.error_message.clone()
            },
        })
    }

    pub fn is_on(&self) -> bool {
        self.relay_state == 1
    }
}

/// Send a status query to `remote` and project every reply received
/// before the deadline window closes.
pub async fn query_sysinfo(
    transport: &Transport,
    remote: SocketAddr,
    mode: Projection,
) -> Result<Vec<SysInfo>> {
    let request = Envelope::sysinfo_request();
    let replies = transport.send(&request, remote, true).await?;

    let mut infos = Vec::with_capacity(replies.len());
    for reply in &replies {
        match SysInfo::from_envelope(reply) {
            Ok(info) => infos.push(info),
            Err(err) => match mode {
                Projection::Strict => return Err(err.into()),
                Projection::Lenient => debug!(%err, "skipping unprojectable reply"),
            },
        }
    }
    Ok(infos)
}

/// Strict status query against a single known device. Exactly one reply
/// is expected; zero and more-than-one are distinct typed failures.
pub async fn query_device(transport: &Transport, remote: SocketAddr) -> Result<SysInfo> {
    let mut infos = query_sysinfo(transport, remote, Projection::Strict).await?;
    match infos.len() {
        0 => Err(DeviceError::NoResponse { addr: remote }.into()),
        1 => Ok(infos.remove(0)),
        count => Err(DeviceError::TooManyResponses {
            addr: remote,
            count,
        }
        .into()),
    }
}

/// Broadcast a status query and collect whoever answers before the
/// deadline. Zero devices is a successful empty result.
pub async fn discover(transport: &Transport) -> Result<Vec<SysInfo>> {
    query_sysinfo(transport, broadcast_addr(), Projection::Lenient).await
}
