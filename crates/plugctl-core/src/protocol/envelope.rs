//! Request/response envelope for the plug protocol.
//!
//! Every message is a JSON object with a single `system` key mapping
//! module names to their payloads. A status query carries a null payload;
//! a relay command carries `{"state": bool}`. The JSON is ciphered before
//! it goes on the wire, one datagram per message.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::cipher;
use crate::error::ProtocolError;

/// Status query module name.
pub const MODULE_SYSINFO: &str = "get_sysinfo";

/// Relay command module name.
pub const MODULE_RELAY: &str = "set_relay_state";

/// Relay command payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RelayCommand {
    state: bool,
}

/// Protocol envelope wrapping requests to and replies from devices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Envelope {
    /// Address of the device this envelope came from. Transport metadata,
    /// never serialized onto the wire.
    #[serde(skip)]
    pub peer: Option<SocketAddr>,

    /// Module name to payload. Payload shapes differ per module.
    pub system: Map<String, Value>,
}

impl Envelope {
    /// Build a status query: the `get_sysinfo` module with a null payload.
    pub fn sysinfo_request() -> Self {
        let mut system = Map::new();
        system.insert(MODULE_SYSINFO.to_string(), Value::Null);
        Self { peer: None, system }
    }

    /// Build a relay command for the given target state.
    pub fn relay_request(on: bool) -> Self {
        let mut system = Map::new();
        system.insert(
            MODULE_RELAY.to_string(),
            serde_json::to_value(RelayCommand { state: on }).unwrap_or(Value::Null),
        );
        Self { peer: None, system }
    }

    /// Payload of the named module, if the envelope carries it.
    pub fn module(&self, name: &str) -> Option<&Value> {
        self.system.get(name)
    }

    /// Serialize to compact JSON and cipher for the wire.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let plain = serde_json::to_vec(self).map_err(ProtocolError::Encode)?;
        Ok(cipher::encrypt(&plain))
    }

    /// Decipher raw datagram bytes and parse the envelope. Fails when the
    /// deciphered bytes are not valid JSON, which is expected for
    /// unrelated traffic on a broadcast domain.
    pub fn decode(raw: &[u8]) -> Result<Self, ProtocolError> {
        let plain = cipher::decrypt(raw);
        serde_json::from_slice(&plain).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sysinfo_request_wire_shape() {
        let raw = Envelope::sysinfo_request().encode().unwrap();
        let plain = cipher::decrypt(&raw);
        assert_eq!(plain, br#"{"system":{"get_sysinfo":null}}"#);
    }

    #[test]
    fn test_relay_request_wire_shape() {
        let raw = Envelope::relay_request(true).encode().unwrap();
        let plain = cipher::decrypt(&raw);
        assert_eq!(plain, br#"{"system":{"set_relay_state":{"state":true}}}"#);
    }

    #[test]
    fn test_round_trip_preserves_module_content() {
        let mut envelope = Envelope::default();
        envelope.system.insert(
            MODULE_SYSINFO.to_string(),
            json!({"alias": "Desk Lamp", "relay_state": 1, "nested": {"a": [1, 2, 3]}}),
        );
        envelope
            .system
            .insert("unknown_module".to_string(), Value::Null);

        let decoded = Envelope::decode(&envelope.encode().unwrap()).unwrap();
        assert_eq!(decoded.system, envelope.system);
        assert_eq!(decoded.peer, None);
    }

    #[test]
    fn test_peer_is_not_serialized() {
        let mut envelope = Envelope::sysinfo_request();
        envelope.peer = Some("127.0.0.1:9999".parse().unwrap());
        let raw = envelope.encode().unwrap();
        let plain = cipher::decrypt(&raw);
        assert!(!String::from_utf8(plain).unwrap().contains("127.0.0.1"));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(Envelope::decode(b"definitely not ciphered json").is_err());
        assert!(Envelope::decode(&[]).is_err());
    }
}
