//! JSON-formatted output for CLI.

use serde::Serialize;
use serde_json::json;

use plugctl_core::SysInfo;

use super::OutputFormatter;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }

    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn format_devices(&self, devices: &[SysInfo]) -> String {
        let output = json!({
            "devices": devices,
            "count": devices.len()
        });
        Self::to_json(&output)
    }

    fn format_device(&self, device: &SysInfo) -> String {
        Self::to_json(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_devices_shape() {
        let device = SysInfo {
            alias: "Desk Lamp".to_string(),
            relay_state: 1,
            ..SysInfo::default()
        };

        let rendered = JsonOutput::new().format_devices(&[device]);
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["count"], 1);
        assert_eq!(parsed["devices"][0]["alias"], "Desk Lamp");
        assert_eq!(parsed["devices"][0]["relay_state"], 1);
    }
}
