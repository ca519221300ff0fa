//! Prometheus file service discovery output.
//!
//! Emits the JSON array consumed by `file_sd_configs`, one target group
//! per device with identity labels. Point the exporter's scrape config at
//! the written file to monitor every discovered plug.

use std::collections::BTreeMap;

use serde::Serialize;

use plugctl_core::SysInfo;

use super::OutputFormatter;

#[derive(Debug, Serialize)]
struct TargetGroup {
    targets: Vec<String>,
    labels: BTreeMap<String, String>,
}

pub struct PromSdOutput;

impl PromSdOutput {
    pub fn new() -> Self {
        Self
    }

    fn group(device: &SysInfo) -> Option<TargetGroup> {
        let peer = device.peer?;
        let mut labels = BTreeMap::new();
        labels.insert("alias".to_string(), device.alias.clone());
        labels.insert("model".to_string(), device.model.clone());
        Some(TargetGroup {
            targets: vec![peer.to_string()],
            labels,
        })
    }
}

impl Default for PromSdOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for PromSdOutput {
    fn format_devices(&self, devices: &[SysInfo]) -> String {
        let groups: Vec<TargetGroup> = devices.iter().filter_map(Self::group).collect();
        serde_json::to_string_pretty(&groups).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_device(&self, device: &SysInfo) -> String {
        self.format_devices(std::slice::from_ref(device))
    }
}
