//! Table-formatted output for CLI.

use colored::*;
use comfy_table::{Cell, ContentArrangement, Table};

use plugctl_core::SysInfo;

use super::OutputFormatter;

pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }

    fn address(device: &SysInfo) -> String {
        device
            .peer
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    fn state(device: &SysInfo) -> String {
        if device.is_on() {
            "On".green().to_string()
        } else {
            "Off".red().to_string()
        }
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn format_devices(&self, devices: &[SysInfo]) -> String {
        if devices.is_empty() {
            return "No devices detected on local network".to_string();
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Address", "Alias", "Model", "State"]);

        for device in devices {
            table.add_row(vec![
                Cell::new(Self::address(device)),
                Cell::new(&device.alias),
                Cell::new(&device.model),
                Cell::new(Self::state(device)),
            ]);
        }

        format!("{}\n\nFound {} device(s)", table, devices.len())
    }

    fn format_device(&self, device: &SysInfo) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Device: {} ({})", Self::address(device), device.device_id));
        lines.push(format!("  Alias:      {}", device.alias));
        lines.push(format!("  Name:       {}", device.device_name));
        lines.push(format!("  Model:      {}", device.model));
        lines.push(format!("  Hardware:   {}", device.hardware_version));
        lines.push(format!("  Software:   {}", device.software_version));
        lines.push(format!("  MAC:        {}", device.mac));
        lines.push(format!("  State:      {}", Self::state(device)));
        lines.push(format!("  On time:    {} s", device.on_time));
        lines.push(format!("  RSSI:       {} dBm", device.rssi));

        lines.join("\n")
    }
}
