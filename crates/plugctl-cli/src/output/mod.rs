//! Output formatting for CLI results.

pub mod json;
pub mod promsd;
pub mod table;

pub use json::JsonOutput;
pub use promsd::PromSdOutput;
pub use table::TableOutput;

use std::io::Write;

use plugctl_core::SysInfo;

use crate::cli::Format;
use crate::error::Result;

/// Output formatter trait
pub trait OutputFormatter {
    /// Format a device list
    fn format_devices(&self, devices: &[SysInfo]) -> String;

    /// Format a single device's status
    fn format_device(&self, device: &SysInfo) -> String;
}

/// Get the formatter for the requested format
pub fn get_formatter(format: Format) -> Box<dyn OutputFormatter> {
    match format {
        Format::Table => Box::new(TableOutput::new()),
        Format::Json => Box::new(JsonOutput::new()),
        Format::Promsd => Box::new(PromSdOutput::new()),
    }
}

/// Write rendered output to the given file, or stdout when none is set.
pub fn write_output(path: Option<&str>, rendered: &str) -> Result<()> {
    match path {
        Some(path) => {
            let mut file = std::fs::File::create(path)?;
            writeln!(file, "{}", rendered)?;
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("targets.json");

        write_output(path.to_str(), "[]").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[test]
    fn test_get_formatter_covers_all_formats() {
        for format in [Format::Table, Format::Json, Format::Promsd] {
            let devices: Vec<SysInfo> = Vec::new();
            let _ = get_formatter(format).format_devices(&devices);
        }
    }
}
