//! Settings for fetching UI dumps from the device

use lazy_static::lazy_static;
use std::env;

/// Where `uiautomator dump` writes its output on the device
#[derive(Debug, Clone)]
pub struct DumpConfig {
    pub dump_path: String,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            dump_path: env::var("UI_AGENT_DUMP_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "/dev/tty".to_string()),
        }
    }
}

lazy_static! {
    /// Global dump configuration instance
    pub static ref DUMP_CONFIG: DumpConfig = DumpConfig::default();
}
