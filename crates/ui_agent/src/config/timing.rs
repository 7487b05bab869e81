//! Timing configuration for device operations

use lazy_static::lazy_static;
use std::env;

/// Device timing configuration for tap operations
#[derive(Debug, Clone)]
pub struct DeviceTimingConfig {
    /// Seconds to wait after a tap so the screen can settle
    pub default_tap_delay: f64,
}

impl Default for DeviceTimingConfig {
    fn default() -> Self {
        Self {
            default_tap_delay: env::var("UI_AGENT_TAP_DELAY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1.0),
        }
    }
}

/// Master timing configuration
#[derive(Debug, Clone, Default)]
pub struct TimingConfig {
    pub device: DeviceTimingConfig,
}

lazy_static! {
    /// Global timing configuration instance
    pub static ref TIMING_CONFIG: TimingConfig = TimingConfig::default();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tap_delay_is_non_negative() {
        assert!(TIMING_CONFIG.device.default_tap_delay >= 0.0);
    }
}
