//! Configuration module for ui_agent
//!
//! This module contains:
//! - `timing`: Timing configurations for device operations
//! - `dump`: Settings for fetching UI dumps

mod dump;
mod timing;

pub use dump::{DumpConfig, DUMP_CONFIG};
pub use timing::{DeviceTimingConfig, TimingConfig, TIMING_CONFIG};
