//! ADB (Android Debug Bridge) module for UI-driven device control
//!
//! This module provides:
//! - `runner`: The `CommandRunner` trait that actually talks to `adb`
//! - `device`: Dump fetching, element lookup and tapping

mod device;
mod runner;

pub use device::Device;
pub use runner::CommandRunner;
