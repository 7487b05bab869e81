//! ui_agent: UI-driven Android automation
//!
//! This library provides:
//! - Decoding of `uiautomator dump` output into a typed node tree
//! - Depth-first search over that tree with `(node, parent)` predicates
//! - Bounds parsing and tap-point geometry
//! - A device layer that fetches dumps and taps elements through a pluggable
//!   `CommandRunner`
//!
//! # Example
//!
//! ```no_run
//! use ui_agent::Hierarchy;
//!
//! let dump = std::fs::read_to_string("window_dump.xml").unwrap();
//! let hierarchy = Hierarchy::parse(&dump).unwrap();
//!
//! let button = hierarchy
//!     .find(|n, _parent| n.content_desc == "OK" && n.clickable == "true")
//!     .unwrap();
//! let (x, y) = button.center();
//! println!("tap at {} {}", x, y);
//! ```

// Core modules
pub mod error;

// Configuration module
pub mod config;

// UI dump decoding and search
pub mod uixml;

// Device backend
pub mod adb;

// Re-export commonly used types and functions
pub use error::{AdbError, Result};

// Config re-exports
pub use config::{DeviceTimingConfig, DumpConfig, TimingConfig, DUMP_CONFIG, TIMING_CONFIG};

// UI dump re-exports
pub use uixml::{find_all_in, parse_bounds, walk, Hierarchy, Node, Rect};

// ADB re-exports
pub use adb::{CommandRunner, Device};
