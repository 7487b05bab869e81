//! The command-execution seam used by [`Device`](super::Device)

use crate::error::Result;
use std::future::Future;

/// Runs one `adb` invocation and hands back its output
///
/// `args` never include the `adb` executable itself, only what follows it
/// (for example `["-s", "emulator-5554", "shell", "input", "tap", "10", "20"]`).
/// Failures should be reported as `AdbError::CommandFailed`.
pub trait CommandRunner {
    fn run(&self, args: &[String]) -> impl Future<Output = Result<String>> + Send;
}
