//! Device control utilities for UI-driven Android automation

use crate::adb::runner::CommandRunner;
use crate::config::{DUMP_CONFIG, TIMING_CONFIG};
use crate::error::Result;
use crate::uixml::{Hierarchy, Node};
use std::time::Duration;
use tracing::{debug, warn};

/// An Android device reached through a [`CommandRunner`]
///
/// Every lookup fetches and decodes a fresh dump; nothing is cached between
/// calls.
#[derive(Debug, Clone)]
pub struct Device<R> {
    runner: R,
    serial: Option<String>,
    tap_delay: f64,
    dump_path: String,
}

impl<R: CommandRunner> Device<R> {
    /// Device used when exactly one is attached (no `-s` flag)
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            serial: None,
            tap_delay: TIMING_CONFIG.device.default_tap_delay,
            dump_path: DUMP_CONFIG.dump_path.clone(),
        }
    }

    /// Target a specific device serial, e.g. `emulator-5554`
    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    /// Seconds to wait after each tap
    pub fn with_tap_delay(mut self, delay: f64) -> Self {
        self.tap_delay = delay;
        self
    }

    pub fn serial(&self) -> Option<&str> {
        self.serial.as_deref()
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Build adb arguments with optional device specifier
    fn adb_args(&self, args: &[&str]) -> Vec<String> {
        let mut full = Vec::with_capacity(args.len() + 2);
        if let Some(serial) = &self.serial {
            full.push("-s".to_string());
            full.push(serial.clone());
        }
        full.extend(args.iter().map(|a| a.to_string()));
        full
    }

    async fn exec(&self, args: &[&str]) -> Result<String> {
        let args = self.adb_args(args);
        debug!("adb {}", args.join(" "));
        self.runner.run(&args).await
    }

    /// Raw text of the current screen's UI dump
    pub async fn ui_dump(&self) -> Result<String> {
        self.exec(&["exec-out", "uiautomator", "dump", self.dump_path.as_str()])
            .await
    }

    /// Fetch and decode the current screen
    pub async fn xml(&self) -> Result<Hierarchy> {
        let dump = self.ui_dump().await?;
        Hierarchy::parse(&dump)
    }

    /// Whether the raw dump mentions `content` anywhere
    pub async fn exist_element(&self, content: &str) -> bool {
        match self.ui_dump().await {
            Ok(dump) => dump.contains(content),
            Err(e) => {
                debug!("UI dump failed while looking for {:?}: {}", content, e);
                false
            }
        }
    }

    /// First node accepted by `predicate`, see [`Hierarchy::find`]
    pub async fn find_node<F>(&self, predicate: F) -> Result<Node>
    where
        F: FnMut(&Node, &Node) -> bool,
    {
        let hierarchy = self.xml().await?;
        hierarchy.find(predicate).cloned()
    }

    /// All nodes accepted by `predicate`; `NotFound` when there are none
    pub async fn find_nodes<F>(&self, predicate: F) -> Result<Vec<Node>>
    where
        F: FnMut(&Node, &Node) -> bool,
    {
        let hierarchy = self.xml().await?;
        let nodes = hierarchy.find_nodes(predicate)?;
        Ok(nodes.into_iter().cloned().collect())
    }

    /// Clickable node whose content description is `name`
    pub async fn find_button(&self, name: &str) -> Result<Node> {
        let hierarchy = self.xml().await?;
        hierarchy.find_button(name).cloned()
    }

    /// Content description of the first node with exactly these bounds
    pub async fn find_desc(&self, bounds: &str) -> Result<Option<String>> {
        let hierarchy = self.xml().await?;
        let desc = hierarchy
            .find_all(|n, _| n.bounds == bounds)
            .first()
            .map(|n| n.content_desc.clone());
        if desc.is_none() {
            debug!("No node with bounds {}", bounds);
        }
        Ok(desc)
    }

    /// Tap at the specified coordinates
    pub async fn tap(&self, x: i32, y: i32) -> Result<()> {
        let (x, y) = (x.to_string(), y.to_string());
        self.exec(&["shell", "input", "tap", x.as_str(), y.as_str()])
            .await?;

        match Duration::try_from_secs_f64(self.tap_delay) {
            Ok(delay) => tokio::time::sleep(delay).await,
            Err(_) => warn!("Ignoring invalid tap delay {}", self.tap_delay),
        }
        Ok(())
    }

    /// Tap the center of `node`
    pub async fn click_node_by(&self, node: &Node) -> Result<()> {
        let (x, y) = node.center();
        self.tap(x, y).await
    }

    /// Find a button by content description and tap it
    pub async fn click_button(&self, name: &str) -> Result<()> {
        let button = self.find_button(name).await?;
        self.click_node_by(&button).await
    }

    /// Find a node by class and description and tap it
    ///
    /// An empty `class` matches any class. An empty `desc` matches anything,
    /// otherwise it must equal the content description or the text.
    pub async fn click_node(&self, class: &str, desc: &str) -> Result<()> {
        let node = self
            .find_node(|n, _| {
                let class_match = class.is_empty() || n.class == class;
                let desc_match = desc.is_empty() || n.content_desc == desc || n.text == desc;
                class_match && desc_match
            })
            .await?;
        self.click_node_by(&node).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdbError;
    use std::sync::Mutex;

    const DUMP: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='yes' ?><hierarchy rotation="0"><node index="0" text="" class="android.widget.FrameLayout" package="com.example" bounds="[0,0][1080,2400]"><node index="0" text="" class="android.widget.Button" content-desc="OK" clickable="true" bounds="[40,50][140,150]" /><node index="1" text="Settings" class="android.widget.TextView" content-desc="" clickable="false" bounds="[0,300][200,401]" /><node index="2" text="Bad" class="android.widget.TextView" bounds="" /></node></hierarchy>UI hierchary dumped to: /dev/tty"#;

    /// Records every invocation and answers dumps with a fixed text
    struct FakeRunner {
        dump: Option<String>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl FakeRunner {
        fn new(dump: &str) -> Self {
            Self {
                dump: Some(dump.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                dump: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }

        fn taps(&self) -> Vec<Vec<String>> {
            self.calls()
                .into_iter()
                .filter(|c| c.iter().any(|a| a == "tap"))
                .collect()
        }
    }

    impl CommandRunner for FakeRunner {
        async fn run(&self, args: &[String]) -> Result<String> {
            self.calls.lock().unwrap().push(args.to_vec());
            if args.iter().any(|a| a == "uiautomator") {
                return self
                    .dump
                    .clone()
                    .ok_or_else(|| AdbError::CommandFailed("device offline".to_string()));
            }
            Ok(String::new())
        }
    }

    fn device(runner: FakeRunner) -> Device<FakeRunner> {
        Device::new(runner).with_tap_delay(0.0)
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_ui_dump_command() {
        let dev = device(FakeRunner::new(DUMP));
        dev.ui_dump().await.unwrap();
        assert_eq!(
            dev.runner().calls(),
            vec![args(&["exec-out", "uiautomator", "dump", DUMP_CONFIG.dump_path.as_str()])]
        );
    }

    #[tokio::test]
    async fn test_serial_prefix() {
        let dev = device(FakeRunner::new(DUMP)).with_serial("emulator-5554");
        assert_eq!(dev.serial(), Some("emulator-5554"));
        dev.tap(1, 2).await.unwrap();
        assert_eq!(
            dev.runner().calls(),
            vec![args(&["-s", "emulator-5554", "shell", "input", "tap", "1", "2"])]
        );
    }

    #[tokio::test]
    async fn test_click_button_taps_center() {
        let dev = device(FakeRunner::new(DUMP));
        dev.click_button("OK").await.unwrap();
        assert_eq!(
            dev.runner().taps(),
            vec![args(&["shell", "input", "tap", "90", "100"])]
        );
    }

    #[tokio::test]
    async fn test_click_node_matches_text_or_desc() {
        let dev = device(FakeRunner::new(DUMP));
        dev.click_node("android.widget.TextView", "Settings")
            .await
            .unwrap();
        dev.click_node("", "OK").await.unwrap();
        assert_eq!(
            dev.runner().taps(),
            vec![
                args(&["shell", "input", "tap", "100", "350"]),
                args(&["shell", "input", "tap", "90", "100"]),
            ]
        );
    }

    #[tokio::test]
    async fn test_click_node_not_found_does_not_tap() {
        let dev = device(FakeRunner::new(DUMP));
        let err = dev.click_node("android.widget.Switch", "").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(dev.runner().taps().is_empty());
    }

    #[tokio::test]
    async fn test_click_node_by_bad_bounds_taps_origin() {
        let dev = device(FakeRunner::new(DUMP));
        let node = dev.find_node(|n, _| n.text == "Bad").await.unwrap();
        dev.click_node_by(&node).await.unwrap();
        assert_eq!(
            dev.runner().taps(),
            vec![args(&["shell", "input", "tap", "0", "0"])]
        );
    }

    #[tokio::test]
    async fn test_find_nodes() {
        let dev = device(FakeRunner::new(DUMP));
        let texts = dev
            .find_nodes(|n, _| n.class == "android.widget.TextView")
            .await
            .unwrap();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0].text, "Settings");

        let err = dev
            .find_nodes(|n, _| n.class == "android.widget.Switch")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_find_node_sees_parent() {
        let dev = device(FakeRunner::new(DUMP));
        let node = dev
            .find_node(|n, pn| pn.class == "android.widget.FrameLayout" && n.clickable == "true")
            .await
            .unwrap();
        assert_eq!(node.content_desc, "OK");
    }

    #[tokio::test]
    async fn test_find_desc() {
        let dev = device(FakeRunner::new(DUMP));
        assert_eq!(
            dev.find_desc("[40,50][140,150]").await.unwrap(),
            Some("OK".to_string())
        );
        assert_eq!(dev.find_desc("[1,1][2,2]").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_exist_element() {
        let dev = device(FakeRunner::new(DUMP));
        assert!(dev.exist_element("Settings").await);
        assert!(!dev.exist_element("Logout").await);

        let offline = device(FakeRunner::failing());
        assert!(!offline.exist_element("Settings").await);
    }

    #[tokio::test]
    async fn test_dump_failure_propagates() {
        let dev = device(FakeRunner::failing());
        assert!(matches!(
            dev.find_button("OK").await,
            Err(AdbError::CommandFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_dump() {
        let dev = device(FakeRunner::new("ERROR: could not get idle state."));
        assert!(matches!(
            dev.xml().await,
            Err(AdbError::MalformedDocument(_))
        ));
    }
}
