//! Read-only settings shared by every component of a command run

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::render::{OutputMode, RenderConfig};

/// Default wall-clock limit for any external process
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable configuration, built once from CLI arguments and passed down
#[derive(Debug, Clone)]
pub struct Config {
    /// Project root; searches run here and emitted paths are relative to it
    pub root: PathBuf,
    pub mode: OutputMode,
    /// Pretty-print the structured document
    pub pretty: bool,
    pub color: bool,
    /// Per-process timeout
    pub timeout: Duration,
    /// Directories used to resolve tool binaries; `None` means the process PATH
    pub search_path: Option<OsString>,
}

impl Config {
    pub fn new(root: impl Into<PathBuf>, mode: OutputMode) -> Self {
        Self {
            root: root.into(),
            mode,
            pretty: false,
            color: true,
            timeout: DEFAULT_TIMEOUT,
            search_path: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Resolve binaries from the given directories instead of PATH
    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            mode: self.mode,
            pretty: self.pretty,
            color: self.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new("/tmp/project", OutputMode::Text);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.color);
        assert!(!config.pretty);
        assert!(!config.is_json());
        assert!(config.search_path.is_none());
    }

    #[test]
    fn test_builders() {
        let config = Config::new(".", OutputMode::Json)
            .with_timeout(Duration::from_secs(5))
            .with_pretty(true)
            .with_color(false)
            .with_search_path("/opt/bin");
        assert!(config.is_json());
        assert!(config.pretty);
        assert!(!config.color);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.search_path, Some(OsString::from("/opt/bin")));
    }
}
