//! Result model shared by the runner, probes and renderers

use crate::core::error::ProbeError;

/// Captured outcome of one external process that started and exited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    pub stdout: String,
    pub stderr: String,
    /// Exit code; -1 when the process was terminated by a signal
    pub exit_code: i32,
}

impl ProcessResult {
    /// The process exited successfully
    pub fn ok(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout split into non-empty lines
    pub fn lines(&self) -> Vec<String> {
        split_lines(&self.stdout)
    }
}

/// Split tool output into non-empty lines, keeping order and duplicates
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Output of one probe execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub title: String,
    /// Full, untruncated lines in tool output order
    pub lines: Vec<String>,
    pub error: Option<ProbeError>,
}

impl ProbeResult {
    pub fn found(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
            error: None,
        }
    }

    pub fn failed(title: impl Into<String>, error: ProbeError) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn total(&self) -> usize {
        self.lines.len()
    }
}
