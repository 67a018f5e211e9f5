//! Error taxonomy for tool execution and probes
//!
//! Layers below the command boundary return these typed errors; commands
//! convert them into `anyhow::Error` for reporting.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while running an external tool
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Binary could not be located on the search path
    #[error("{0} is not installed or not on PATH")]
    NotFound(String),

    /// Binary was found but the process could not be spawned
    #[error("failed to execute {program}: {message}")]
    Spawn { program: String, message: String },

    /// Process did not finish within its allotted time and was killed
    #[error("{program} timed out after {}s", .after.as_secs_f64())]
    Timeout { program: String, after: Duration },

    /// Process ran and exited with a code that signals a real failure
    #[error("{tool} exited with code {code}: {}", .stderr.trim())]
    Failed {
        tool: String,
        code: i32,
        stderr: String,
    },

    /// A pattern produced an unusable expression
    #[error("invalid pattern `{pattern}`: {message}")]
    Pattern { pattern: String, message: String },
}

impl ToolError {
    /// Startup errors mean the tool never ran at all
    pub fn is_startup(&self) -> bool {
        matches!(self, ToolError::NotFound(_) | ToolError::Spawn { .. })
    }

    /// Whether a composite search may recover by retrying with a simpler pattern.
    /// Timeouts and startup errors are never retried.
    pub fn allows_pattern_fallback(&self) -> bool {
        matches!(self, ToolError::Failed { .. } | ToolError::Pattern { .. })
    }
}

/// Error attached to a single probe result
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// The probe's task panicked before producing a result
    #[error("probe task panicked: {0}")]
    Panicked(String),
}

/// First failing probe of a fan-out, reported to the command layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("search failed in {title}: {source}")]
pub struct ProbeFailure {
    pub title: String,
    #[source]
    pub source: ProbeError,
}
