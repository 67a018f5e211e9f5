//! ripgrep integration
//!
//! Runs `rg` through the process runner and turns its output into
//! root-relative lines. Exit code 1 ("no matches") is an empty result,
//! never an error.

use regex::Regex;
use tracing::debug;

use crate::backends::process::ProcessRunner;
use crate::core::error::ToolError;
use crate::core::model::ProcessResult;
use crate::core::paths::{relativize_line, root_arg};
use crate::core::query::{FileQuery, SearchQuery};

pub const RG: &str = "rg";

/// Exit code rg uses when nothing matched
const NO_MATCHES: i32 = 1;

/// Search adapter over `rg`
#[derive(Debug, Clone)]
pub struct Ripgrep {
    runner: ProcessRunner,
    root: String,
}

impl Ripgrep {
    pub fn new(runner: ProcessRunner, root: &std::path::Path) -> Self {
        Self {
            runner,
            root: root_arg(root),
        }
    }

    /// Check if ripgrep is available
    pub fn is_available(&self) -> bool {
        self.runner.is_resolvable(RG)
    }

    /// Matched lines for `query`, as `path:line:text`
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, ToolError> {
        let result = self.runner.run(RG, &query.to_args(&self.root)).await?;
        let lines = self.matched_lines(result)?;
        debug!(pattern = %query.pattern, matches = lines.len(), "rg search");
        Ok(lines)
    }

    /// Files under the root matching the query's globs and name pattern
    pub async fn files(&self, query: &FileQuery) -> Result<Vec<String>, ToolError> {
        let name_filter = match &query.name_pattern {
            Some(pattern) => Some(Regex::new(pattern).map_err(|e| ToolError::Pattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?),
            None => None,
        };

        let result = self.runner.run(RG, &query.to_args(&self.root)).await?;
        let mut files = self.matched_lines(result)?;
        if let Some(re) = name_filter {
            files.retain(|f| re.is_match(f));
        }
        files.sort();
        debug!(globs = ?query.globs, files = files.len(), "rg files");
        Ok(files)
    }

    fn matched_lines(&self, result: ProcessResult) -> Result<Vec<String>, ToolError> {
        match result.exit_code {
            0 => Ok(result
                .lines()
                .iter()
                .map(|l| relativize_line(l, &self.root))
                .collect()),
            NO_MATCHES => Ok(Vec::new()),
            code => Err(ToolError::Failed {
                tool: RG.to_string(),
                code,
                stderr: result.stderr,
            }),
        }
    }
}
