//! Process runner
//!
//! All external tool invocations go through here. Programs are resolved on
//! the configured search path and executed with an argument list; no shell
//! is ever involved. Every call runs under a timeout, and the child is killed
//! when its future is dropped, so no process outlives the call.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, warn};

use crate::core::config::Config;
use crate::core::error::ToolError;
use crate::core::model::ProcessResult;

/// Executes external programs for the tool adapters
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    cwd: PathBuf,
    search_path: Option<OsString>,
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(config: &Config) -> Self {
        Self {
            cwd: config.root.clone(),
            search_path: config.search_path.clone(),
            timeout: config.timeout,
        }
    }

    /// Look a binary up on the search path. Pure: spawns nothing.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let found = match &self.search_path {
            Some(paths) => which::which_in(name, Some(paths), &self.cwd),
            None => which::which(name),
        };
        found.ok()
    }

    pub fn is_resolvable(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Run with the configured default timeout
    pub async fn run(&self, name: &str, args: &[String]) -> Result<ProcessResult, ToolError> {
        self.execute(name, args, self.timeout).await
    }

    /// Run `name` with `args`, capturing output.
    ///
    /// A non-zero exit is reported through [`ProcessResult::exit_code`], not as
    /// an error. Errors mean the program never ran or was killed on timeout.
    pub async fn execute(
        &self,
        name: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<ProcessResult, ToolError> {
        let program = self
            .resolve(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        debug!(program = %program.display(), ?args, ?timeout, "spawning");
        let start = Instant::now();

        let child = Command::new(&program)
            .args(args)
            .current_dir(working_dir(&self.cwd))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ToolError::Spawn {
                program: name.to_string(),
                message: e.to_string(),
            })?;

        // On timeout the wait future is dropped, which drops the child and kills it
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(ToolError::Spawn {
                    program: name.to_string(),
                    message: e.to_string(),
                })
            }
            Err(_) => {
                warn!(program = name, ?timeout, "process timed out, killed");
                return Err(ToolError::Timeout {
                    program: name.to_string(),
                    after: timeout,
                });
            }
        };

        let result = ProcessResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        };

        debug!(
            program = name,
            exit_code = result.exit_code,
            duration_ms = start.elapsed().as_millis() as u64,
            "process finished"
        );

        Ok(result)
    }
}

fn working_dir(root: &Path) -> &Path {
    if root.is_dir() {
        root
    } else {
        Path::new(".")
    }
}

#[cfg(all(test, unix))]
pub(crate) mod testing {
    //! Shell-script stand-ins for external tools

    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    /// Write an executable `/bin/sh` script named `name` into `dir`
    pub fn install_script(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::testing::install_script;
    use super::*;
    use crate::core::render::OutputMode;

    fn runner_in(dir: &Path) -> ProcessRunner {
        let config = Config::new(dir, OutputMode::Text).with_search_path(dir.as_os_str());
        ProcessRunner::new(&config)
    }

    #[tokio::test]
    async fn test_captures_streams_and_exit_code() {
        let temp = tempfile::tempdir().unwrap();
        install_script(temp.path(), "tool", "echo out-$1\necho err >&2\nexit 3");
        let runner = runner_in(temp.path());

        let result = runner.run("tool", &["x".to_string()]).await.unwrap();
        assert_eq!(result.stdout, "out-x\n");
        assert_eq!(result.stderr, "err\n");
        assert_eq!(result.exit_code, 3);
        assert!(!result.ok());
    }

    #[tokio::test]
    async fn test_arguments_are_not_shell_expanded() {
        let temp = tempfile::tempdir().unwrap();
        install_script(temp.path(), "tool", "printf '%s\\n' \"$1\"");
        let runner = runner_in(temp.path());

        let arg = "$(touch pwned); `id` | ;".to_string();
        let result = runner.run("tool", &[arg.clone()]).await.unwrap();
        assert_eq!(result.stdout.trim_end(), arg);
        assert!(!temp.path().join("pwned").exists());
    }

    #[tokio::test]
    async fn test_missing_binary_is_startup_error() {
        let temp = tempfile::tempdir().unwrap();
        let runner = runner_in(temp.path());

        assert!(!runner.is_resolvable("definitely-not-here"));
        let err = runner.run("definitely-not-here", &[]).await.unwrap_err();
        assert_eq!(err, ToolError::NotFound("definitely-not-here".to_string()));
        assert!(err.is_startup());
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let temp = tempfile::tempdir().unwrap();
        install_script(temp.path(), "slow", "sleep 5\necho done");
        let runner = runner_in(temp.path());

        let start = Instant::now();
        let err = runner
            .execute("slow", &[], Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_resolve_uses_search_path() {
        let temp = tempfile::tempdir().unwrap();
        install_script(temp.path(), "present", "true");
        let runner = runner_in(temp.path());

        assert_eq!(runner.resolve("present"), Some(temp.path().join("present")));
        assert!(runner.resolve("absent").is_none());
    }
}
