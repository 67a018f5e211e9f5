//! Wrangler integration
//!
//! Prefers a `wrangler` binary on the search path and falls back to
//! `npx wrangler`. The choice is made on first use and then reused.

use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::info;

use crate::backends::process::ProcessRunner;
use crate::core::error::ToolError;

pub const WRANGLER: &str = "wrangler";
pub const NPX: &str = "npx";

/// How wrangler gets invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    /// `wrangler <args>`
    Direct,
    /// `npx wrangler <args>`
    PackageRunner,
}

impl Invocation {
    fn command(self, args: Vec<String>) -> (&'static str, Vec<String>) {
        match self {
            Invocation::Direct => (WRANGLER, args),
            Invocation::PackageRunner => {
                let mut full = Vec::with_capacity(args.len() + 1);
                full.push(WRANGLER.to_string());
                full.extend(args);
                (NPX, full)
            }
        }
    }
}

/// Deployment adapter over wrangler
#[derive(Debug, Clone)]
pub struct Wrangler {
    runner: ProcessRunner,
    invocation: Arc<OnceCell<Invocation>>,
}

impl Wrangler {
    pub fn new(runner: ProcessRunner) -> Self {
        Self {
            runner,
            invocation: Arc::new(OnceCell::new()),
        }
    }

    /// Strategy in use, resolving it on the first call
    pub fn invocation(&self) -> Invocation {
        *self.invocation.get_or_init(|| {
            if self.runner.is_resolvable(WRANGLER) {
                Invocation::Direct
            } else {
                info!("wrangler not on PATH, falling back to npx wrangler");
                Invocation::PackageRunner
            }
        })
    }

    /// Strategy if one has been resolved already
    #[cfg(test)]
    pub fn resolved(&self) -> Option<Invocation> {
        self.invocation.get().copied()
    }

    /// Run `wrangler <subcommand> <args>` and return its stdout
    pub async fn invoke(&self, subcommand: &str, args: &[String]) -> Result<String, ToolError> {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(subcommand.to_string());
        full.extend(args.iter().cloned());

        let (program, argv) = self.invocation().command(full);
        let result = self.runner.run(program, &argv).await?;
        if !result.ok() {
            return Err(ToolError::Failed {
                tool: WRANGLER.to_string(),
                code: result.exit_code,
                stderr: result.stderr,
            });
        }
        Ok(result.stdout)
    }

    /// Whether wrangler can be run at all, directly or through npx
    pub async fn is_available(&self) -> bool {
        if self.runner.is_resolvable(WRANGLER) {
            return true;
        }
        if !self.runner.is_resolvable(NPX) {
            return false;
        }
        let args = vec![WRANGLER.to_string(), "--version".to_string()];
        matches!(self.runner.run(NPX, &args).await, Ok(result) if result.ok())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::backends::process::testing::install_script;
    use crate::core::config::Config;
    use crate::core::render::OutputMode;
    use std::path::Path;

    fn wrangler_in(dir: &Path) -> Wrangler {
        let config = Config::new(dir, OutputMode::Text).with_search_path(dir.as_os_str());
        Wrangler::new(ProcessRunner::new(&config))
    }

    #[tokio::test]
    async fn test_prefers_direct_binary() {
        let temp = tempfile::tempdir().unwrap();
        install_script(temp.path(), WRANGLER, "echo direct \"$@\"");
        install_script(temp.path(), NPX, "echo npx \"$@\"");
        let wrangler = wrangler_in(temp.path());

        let out = wrangler.invoke("d1", &["list".to_string()]).await.unwrap();
        assert_eq!(out.trim(), "direct d1 list");
        assert_eq!(wrangler.resolved(), Some(Invocation::Direct));
    }

    #[tokio::test]
    async fn test_falls_back_to_npx() {
        let temp = tempfile::tempdir().unwrap();
        install_script(temp.path(), NPX, "echo npx \"$@\"");
        let wrangler = wrangler_in(temp.path());

        let out = wrangler
            .invoke("kv", &["namespace".to_string(), "list".to_string()])
            .await
            .unwrap();
        assert_eq!(out.trim(), "npx wrangler kv namespace list");
        assert_eq!(wrangler.resolved(), Some(Invocation::PackageRunner));
    }

    #[tokio::test]
    async fn test_resolution_is_lazy_and_memoized() {
        let temp = tempfile::tempdir().unwrap();
        install_script(temp.path(), NPX, "echo npx \"$@\"");
        let wrangler = wrangler_in(temp.path());
        assert_eq!(wrangler.resolved(), None);

        wrangler.invoke("whoami", &[]).await.unwrap();
        // A binary appearing later does not change the resolved strategy
        install_script(temp.path(), WRANGLER, "echo direct");
        let out = wrangler.invoke("whoami", &[]).await.unwrap();
        assert_eq!(out.trim(), "npx wrangler whoami");
    }

    #[tokio::test]
    async fn test_failure_carries_stderr() {
        let temp = tempfile::tempdir().unwrap();
        install_script(temp.path(), WRANGLER, "echo 'not authenticated' >&2\nexit 1");
        let wrangler = wrangler_in(temp.path());

        let err = wrangler.invoke("d1", &["list".to_string()]).await.unwrap_err();
        assert!(err.to_string().contains("not authenticated"));
    }

    #[tokio::test]
    async fn test_nothing_available() {
        let temp = tempfile::tempdir().unwrap();
        let wrangler = wrangler_in(temp.path());
        assert!(!wrangler.is_available().await);
        let err = wrangler.invoke("d1", &[]).await.unwrap_err();
        assert_eq!(err, ToolError::NotFound(NPX.to_string()));
    }
}
