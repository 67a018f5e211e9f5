//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::core::config::Config;
use crate::core::render::OutputMode;
use crate::flows::{cf, code, routes, run_plan, Plan};

/// scout - fast, parallel codebase exploration on top of ripgrep and wrangler.
#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(
    author,
    version,
    about,
    long_about = r#"scout answers "where is X used?" questions about a codebase.

Every command runs a handful of independent searches concurrently and prints
one titled section per search, always in the same order.

Output modes:
- text (default): headers, up to N lines per section, "... and N more" on overflow
- json (--json): one document with the full results and counts per section

Examples:
    scout cf
    scout cf d1 users
    scout cf do SessionDO
    scout routes --guards
    scout type User --json --pretty
"#
)]
pub struct Cli {
    /// Root directory to search.
    #[arg(
        long,
        global = true,
        env = "SCOUT_ROOT",
        default_value = ".",
        value_name = "ROOT",
        long_help = "Root directory to search (defaults to the current directory).\n\n\
Every path in the output is relative to this root."
    )]
    pub root: PathBuf,

    /// Emit a single JSON document instead of text.
    #[arg(
        long,
        global = true,
        env = "SCOUT_JSON",
        long_help = "Emit one JSON document: the command name, any filter arguments, and\n\
one {count, results} object per section. Results are never truncated.\n\n\
Nothing is printed to stdout when a search fails."
    )]
    pub json: bool,

    /// Pretty-print JSON output with indentation.
    #[arg(
        long,
        global = true,
        long_help = "Pretty-print JSON output with indentation for human readability.\n\n\
Has no effect on text output."
    )]
    pub pretty: bool,

    /// Disable colored output.
    #[arg(
        long,
        global = true,
        long_help = "Disable colored output. This is useful when piping to files or when your\n\
terminal does not support ANSI colors. Setting NO_COLOR has the same effect."
    )]
    pub no_color: bool,

    /// Per-process timeout in seconds.
    #[arg(
        long,
        global = true,
        env = "SCOUT_TIMEOUT",
        default_value_t = 30,
        value_name = "SECONDS",
        long_help = "Maximum run time for each external process (rg, wrangler).\n\n\
A process that exceeds it is killed and the command fails."
    )]
    pub timeout: u64,

    /// Verbose mode (more diagnostics).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Enable debug logging on stderr. RUST_LOG overrides the level when set."
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cloudflare bindings: D1, KV, R2, Durable Objects.
    #[command(
        long_about = "Explore Cloudflare bindings across the codebase.\n\n\
Without a subcommand, shows every binding kind at a glance."
    )]
    Cf {
        #[command(subcommand)]
        action: Option<CfCommands>,
    },

    /// SvelteKit routes.
    #[command(
        long_about = "List SvelteKit page routes, API routes, layouts and error pages.\n\n\
With PATTERN, only routes whose path contains it (case-insensitive).\n\
With --guards, show auth checks in server load functions and hooks instead."
    )]
    Routes {
        #[arg(value_name = "PATTERN")]
        pattern: Option<String>,

        /// Show route guards (auth/redirect checks).
        #[arg(short, long)]
        guards: bool,
    },

    /// Database queries, optionally for one table.
    Db {
        #[arg(value_name = "TABLE")]
        table: Option<String>,
    },

    /// Glass component usage, optionally for one variant.
    Glass {
        #[arg(value_name = "VARIANT")]
        variant: Option<String>,
    },

    /// Svelte stores and runes.
    Store {
        #[arg(value_name = "NAME")]
        name: Option<String>,
    },

    /// TypeScript type definitions and usage.
    Type {
        #[arg(value_name = "NAME")]
        name: Option<String>,
    },

    /// Module exports.
    Export {
        #[arg(value_name = "PATTERN")]
        pattern: Option<String>,
    },

    /// Authentication code.
    Auth {
        #[arg(value_name = "ASPECT")]
        aspect: Option<String>,
    },

    /// Check external tool availability (rg, wrangler).
    #[command(
        long_about = "Report whether ripgrep and wrangler can be run.\n\n\
wrangler counts as available when it is on PATH or can be run through npx."
    )]
    Doctor,
}

#[derive(Subcommand, Debug)]
pub enum CfCommands {
    /// D1 databases: bindings, queries, schema.
    D1 {
        #[arg(value_name = "PATTERN")]
        pattern: Option<String>,
    },
    /// KV namespaces: bindings, operations, config.
    Kv {
        #[arg(value_name = "PATTERN")]
        pattern: Option<String>,
    },
    /// R2 buckets: bindings, operations, config.
    R2 {
        #[arg(value_name = "PATTERN")]
        pattern: Option<String>,
    },
    /// Durable Objects: classes, stubs, config.
    Do {
        #[arg(value_name = "NAME")]
        name: Option<String>,
    },
    /// Deployed resources, listed by wrangler.
    #[command(
        long_about = "List deployed D1 databases, KV namespaces and R2 buckets using wrangler.\n\n\
Uses wrangler from PATH, falling back to `npx wrangler`."
    )]
    Remote,
}

impl Cli {
    /// Immutable configuration for one invocation
    pub fn config(&self) -> Config {
        // Get absolute root path
        let root = self.root.canonicalize().unwrap_or_else(|_| self.root.clone());
        let mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };
        let color = !self.no_color && std::env::var_os("NO_COLOR").is_none();

        Config::new(root, mode)
            .with_pretty(self.pretty)
            .with_color(color)
            .with_timeout(Duration::from_secs(self.timeout))
    }
}

/// Probe plan for a search command; `None` for commands that are not plans
pub fn plan_for(command: &Commands) -> Option<Plan> {
    let plan = match command {
        Commands::Cf { action } => match action {
            None => cf::overview(),
            Some(CfCommands::D1 { pattern }) => cf::d1(pattern.as_deref()),
            Some(CfCommands::Kv { pattern }) => cf::kv(pattern.as_deref()),
            Some(CfCommands::R2 { pattern }) => cf::r2(pattern.as_deref()),
            Some(CfCommands::Do { name }) => cf::durable_objects(name.as_deref()),
            Some(CfCommands::Remote) => cf::remote(),
        },
        Commands::Routes { pattern, guards } => routes::plan(pattern.as_deref(), *guards),
        Commands::Db { table } => code::db(table.as_deref()),
        Commands::Glass { variant } => code::glass(variant.as_deref()),
        Commands::Store { name } => code::store(name.as_deref()),
        Commands::Type { name } => code::types(name.as_deref()),
        Commands::Export { pattern } => code::exports(pattern.as_deref()),
        Commands::Auth { aspect } => code::auth(aspect.as_deref()),
        Commands::Doctor => return None,
    };
    Some(plan)
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.config();

    match plan_for(&cli.command) {
        Some(plan) => run_plan(&config, plan).await,
        None => crate::backends::doctor::run_doctor(&config).await,
    }
}
