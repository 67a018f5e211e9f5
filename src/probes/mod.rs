//! Probes - named, independent units of search work
//!
//! A probe pairs a title and display policy with a source (one or more tool
//! calls). Running a probe never touches shared mutable state; it only needs
//! the shared, read-only [`Tools`].

pub mod fanout;

use tracing::{info, warn};

use crate::backends::process::ProcessRunner;
use crate::backends::rg::Ripgrep;
use crate::backends::wrangler::Wrangler;
use crate::core::config::Config;
use crate::core::error::ToolError;
use crate::core::model::{split_lines, ProbeResult};
use crate::core::query::{CompositeQuery, FileQuery, SearchQuery};
use crate::core::render::ReportSection;

/// Default display limit for a section
pub const DEFAULT_LIMIT: usize = 25;

/// Tool adapters shared by every probe of one command
#[derive(Debug, Clone)]
pub struct Tools {
    pub rg: Ripgrep,
    pub wrangler: Wrangler,
}

impl Tools {
    pub fn new(config: &Config) -> Self {
        let runner = ProcessRunner::new(config);
        Self {
            rg: Ripgrep::new(runner.clone(), config.root()),
            wrangler: Wrangler::new(runner),
        }
    }
}

/// Where a probe's lines come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Search(SearchQuery),
    /// Token/keyword co-occurrence with a token-only fallback
    Composite(CompositeQuery),
    Files(FileQuery),
    /// Stdout lines of `wrangler <subcommand> <args>`
    Deploy {
        subcommand: String,
        args: Vec<String>,
    },
}

/// Post-processing applied to a probe's lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineFilter {
    /// Keep lines containing any keyword (case-insensitive)
    AnyKeyword(Vec<String>),
    /// Drop lines containing this substring
    Exclude(String),
    /// Keep lines containing this substring (case-insensitive)
    Contains(String),
}

impl LineFilter {
    pub fn keeps(&self, line: &str) -> bool {
        match self {
            LineFilter::AnyKeyword(keywords) => {
                let lower = line.to_lowercase();
                keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
            }
            LineFilter::Exclude(needle) => !line.contains(needle.as_str()),
            LineFilter::Contains(needle) => line.to_lowercase().contains(&needle.to_lowercase()),
        }
    }
}

/// A titled unit of work within a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub title: String,
    pub source: Source,
    pub limit: usize,
    pub empty_label: String,
    pub filter: Option<LineFilter>,
    pub show_total: bool,
    pub hide_when_empty: bool,
}

impl Probe {
    pub fn new(title: impl Into<String>, source: Source) -> Self {
        let title = title.into();
        Self {
            empty_label: title.to_lowercase(),
            title,
            source,
            limit: DEFAULT_LIMIT,
            filter: None,
            show_total: false,
            hide_when_empty: false,
        }
    }

    pub fn search(title: impl Into<String>, query: SearchQuery) -> Self {
        Self::new(title, Source::Search(query))
    }

    pub fn composite(title: impl Into<String>, query: CompositeQuery) -> Self {
        Self::new(title, Source::Composite(query))
    }

    pub fn files(title: impl Into<String>, query: FileQuery) -> Self {
        Self::new(title, Source::Files(query))
    }

    pub fn deploy<I, S>(title: impl Into<String>, subcommand: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            title,
            Source::Deploy {
                subcommand: subcommand.to_string(),
                args: args.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Show every line in text mode
    pub fn unlimited(self) -> Self {
        self.limit(usize::MAX)
    }

    /// Category named in the "No ... found" placeholder
    pub fn empty_label(mut self, label: impl Into<String>) -> Self {
        self.empty_label = label.into();
        self
    }

    pub fn filter(mut self, filter: LineFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn show_total(mut self) -> Self {
        self.show_total = true;
        self
    }

    pub fn hide_when_empty(mut self) -> Self {
        self.hide_when_empty = true;
        self
    }

    /// Execute the probe's tool calls and fold them into one result
    pub async fn run(&self, tools: &Tools) -> ProbeResult {
        match self.collect(tools).await {
            Ok(lines) => ProbeResult::found(&self.title, lines),
            Err(e) => {
                if e.is_startup() {
                    warn!(probe = %self.title, error = %e, "tool could not be started");
                }
                ProbeResult::failed(&self.title, e.into())
            }
        }
    }

    async fn collect(&self, tools: &Tools) -> Result<Vec<String>, ToolError> {
        let mut lines = match &self.source {
            Source::Search(query) => tools.rg.search(query).await?,
            Source::Composite(query) => search_composite(&tools.rg, query).await?,
            Source::Files(query) => tools.rg.files(query).await?,
            Source::Deploy { subcommand, args } => {
                split_lines(&tools.wrangler.invoke(subcommand, args).await?)
            }
        };
        if let Some(filter) = &self.filter {
            lines.retain(|l| filter.keeps(l));
        }
        Ok(lines)
    }

    /// Aggregate this probe's result into a report section
    pub fn section(&self, result: ProbeResult) -> ReportSection {
        ReportSection {
            title: result.title,
            lines: result.lines,
            limit: self.limit,
            empty_label: self.empty_label.clone(),
            show_total: self.show_total,
            hide_when_empty: self.hide_when_empty,
        }
    }
}

/// Composite search, retrying once with the token alone when the combined
/// expression fails. Timeouts and startup errors are returned as-is.
pub async fn search_composite(
    rg: &Ripgrep,
    query: &CompositeQuery,
) -> Result<Vec<String>, ToolError> {
    match rg.search(&query.primary()).await {
        Ok(lines) => Ok(lines),
        Err(e) if e.allows_pattern_fallback() => {
            info!(
                token = %query.token,
                error = %e,
                "composite pattern failed, retrying with token only"
            );
            rg.search(&query.fallback()).await
        }
        Err(e) => Err(e),
    }
}

/// Run `probes` concurrently and return their results in declared order
pub async fn run_probes(tools: &Tools, probes: &[Probe]) -> Vec<ProbeResult> {
    let tasks = probes
        .iter()
        .map(|probe| {
            let probe = probe.clone();
            let tools = tools.clone();
            let title = probe.title.clone();
            (title, async move { probe.run(&tools).await })
        })
        .collect();
    fanout::run_all(tasks).await
}
