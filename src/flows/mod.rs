//! Flows - commands expressed as plans of probes
//!
//! A plan lists its probes in display order. Executing a plan fans the probes
//! out, stops at the first failure (in declared order) and otherwise
//! aggregates everything into a [`Report`] for the renderer.

pub mod cf;
pub mod code;
pub mod routes;

use std::collections::BTreeSet;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::core::config::Config;
use crate::core::error::ProbeFailure;
use crate::core::render::{Renderer, Report, ReportSummary};
use crate::probes::fanout::first_error;
use crate::probes::{run_probes, Probe, Tools};

static CLASS_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bclass\s+([A-Za-z_$][\w$]*)").expect("Invalid CLASS_NAME_RE regex"));

/// Text-mode summary derived from one section's lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    /// Sorted, de-duplicated class names declared in the section at `section`
    ClassNames { section: usize, label: String },
}

impl Summary {
    fn build(&self, report: &Report) -> Option<ReportSummary> {
        match self {
            Summary::ClassNames { section, label } => {
                let lines = &report.sections.get(*section)?.lines;
                let names: BTreeSet<&str> = lines
                    .iter()
                    .filter_map(|l| CLASS_NAME_RE.captures(l))
                    .filter_map(|c| c.get(1).map(|m| m.as_str()))
                    .collect();
                if names.is_empty() {
                    return None;
                }
                Some(ReportSummary {
                    title: "Summary".to_string(),
                    text: format!(
                        "{}: {}",
                        label,
                        names.into_iter().collect::<Vec<_>>().join(", ")
                    ),
                })
            }
        }
    }
}

/// A command's probe set and presentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub command: String,
    pub header: Option<String>,
    pub lead: Option<String>,
    pub fields: Vec<(String, String)>,
    pub probes: Vec<Probe>,
    pub summary: Option<Summary>,
}

impl Plan {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            header: None,
            lead: None,
            fields: Vec::new(),
            probes: Vec::new(),
            summary: None,
        }
    }

    /// Major header for whole-overview commands
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn lead(mut self, lead: impl Into<String>) -> Self {
        self.lead = Some(lead.into());
        self
    }

    /// Top-level field of the structured document
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn probe(mut self, probe: Probe) -> Self {
        self.probes.push(probe);
        self
    }

    pub fn summary(mut self, summary: Summary) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Run all probes and aggregate them, or report the first failure
    pub async fn execute(&self, tools: &Tools) -> Result<Report, ProbeFailure> {
        debug!(command = %self.command, probes = self.probes.len(), "executing plan");
        let results = first_error(run_probes(tools, &self.probes).await)?;

        let sections = self
            .probes
            .iter()
            .zip(results)
            .map(|(probe, result)| probe.section(result))
            .collect();

        let mut report = Report {
            command: self.command.clone(),
            header: self.header.clone(),
            lead: self.lead.clone(),
            fields: self.fields.clone(),
            sections,
            summary: None,
        };
        report.summary = self.summary.as_ref().and_then(|s| s.build(&report));
        Ok(report)
    }
}

/// Execute a plan and print it in the configured mode.
/// Nothing reaches stdout unless every probe succeeded.
pub async fn run_plan(config: &Config, plan: Plan) -> Result<()> {
    let tools = Tools::new(config);
    let report = plan.execute(&tools).await?;

    let output = Renderer::with_config(config.render_config()).render(&report);
    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
    Ok(())
}

/// Read an optional positional filter, treating blank input as absent
pub(crate) fn filter_arg(arg: Option<&str>) -> Option<&str> {
    arg.map(str::trim).filter(|a| !a.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::ProbeResult;
    use crate::core::query::SearchQuery;
    use std::collections::HashSet;

    /// Every plan the CLI can build, with and without filter arguments
    fn all_plans() -> Vec<Plan> {
        let mut plans = vec![
            cf::overview(),
            cf::remote(),
            routes::plan(None, false),
            routes::plan(Some("blog"), false),
            routes::plan(None, true),
        ];
        for arg in [None, Some("users")] {
            plans.push(cf::d1(arg));
            plans.push(cf::kv(arg));
            plans.push(cf::r2(arg));
            plans.push(cf::durable_objects(arg));
            plans.push(code::db(arg));
            plans.push(code::glass(arg));
            plans.push(code::store(arg));
            plans.push(code::types(arg));
            plans.push(code::exports(arg));
            plans.push(code::auth(arg));
        }
        plans
    }

    #[test]
    fn test_section_keys_unique_per_plan() {
        for plan in all_plans() {
            let mut seen = HashSet::new();
            for name in plan.fields.iter().map(|(n, _)| n.clone()) {
                assert!(seen.insert(name), "field collision in {}", plan.command);
            }
            assert!(seen.insert("command".to_string()));
            for probe in &plan.probes {
                let key = crate::core::render::section_key(&probe.title);
                assert!(!key.is_empty(), "empty key in {}", plan.command);
                assert!(
                    seen.insert(key.clone()),
                    "key `{}` collides in `{}`",
                    key,
                    plan.command
                );
            }
        }
    }

    #[test]
    fn test_section_keys_do_not_depend_on_arguments() {
        let builders: [fn(Option<&str>) -> Plan; 10] = [
            cf::d1,
            cf::kv,
            cf::r2,
            cf::durable_objects,
            code::db,
            code::glass,
            code::store,
            code::types,
            code::exports,
            code::auth,
        ];
        let keys = |plan: Plan| -> Vec<String> {
            plan.probes
                .iter()
                .map(|p| crate::core::render::section_key(&p.title))
                .collect()
        };
        for build in builders {
            let users = build(Some("users"));
            let command = users.command.clone();
            assert_eq!(keys(users), keys(build(Some("Session"))), "{}", command);
        }
        assert_eq!(
            keys(routes::plan(Some("blog"), false)),
            keys(routes::plan(Some("admin"), false))
        );
    }

    #[test]
    fn test_every_plan_has_probes_with_sane_limits() {
        for plan in all_plans() {
            assert!(!plan.probes.is_empty(), "{} has no probes", plan.command);
            assert!(plan.probes.len() <= 4, "{} fans out too wide", plan.command);
            for probe in &plan.probes {
                let sane = (15..=50).contains(&probe.limit) || probe.limit == usize::MAX;
                assert!(sane, "{}: {}", plan.command, probe.title);
            }
        }
    }

    #[test]
    fn test_class_name_summary() {
        let report = Report {
            sections: vec![crate::core::render::ReportSection::new(
                "DO Class Definitions",
                vec![
                    "src/a.ts:3:export class SessionDO extends DurableObject {".to_string(),
                    "src/b.ts:9:class Counter implements DurableObject {".to_string(),
                    "src/c.ts:1:export class SessionDO extends DurableObject {".to_string(),
                ],
                25,
            )],
            ..Default::default()
        };
        let summary = Summary::ClassNames {
            section: 0,
            label: "DO classes".to_string(),
        }
        .build(&report)
        .unwrap();
        assert_eq!(summary.text, "DO classes: Counter, SessionDO");
    }

    #[test]
    fn test_class_name_summary_absent_without_classes() {
        let report = Report::default();
        let summary = Summary::ClassNames {
            section: 0,
            label: "DO classes".to_string(),
        };
        assert!(summary.build(&report).is_none());
    }

    #[test]
    fn test_filter_arg() {
        assert_eq!(filter_arg(Some("  users ")), Some("users"));
        assert_eq!(filter_arg(Some("   ")), None);
        assert_eq!(filter_arg(None), None);
    }

    #[test]
    fn test_sections_follow_probe_policy() {
        let probe = Probe::search("Enums", SearchQuery::new("enum")).limit(15);
        let section = probe.section(ProbeResult::found("Enums", vec!["x".to_string()]));
        assert_eq!(section.limit, 15);
        assert_eq!(section.title, "Enums");
    }
}
