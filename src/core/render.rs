//! Renderer module
//!
//! Commands aggregate their probe results into a mode-independent `Report`,
//! which is rendered either as sectioned text or as one JSON document.
//! Text mode truncates each section to its limit; JSON always carries the
//! full line lists.

use colored::{ColoredString, Colorize};
use serde::Serialize;
use serde_json::{Map, Value};

/// Output mode, chosen once per invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Text,
    Json,
}

/// Render options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub mode: OutputMode,
    pub pretty: bool,
    pub color: bool,
}

impl RenderConfig {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            pretty: false,
            color: false,
        }
    }
}

/// Keep the first `limit` lines; report how many were suppressed
pub fn truncate(lines: &[String], limit: usize) -> (&[String], usize) {
    let shown = lines.len().min(limit);
    (&lines[..shown], lines.len() - shown)
}

/// Derive a document key from a section title:
/// lower-case, runs of non-alphanumerics collapse to `_`.
pub fn section_key(title: &str) -> String {
    let mut key = String::with_capacity(title.len());
    let mut pending_sep = false;
    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !key.is_empty() {
                key.push('_');
            }
            pending_sep = false;
            key.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    key
}

/// Post-truncation view of one section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    pub title: &'a str,
    pub shown: &'a [String],
    pub overflow: usize,
}

impl Section<'_> {
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty() && self.overflow == 0
    }

    pub fn total(&self) -> usize {
        self.shown.len() + self.overflow
    }
}

/// One aggregated section with its display policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub title: String,
    pub lines: Vec<String>,
    pub limit: usize,
    /// Category named by the "no ... found" placeholder
    pub empty_label: String,
    /// Print `(N total)` after the shown lines
    pub show_total: bool,
    /// Omit the section from text output when it has no lines
    pub hide_when_empty: bool,
}

impl ReportSection {
    pub fn new(title: impl Into<String>, lines: Vec<String>, limit: usize) -> Self {
        let title = title.into();
        Self {
            empty_label: title.to_lowercase(),
            title,
            lines,
            limit,
            show_total: false,
            hide_when_empty: false,
        }
    }

    pub fn key(&self) -> String {
        section_key(&self.title)
    }

    pub fn section(&self) -> Section<'_> {
        let (shown, overflow) = truncate(&self.lines, self.limit);
        Section {
            title: &self.title,
            shown,
            overflow,
        }
    }
}

/// Trailing text-mode summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub title: String,
    pub text: String,
}

/// Mode-independent aggregation of one command's results
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    /// Command name written into the structured document
    pub command: String,
    /// Major header, used by whole-overview commands
    pub header: Option<String>,
    /// Section line printed before the probe sections (e.g. the active filter)
    pub lead: Option<String>,
    /// Extra top-level document fields such as the filter pattern
    pub fields: Vec<(String, String)>,
    pub sections: Vec<ReportSection>,
    pub summary: Option<ReportSummary>,
}

impl Report {
    /// Structured document: `{command, ...fields, <key>: {count, results}}`
    pub fn to_document(&self) -> Value {
        let mut doc = Map::new();
        doc.insert("command".to_string(), Value::String(self.command.clone()));
        for (name, value) in &self.fields {
            doc.insert(name.clone(), Value::String(value.clone()));
        }
        for section in &self.sections {
            let entry = SectionDocument {
                count: section.lines.len(),
                results: &section.lines,
            };
            doc.insert(
                section.key(),
                serde_json::to_value(entry).unwrap_or(Value::Null),
            );
        }
        Value::Object(doc)
    }
}

/// Structured form of one section; never truncated
#[derive(Serialize)]
struct SectionDocument<'a> {
    count: usize,
    results: &'a [String],
}

/// Renderer for reports
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(mode: OutputMode) -> Self {
        Self::with_config(RenderConfig::new(mode))
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn render(&self, report: &Report) -> String {
        match self.config.mode {
            OutputMode::Text => self.render_text(report),
            OutputMode::Json => self.render_json(report),
        }
    }

    fn render_json(&self, report: &Report) -> String {
        let doc = report.to_document();
        let rendered = if self.config.pretty {
            serde_json::to_string_pretty(&doc)
        } else {
            serde_json::to_string(&doc)
        };
        rendered.unwrap_or_else(|_| "{}".to_string())
    }

    fn render_text(&self, report: &Report) -> String {
        let mut output = String::new();

        if let Some(header) = &report.header {
            output.push('\n');
            output.push_str(&self.paint(header, |s| s.bold().cyan()));
            output.push('\n');
            output.push_str(&"=".repeat(header.chars().count()));
            output.push('\n');
        }

        if let Some(lead) = &report.lead {
            self.push_section_header(&mut output, lead);
        }

        for report_section in &report.sections {
            let section = report_section.section();
            if section.is_empty() && report_section.hide_when_empty {
                continue;
            }

            self.push_section_header(&mut output, section.title);

            if section.is_empty() {
                let placeholder = format!("  No {} found", report_section.empty_label);
                output.push_str(&self.paint(&placeholder, |s| s.yellow()));
                output.push('\n');
                continue;
            }

            for line in section.shown {
                output.push_str(line);
                output.push('\n');
            }
            if section.overflow > 0 {
                let notice = format!("  ... and {} more", section.overflow);
                output.push_str(&self.paint(&notice, |s| s.dimmed()));
                output.push('\n');
            }
            if report_section.show_total {
                output.push_str(&format!("  ({} total)\n", section.total()));
            }
        }

        if let Some(summary) = &report.summary {
            self.push_section_header(&mut output, &summary.title);
            output.push_str("  ");
            output.push_str(&summary.text);
            output.push('\n');
        }

        output
    }

    fn push_section_header(&self, output: &mut String, title: &str) {
        output.push('\n');
        output.push_str(&self.paint(title, |s| s.bold()));
        output.push('\n');
        output.push_str(&"-".repeat(title.chars().count()));
        output.push('\n');
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.config.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("src/file{}.ts:{}:match", i, i)).collect()
    }

    fn report_with(sections: Vec<ReportSection>) -> Report {
        Report {
            command: "cf".to_string(),
            header: Some("Cloudflare Bindings Overview".to_string()),
            sections,
            ..Default::default()
        }
    }

    #[test]
    fn test_truncate_accounting() {
        for total in [0usize, 1, 14, 15, 16, 42, 100] {
            let lines = numbered(total);
            let (shown, overflow) = truncate(&lines, 15);
            assert_eq!(shown.len() + overflow, total);
            if total <= 15 {
                assert_eq!(overflow, 0);
            }
            assert_eq!(shown, &lines[..shown.len()]);
        }
    }

    #[test]
    fn test_truncate_zero_limit() {
        let lines = numbered(3);
        let (shown, overflow) = truncate(&lines, 0);
        assert!(shown.is_empty());
        assert_eq!(overflow, 3);
    }

    #[test]
    fn test_section_key() {
        assert_eq!(section_key("D1 Databases"), "d1_databases");
        assert_eq!(section_key("Heartwood/GroveAuth"), "heartwood_groveauth");
        assert_eq!(
            section_key("Auth Hooks (hooks.server.ts)"),
            "auth_hooks_hooks_server_ts"
        );
        assert_eq!(section_key("  Re-exports "), "re_exports");
    }

    #[test]
    fn test_text_overflow_and_json_full_lines() {
        let report = report_with(vec![ReportSection::new("KV Bindings", numbered(42), 25)]);

        let section = report.sections[0].section();
        assert_eq!(section.shown.len(), 25);
        assert_eq!(section.overflow, 17);

        let text = Renderer::new(OutputMode::Text).render(&report);
        assert!(text.contains("Cloudflare Bindings Overview"));
        assert!(text.contains("src/file25.ts:25:match"));
        assert!(!text.contains("src/file26.ts:26:match"));
        assert!(text.contains("  ... and 17 more"));

        let json: Value =
            serde_json::from_str(&Renderer::new(OutputMode::Json).render(&report)).unwrap();
        assert_eq!(json["command"], "cf");
        assert_eq!(json["kv_bindings"]["count"], 42);
        assert_eq!(json["kv_bindings"]["results"].as_array().unwrap().len(), 42);
    }

    #[test]
    fn test_empty_section_placeholder() {
        let mut section = ReportSection::new("R2 Buckets", Vec::new(), 25);
        section.empty_label = "R2 references".to_string();
        let text = Renderer::new(OutputMode::Text).render(&report_with(vec![section]));
        assert!(text.contains("R2 Buckets"));
        assert!(text.contains("  No R2 references found"));
        assert!(!text.contains("more"));
    }

    #[test]
    fn test_hidden_empty_section() {
        let mut hidden = ReportSection::new("Schema References", Vec::new(), 20);
        hidden.hide_when_empty = true;
        let text = Renderer::new(OutputMode::Text).render(&report_with(vec![hidden.clone()]));
        assert!(!text.contains("Schema References"));

        // JSON keeps the key regardless
        let json = report_with(vec![hidden]).to_document();
        assert_eq!(json["schema_references"]["count"], 0);
    }

    #[test]
    fn test_show_total_and_summary() {
        let mut pages = ReportSection::new("Page Routes", numbered(40), 30);
        pages.show_total = true;
        let mut report = report_with(vec![pages]);
        report.summary = Some(ReportSummary {
            title: "Summary".to_string(),
            text: "DO classes: Counter".to_string(),
        });

        let text = Renderer::new(OutputMode::Text).render(&report);
        assert!(text.contains("  (40 total)"));
        assert!(text.contains("  DO classes: Counter"));

        // Summary is text only
        let doc = report.to_document();
        assert!(doc.get("summary").is_none());
    }

    #[test]
    fn test_document_fields_and_pretty() {
        let mut report = report_with(vec![ReportSection::new("D1 References", numbered(2), 30)]);
        report.command = "cf d1".to_string();
        report.fields.push(("pattern".to_string(), "users".to_string()));

        let config = RenderConfig {
            mode: OutputMode::Json,
            pretty: true,
            color: false,
        };
        let rendered = Renderer::with_config(config).render(&report);
        assert!(rendered.contains("\n  "));

        let json: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(json["command"], "cf d1");
        assert_eq!(json["pattern"], "users");
        assert_eq!(json["d1_references"]["count"], 2);
    }

    #[test]
    fn test_counts_match_text_accounting() {
        let sections = vec![
            ReportSection::new("A", numbered(3), 25),
            ReportSection::new("B", numbered(60), 25),
            ReportSection::new("C", Vec::new(), 25),
        ];
        let report = report_with(sections);
        let doc = report.to_document();
        for section in &report.sections {
            let view = section.section();
            assert_eq!(doc[section.key()]["count"], view.shown.len() + view.overflow);
        }
    }

    #[test]
    fn test_plain_text_has_no_ansi_codes() {
        let report = report_with(vec![ReportSection::new("A", numbered(1), 25)]);
        let text = Renderer::new(OutputMode::Text).render(&report);
        assert!(!text.contains('\u{1b}'));
    }
}
