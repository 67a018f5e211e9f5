//! Cloudflare bindings: D1, KV, R2, Durable Objects and remote listings

use super::{filter_arg, Plan, Summary};
use crate::core::query::{CompositeQuery, FileQuery, SearchQuery};
use crate::probes::Probe;

const BINDING_GLOB: &str = "*.{toml,ts,js,svelte}";
const CODE_GLOB: &str = "*.{ts,js,svelte}";
const CONFIG_GLOB: &str = "*.{toml,ts}";
const WRANGLER_GLOB: &str = "wrangler*.toml";

const D1_KEYWORDS: [&str; 8] = [
    r"\bD1\b",
    "d1_databases",
    r"\.prepare\b",
    r"\.exec\b",
    r"\.all\b",
    r"\.first\b",
    r"\.run\b",
    r"\.batch\b",
];
const KV_KEYWORDS: [&str; 7] = [
    r"\bKV\b",
    "KVNamespace",
    "kv_namespaces",
    r"\.get\s*\(",
    r"\.put\s*\(",
    r"\.delete\s*\(",
    r"\.list\s*\(",
];
const R2_KEYWORDS: [&str; 7] = [
    r"\bR2\b",
    "R2Bucket",
    "r2_buckets",
    r"\.put\s*\(",
    r"\.get\s*\(",
    r"\.delete\s*\(",
    r"\.list\s*\(",
];
const DO_KEYWORDS: [&str; 4] = [
    r"\bDurableObject\b",
    "DurableObjectNamespace",
    "DurableObjectStub",
    "durable_objects",
];

fn search(title: &str, pattern: &str, glob: &str) -> Probe {
    Probe::search(title, SearchQuery::new(pattern).glob(glob))
}

/// `cf`: every binding kind at a glance
pub fn overview() -> Plan {
    Plan::new("cf")
        .header("Cloudflare Bindings Overview")
        .probe(search(
            "D1 Databases",
            r"\bD1Database\b|d1_databases|binding\s*=.*D1",
            BINDING_GLOB,
        ))
        .probe(search(
            "KV Namespaces",
            r"\bKVNamespace\b|kv_namespaces|binding\s*=.*KV",
            BINDING_GLOB,
        ))
        .probe(search(
            "R2 Buckets",
            r"\bR2Bucket\b|r2_buckets|binding\s*=.*R2",
            BINDING_GLOB,
        ))
        .probe(search(
            "Durable Objects",
            r"\bDurableObject\b|durable_objects|DurableObjectNamespace",
            BINDING_GLOB,
        ))
}

/// Filtered form shared by d1/kv/r2: composite references to `pattern`
fn references(command: &str, kind: &str, pattern: &str, query: CompositeQuery) -> Plan {
    Plan::new(command)
        .lead(format!("{} references matching: {}", kind, pattern))
        .field("pattern", pattern)
        .probe(
            Probe::composite(format!("{} References", kind), query)
                .limit(30)
                .empty_label(format!("{} references", kind)),
        )
}

/// `cf d1 [pattern]`
pub fn d1(pattern: Option<&str>) -> Plan {
    match filter_arg(pattern) {
        Some(pattern) => references(
            "cf d1",
            "D1",
            pattern,
            CompositeQuery::new(pattern, D1_KEYWORDS).glob("*.{toml,ts,js,svelte,sql}"),
        )
        .probe(
            Probe::search("Schema References", SearchQuery::new(pattern).glob("*.sql"))
                .limit(20)
                .hide_when_empty(),
        ),
        None => Plan::new("cf d1")
            .header("D1 Database Overview")
            .probe(search("D1 Bindings", r"d1_databases|D1Database|\[\[d1", CONFIG_GLOB))
            .probe(search(
                "Query Operations",
                r"\.prepare\s*\(|\.exec\s*\(|\.all\s*\(|\.first\s*\(|\.run\s*\(|\.batch\s*\(",
                CODE_GLOB,
            ))
            .probe(Probe::files("SQL Files", FileQuery::new().glob("*.sql")))
            .probe(search("Wrangler D1 Config", "database_name|database_id", WRANGLER_GLOB)),
    }
}

/// `cf kv [pattern]`
pub fn kv(pattern: Option<&str>) -> Plan {
    match filter_arg(pattern) {
        Some(pattern) => references(
            "cf kv",
            "KV",
            pattern,
            CompositeQuery::new(pattern, KV_KEYWORDS).glob(BINDING_GLOB),
        ),
        None => Plan::new("cf kv")
            .header("KV Namespace Overview")
            .probe(search("KV Bindings", r"kv_namespaces|KVNamespace|\[\[kv", CONFIG_GLOB))
            .probe(search(
                "KV Operations",
                r"\.get\s*\(|\.put\s*\(|\.delete\s*\(|\.list\s*\(|\.getWithMetadata\s*\(",
                CODE_GLOB,
            ))
            .probe(search(
                "Wrangler KV Config",
                "kv_namespaces|preview_id|namespace_id",
                WRANGLER_GLOB,
            )),
    }
}

/// `cf r2 [pattern]`
pub fn r2(pattern: Option<&str>) -> Plan {
    match filter_arg(pattern) {
        Some(pattern) => references(
            "cf r2",
            "R2",
            pattern,
            CompositeQuery::new(pattern, R2_KEYWORDS).glob(BINDING_GLOB),
        ),
        None => Plan::new("cf r2")
            .header("R2 Storage Overview")
            .probe(search("R2 Bindings", r"r2_buckets|R2Bucket|\[\[r2", CONFIG_GLOB))
            .probe(search(
                "R2 Operations",
                r"\.put\s*\(|\.get\s*\(|\.delete\s*\(|\.list\s*\(|\.head\s*\(|\.createMultipartUpload\s*\(",
                CODE_GLOB,
            ))
            .probe(search("Wrangler R2 Config", "r2_buckets|bucket_name", WRANGLER_GLOB)),
    }
}

/// `cf do [name]`
pub fn durable_objects(name: Option<&str>) -> Plan {
    match filter_arg(name) {
        Some(name) => Plan::new("cf do")
            .lead(format!("Durable Object references matching: {}", name))
            .field("name", name)
            .probe(
                Probe::search(
                    "Class Definitions",
                    SearchQuery::new(format!(
                        r"class\s+{name}.*DurableObject|export\s+class\s+{name}"
                    ))
                    .glob("*.{ts,js}"),
                )
                .unlimited()
                .hide_when_empty(),
            )
            .probe(
                Probe::composite(
                    "All References",
                    CompositeQuery::new(name, DO_KEYWORDS).glob(BINDING_GLOB),
                )
                .limit(30)
                .empty_label("DO references"),
            ),
        None => Plan::new("cf do")
            .header("Durable Objects Overview")
            .probe(search(
                "DO Class Definitions",
                r"class\s+\w+.*(?:extends\s+DurableObject|implements\s+DurableObject)",
                "*.{ts,js}",
            ))
            .probe(Probe::files(
                "DO Files",
                FileQuery::new().glob("*.{ts,js}").named("(?i)durable"),
            ))
            .probe(search(
                "Stub Usage",
                r"\.idFromName\s*\(|\.idFromString\s*\(|DurableObjectNamespace|\.get\s*\(\s*id\b",
                CODE_GLOB,
            ))
            .probe(search(
                "Wrangler DO Config",
                "durable_objects|class_name|script_name",
                WRANGLER_GLOB,
            ))
            .summary(Summary::ClassNames {
                section: 0,
                label: "DO classes".to_string(),
            }),
    }
}

/// `cf remote`: what the account has deployed, via wrangler
pub fn remote() -> Plan {
    Plan::new("cf remote")
        .header("Cloudflare Remote Resources")
        .probe(Probe::deploy("D1 Databases", "d1", ["list"]).empty_label("D1 databases"))
        .probe(
            Probe::deploy("KV Namespaces", "kv", ["namespace", "list"])
                .empty_label("KV namespaces"),
        )
        .probe(Probe::deploy("R2 Buckets", "r2", ["bucket", "list"]).empty_label("R2 buckets"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probes::Source;

    #[test]
    fn test_filtered_d1_uses_composite_with_schema() {
        let plan = d1(Some("users"));
        assert_eq!(plan.lead.as_deref(), Some("D1 references matching: users"));
        assert_eq!(plan.fields, vec![("pattern".to_string(), "users".to_string())]);
        match &plan.probes[0].source {
            Source::Composite(q) => {
                assert_eq!(q.token, "users");
                assert!(q.pattern().starts_with("(users).*("));
            }
            other => panic!("unexpected source {other:?}"),
        }
        assert!(plan.probes[1].hide_when_empty);
        assert_eq!(plan.probes[1].limit, 20);
    }

    #[test]
    fn test_blank_pattern_is_overview() {
        let plan = kv(Some("  "));
        assert_eq!(plan.header.as_deref(), Some("KV Namespace Overview"));
        assert_eq!(plan.probes.len(), 3);
    }

    #[test]
    fn test_do_overview_summarizes_class_definitions() {
        let plan = durable_objects(None);
        assert_eq!(plan.probes[0].title, "DO Class Definitions");
        assert!(matches!(plan.summary, Some(Summary::ClassNames { section: 0, .. })));
    }

    #[test]
    fn test_filtered_do_shows_every_class_definition() {
        let plan = durable_objects(Some("Session"));
        assert_eq!(plan.probes[0].title, "Class Definitions");
        assert_eq!(plan.probes[0].limit, usize::MAX);
        assert!(plan.probes[0].hide_when_empty);
    }

    #[test]
    fn test_remote_uses_deploy_adapter() {
        let plan = remote();
        let subcommands: Vec<_> = plan
            .probes
            .iter()
            .map(|p| match &p.source {
                Source::Deploy { subcommand, args } => format!("{} {}", subcommand, args.join(" ")),
                other => panic!("unexpected source {other:?}"),
            })
            .collect();
        assert_eq!(subcommands, vec!["d1 list", "kv namespace list", "r2 bucket list"]);
    }
}
