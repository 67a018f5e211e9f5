//! Application-code lookups: queries, components, stores, types, exports, auth

use super::{filter_arg, Plan};
use crate::core::query::{CompositeQuery, FileQuery, SearchQuery};
use crate::probes::{LineFilter, Probe};

const SOURCE_GLOB: &str = "*.{ts,js,svelte}";

const AUTH_KEYWORDS: [&str; 9] = [
    "auth",
    "session",
    "token",
    "login",
    "logout",
    "user",
    "credential",
    "oauth",
    "jwt",
];

/// `rg -t ts -t js`
fn ts_js(pattern: impl Into<String>) -> SearchQuery {
    SearchQuery::new(pattern).file_type("ts").file_type("js")
}

/// `db [table]`
pub fn db(table: Option<&str>) -> Plan {
    match filter_arg(table) {
        Some(table) => Plan::new("db")
            .lead(format!("Database queries for: {}", table))
            .field("table", table)
            .probe(
                Probe::search(
                    "Database Queries",
                    ts_js(format!("(SELECT|INSERT|UPDATE|DELETE).*{}", table)),
                )
                .limit(50)
                .empty_label("queries"),
            ),
        None => Plan::new("db").probe(
            Probe::search("Database Queries", ts_js(r"db\.(prepare|exec|batch)")).limit(50),
        ),
    }
}

/// `glass [variant]`
pub fn glass(variant: Option<&str>) -> Plan {
    match filter_arg(variant) {
        Some(variant) => Plan::new("glass")
            .lead(format!("Glass components with variant: {}", variant))
            .field("variant", variant)
            .probe(
                Probe::search(
                    "Glass Components",
                    SearchQuery::new(format!(r#"Glass.*variant.*['"]{}"#, variant))
                        .glob("*.{svelte,ts}"),
                )
                .limit(50)
                .empty_label("glass variants"),
            ),
        None => Plan::new("glass").probe(
            Probe::search("Glass Component Usage", SearchQuery::new("<Glass").glob("*.svelte"))
                .limit(50)
                .empty_label("Glass components"),
        ),
    }
}

/// `store [name]`
pub fn store(name: Option<&str>) -> Plan {
    match filter_arg(name) {
        Some(name) => Plan::new("store")
            .lead(format!("Svelte stores/state matching: {}", name))
            .field("name", name)
            .probe(
                Probe::composite(
                    "Svelte 4 Stores",
                    CompositeQuery::new(name, ["writable", "readable", "derived"])
                        .glob(SOURCE_GLOB),
                )
                .limit(30),
            )
            .probe(
                Probe::composite(
                    "Svelte 5 Runes",
                    CompositeQuery::new(
                        name,
                        [r"\$state", r"\$derived", r"\$effect", r"\$bindable"],
                    )
                    .glob(SOURCE_GLOB),
                )
                .limit(30),
            ),
        None => Plan::new("store")
            .header("Svelte Stores & Reactive State")
            .probe(
                Probe::files("Store Files", FileQuery::new().glob("*.{ts,js}").named("store"))
                    .filter(LineFilter::Exclude("_deprecated".to_string()))
                    .limit(20),
            )
            .probe(
                Probe::search(
                    "Svelte 4 Stores (writable/readable/derived)",
                    ts_js(r"export\s+(const|let).*=\s*(writable|readable|derived)")
                        .glob("!_deprecated"),
                )
                .limit(30),
            )
            .probe(
                Probe::search(
                    "Svelte 5 Runes ($state/$derived/$effect)",
                    SearchQuery::new(
                        r"\$state\(|\$state\.snapshot|\$derived\(|\$derived\.by|\$effect\(|\$bindable\(",
                    )
                    .glob(SOURCE_GLOB)
                    .glob("!_deprecated"),
                )
                .limit(30),
            ),
    }
}

/// `type [name]`
pub fn types(name: Option<&str>) -> Plan {
    match filter_arg(name) {
        Some(name) => Plan::new("type")
            .lead(format!("Finding type: {}", name))
            .field("name", name)
            .probe(
                Probe::search(
                    "Definition",
                    SearchQuery::new(format!(r"(type|interface|enum)\s+{}", name)).file_type("ts"),
                )
                .limit(50),
            )
            .probe(
                Probe::search(
                    "Usage",
                    SearchQuery::new(format!(r":\s*{name}\b|<{name}>|as\s+{name}")).file_type("ts"),
                )
                .limit(20)
                .empty_label("usage"),
            ),
        None => Plan::new("type")
            .header("TypeScript Types")
            .probe(
                Probe::search(
                    "Type Definitions",
                    SearchQuery::new(r"^export\s+(type|interface)\s+\w+")
                        .glob("!*.d.ts")
                        .file_type("ts"),
                )
                .limit(30),
            )
            .probe(
                Probe::search(
                    "Enums",
                    SearchQuery::new(r"^export\s+enum\s+\w+").file_type("ts"),
                )
                .limit(15),
            )
            .probe(
                Probe::files("Type Files", FileQuery::new().glob("*.ts").named("types?"))
                    .filter(LineFilter::Exclude(".d.ts".to_string()))
                    .limit(20),
            ),
    }
}

/// `export [pattern]`
pub fn exports(pattern: Option<&str>) -> Plan {
    match filter_arg(pattern) {
        Some(pattern) => Plan::new("export")
            .lead(format!("Exports matching: {}", pattern))
            .field("pattern", pattern)
            .probe(
                Probe::search(
                    "Exports",
                    ts_js(format!(
                        r"export\s+(default\s+)?(const|let|function|class|type|interface|enum)\s+.*{}",
                        pattern
                    )),
                )
                .limit(50),
            )
            .probe(
                Probe::search("Re-exports", ts_js(format!(r"export\s+\{{[^}}]*{}", pattern)))
                    .limit(15),
            ),
        None => Plan::new("export")
            .header("Module Exports")
            .probe(
                Probe::search(
                    "Default Exports",
                    SearchQuery::new(r"export\s+default").glob(SOURCE_GLOB),
                )
                .limit(20),
            )
            .probe(
                Probe::search(
                    "Named Exports",
                    ts_js(r"^export\s+(const|let|function|class|async function)"),
                )
                .limit(25),
            )
            .probe(
                Probe::files(
                    "Barrel Exports (index.ts)",
                    FileQuery::new().named(r"(^|/)index\.ts$"),
                )
                .limit(20),
            ),
    }
}

/// `auth [aspect]`
pub fn auth(aspect: Option<&str>) -> Plan {
    match filter_arg(aspect) {
        Some(aspect) => Plan::new("auth")
            .lead(format!("Auth code related to: {}", aspect))
            .field("aspect", aspect)
            .probe(
                Probe::search("Auth Matches", SearchQuery::new(aspect).glob(SOURCE_GLOB))
                    .filter(LineFilter::AnyKeyword(
                        AUTH_KEYWORDS.iter().map(|k| k.to_string()).collect(),
                    ))
                    .limit(30)
                    .empty_label("auth-related matches"),
            ),
        None => Plan::new("auth")
            .header("Authentication Code")
            .probe(
                Probe::files(
                    "Auth Files",
                    FileQuery::new().glob(SOURCE_GLOB).named("auth|login|session"),
                )
                .limit(20),
            )
            .probe(
                Probe::search(
                    "Session Handling",
                    ts_js("(session|getSession|createSession|destroySession)"),
                )
                .limit(20),
            )
            .probe(
                Probe::search(
                    "Token Operations",
                    ts_js("(token|jwt|accessToken|refreshToken|bearer)").ignore_case(),
                )
                .limit(15),
            )
            .probe(
                Probe::search(
                    "Heartwood/GroveAuth",
                    ts_js("(heartwood|groveauth|GroveAuth)").ignore_case(),
                )
                .limit(15),
            ),
    }
}
