//! SvelteKit routes, filtered route listings and auth guards

use super::{filter_arg, Plan};
use crate::core::query::{FileQuery, SearchQuery};
use crate::probes::{LineFilter, Probe};

fn route_files(title: &str, glob: &str) -> Probe {
    Probe::files(title, FileQuery::new().glob(glob))
}

/// `routes [pattern] [--guards]`
pub fn plan(pattern: Option<&str>, guards: bool) -> Plan {
    if guards {
        return guard_plan();
    }
    match filter_arg(pattern) {
        Some(pattern) => Plan::new("routes")
            .lead(format!("SvelteKit routes matching: {}", pattern))
            .field("pattern", pattern)
            .probe(
                route_files("Page Routes", "**/+page.svelte")
                    .filter(LineFilter::Contains(pattern.to_string()))
                    .limit(30)
                    .empty_label("matching page routes"),
            )
            .probe(
                route_files("API Routes", "**/+server.ts")
                    .filter(LineFilter::Contains(pattern.to_string()))
                    .limit(30)
                    .empty_label("matching api routes"),
            ),
        None => Plan::new("routes")
            .header("SvelteKit Routes")
            .probe(route_files("Page Routes", "**/+page.svelte").limit(30).show_total())
            .probe(route_files("API Routes", "**/+server.ts").limit(30).show_total())
            .probe(route_files("Layouts", "**/+layout.svelte").limit(20))
            .probe(route_files("Error Pages", "**/+error.svelte").limit(20)),
    }
}

fn guard_plan() -> Plan {
    Plan::new("routes")
        .header("Route Guards (Auth/Redirect)")
        .field("mode", "guards")
        .probe(
            Probe::search(
                "Server Load Functions with Auth",
                SearchQuery::new(r"(redirect|session|auth|locals\.user|locals\.session)")
                    .glob("**/+page.server.ts")
                    .glob("**/+layout.server.ts"),
            )
            .limit(30)
            .empty_label("auth guards"),
        )
        .probe(
            Probe::search(
                "Auth Hooks (hooks.server.ts)",
                SearchQuery::new("(handle|auth|session|redirect)").glob("**/hooks.server.ts"),
            )
            .limit(20)
            .empty_label("auth hooks"),
        )
        .probe(
            Probe::search(
                "Protected Routes",
                SearchQuery::new(r"redirect|session|locals\.user")
                    .glob("**/+page.server.ts")
                    .files_with_matches(),
            )
            .filter(LineFilter::Exclude("node_modules".to_string()))
            .limit(15)
            .show_total(),
        )
}
