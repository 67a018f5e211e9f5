//! Doctor - Dependency checking

use anyhow::Result;

use crate::backends::process::ProcessRunner;
use crate::backends::rg::RG;
use crate::backends::wrangler::{Wrangler, NPX, WRANGLER};
use crate::core::config::Config;
use crate::core::render::{Renderer, Report, ReportSection};

/// Dependency status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyStatus {
    pub name: String,
    pub available: bool,
    pub command: Option<String>,
    pub required: bool,
    pub notes: Option<String>,
}

impl DependencyStatus {
    pub fn to_line(&self) -> String {
        let status = if self.available { "✓" } else { "✗" };
        let required = if self.required {
            "required"
        } else {
            "optional"
        };

        let mut line = format!(
            "{} {} ({}) - {}",
            status,
            self.name,
            required,
            self.command
                .as_ref()
                .map(|c| format!("found: {}", c))
                .unwrap_or_else(|| "not found".to_string())
        );

        if let Some(notes) = &self.notes {
            line.push_str(&format!(" [{}]", notes));
        }
        line
    }
}

/// Check all dependencies
pub async fn check_dependencies(config: &Config) -> Vec<DependencyStatus> {
    let runner = ProcessRunner::new(config);
    let mut deps = Vec::new();

    // ripgrep (every search command)
    let rg_path = runner.resolve(RG);
    deps.push(DependencyStatus {
        name: "ripgrep".to_string(),
        available: rg_path.is_some(),
        command: rg_path.map(|p| p.display().to_string()),
        required: true,
        notes: Some("Install: brew install ripgrep / cargo install ripgrep".to_string()),
    });

    // wrangler (cf remote only), directly or through npx
    let wrangler = Wrangler::new(runner.clone());
    let available = wrangler.is_available().await;
    let command = match runner.resolve(WRANGLER) {
        Some(path) => Some(path.display().to_string()),
        None if available => Some(format!("{} {}", NPX, WRANGLER)),
        None => None,
    };
    deps.push(DependencyStatus {
        name: "wrangler".to_string(),
        available,
        command,
        required: false,
        notes: Some("Install: npm install -g wrangler".to_string()),
    });

    deps
}

/// Report listing every dependency
pub fn doctor_report(deps: &[DependencyStatus]) -> Report {
    Report {
        command: "doctor".to_string(),
        header: Some("Dependencies".to_string()),
        sections: vec![ReportSection::new(
            "Tools",
            deps.iter().map(DependencyStatus::to_line).collect(),
            deps.len().max(1),
        )],
        ..Default::default()
    }
}

/// Run the doctor command
pub async fn run_doctor(config: &Config) -> Result<()> {
    let deps = check_dependencies(config).await;

    let renderer = Renderer::with_config(config.render_config());
    print!("{}", renderer.render(&doctor_report(&deps)));
    if config.is_json() {
        println!();
    }

    if deps.iter().any(|d| d.required && !d.available) {
        eprintln!("\n⚠️  Some required dependencies are missing!");
    }

    Ok(())
}
