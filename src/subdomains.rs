use anyhow::Result;
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::{ReconConfig, ScopePolicy};
use crate::invoker::{CommandRunner, ToolCommand};
use crate::store::{ResultStore, SUBDOMAINS_FILE};
use crate::utils::{draw_box, format_number, plural};

pub fn subfinder_command(program: &str, domain: &str) -> ToolCommand {
    ToolCommand::new(program, ["-all", "-silent", "-d", domain]).silent()
}

pub fn assetfinder_command(program: &str, domain: &str) -> ToolCommand {
    ToolCommand::new(program, ["--subs-only", domain]).silent()
}

/// Merges both enumerators' lines. A tool whose scope flag is set only
/// contributes lines containing `domain`.
pub fn merge_subdomains(
    domain: &str,
    primary: Vec<String>,
    secondary: Vec<String>,
    scope: ScopePolicy,
) -> BTreeSet<String> {
    let in_scope = |filter: bool, line: &str| !filter || line.contains(domain);

    primary
        .into_iter()
        .filter(|line| in_scope(scope.filter_primary, line))
        .chain(
            secondary
                .into_iter()
                .filter(|line| in_scope(scope.filter_secondary, line)),
        )
        .collect()
}

/// Runs both enumerators for the configured domain.
pub fn collect_subdomains<R: CommandRunner>(config: &ReconConfig, runner: &R) -> BTreeSet<String> {
    let start_time = Instant::now();
    info!(action = "start", component = "subdomain_collection", domain = %config.domain, "Starting subdomain enumeration");

    let primary = runner.run(&subfinder_command(&config.tools.subfinder, &config.domain));
    if !primary.ok {
        warn!(action = "enumerate", component = "subdomain_collection", tool = %config.tools.subfinder, "Primary enumerator produced no usable output");
    }
    let secondary = runner.run(&assetfinder_command(&config.tools.assetfinder, &config.domain));
    if !secondary.ok {
        warn!(action = "enumerate", component = "subdomain_collection", tool = %config.tools.assetfinder, "Secondary enumerator produced no usable output");
    }

    let (primary_count, secondary_count) = (primary.lines.len(), secondary.lines.len());
    let subdomains = merge_subdomains(&config.domain, primary.lines, secondary.lines, config.scope);

    info!(
        action = "complete",
        component = "subdomain_collection",
        primary_lines = primary_count,
        secondary_lines = secondary_count,
        unique_subdomains = subdomains.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Subdomain enumeration completed"
    );
    subdomains
}

/// Collects, writes `subdomains.txt`, and fails the run when nothing was found.
pub fn find_subdomains<R: CommandRunner>(
    config: &ReconConfig,
    runner: &R,
    store: &ResultStore,
) -> Result<BTreeSet<String>> {
    println!("[*] Finding subdomains...");
    let subdomains = collect_subdomains(config, runner);
    store.write_lines(SUBDOMAINS_FILE, &subdomains)?;

    if subdomains.is_empty() {
        anyhow::bail!("No subdomains found for {}", config.domain);
    }

    println!(
        "{}",
        draw_box(&format!(
            "✅  Found {} subdomain{} for {}",
            format_number(subdomains.len()),
            plural(subdomains.len()),
            config.domain
        ))
    );
    Ok(subdomains)
}
