use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::info;

use crate::config::ReconConfig;
use crate::invoker::{CommandRunner, ToolCommand};
use crate::store::{ResultStore, WAYBACK_FILE};

pub fn waybackurls_command(program: &str, subdomain: &str, timeout: Duration) -> ToolCommand {
    ToolCommand::new(program, [format!("https://{subdomain}")])
        .silent()
        .with_timeout(timeout)
}

/// Retrieves archived URLs for every subdomain on a pool of `workers`
/// threads and returns their sorted, deduplicated union.
///
/// Per-thread partial sets are folded then reduced, so the result does not
/// depend on the worker count or on completion order.
pub fn collect_archive_urls<R: CommandRunner + Sync>(
    subdomains: &BTreeSet<String>,
    program: &str,
    timeout: Duration,
    workers: usize,
    runner: &R,
) -> Result<BTreeSet<String>> {
    let start_time = Instant::now();
    let total = subdomains.len();
    info!(
        action = "start",
        component = "archive_collection",
        subdomain_count = total,
        worker_count = workers,
        timeout_ms = timeout.as_millis(),
        "Starting archive URL retrieval"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|i| format!("archive-{i}"))
        .build()
        .context("Failed to build archive worker pool")?;

    let completed = AtomicUsize::new(0);
    let targets: Vec<&String> = subdomains.iter().collect();

    let urls = pool.install(|| {
        targets
            .into_par_iter()
            .fold(BTreeSet::new, |mut acc, subdomain| {
                let output = runner.run(&waybackurls_command(program, subdomain, timeout));
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                println!("  🌐 {} [{}/{}]", subdomain, done, total);
                acc.extend(output.lines);
                acc
            })
            .reduce(BTreeSet::new, |mut left, mut right| {
                if left.len() < right.len() {
                    std::mem::swap(&mut left, &mut right);
                }
                left.extend(right);
                left
            })
    });

    info!(
        action = "complete",
        component = "archive_collection",
        unique_urls = urls.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Archive URL retrieval completed"
    );
    Ok(urls)
}

/// Collects archive URLs for all subdomains and writes `waybackurls.txt` once.
pub fn fetch_waybackurls<R: CommandRunner + Sync>(
    config: &ReconConfig,
    runner: &R,
    store: &ResultStore,
    subdomains: &BTreeSet<String>,
) -> Result<(PathBuf, usize)> {
    println!("[*] Fetching Wayback URLs...");
    let urls = collect_archive_urls(
        subdomains,
        &config.tools.waybackurls,
        config.archive_timeout,
        config.workers,
        runner,
    )?;
    let path = store.write_lines(WAYBACK_FILE, &urls)?;
    Ok((path, urls.len()))
}
