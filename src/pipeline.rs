use anyhow::Result;
use std::io::{self, BufRead};
use std::time::Instant;
use tracing::info;

use crate::config::ReconConfig;
use crate::invoker::CommandRunner;
use crate::stats::{ReconSummary, RunOutcome};
use crate::store::{ResultStore, SUBDOMAINS_FILE};
use crate::{archive, confirm, filters, keywords, subdomains, utils};

/// Runs the whole recon pipeline for `config.domain`.
///
/// `answers` feeds the overwrite confirmation; it is only read when the
/// result directory is already populated and `force` is off.
pub fn run_recon<R, I>(config: &ReconConfig, runner: &R, answers: &mut I) -> Result<RunOutcome>
where
    R: CommandRunner + Sync,
    I: BufRead,
{
    let total_start_time = Instant::now();
    let store = ResultStore::new(&config.output_root, &config.domain);

    if store.is_populated() && !config.force {
        let accepted = confirm::confirm_overwrite(store.dir(), answers, &mut io::stdout())?;
        if !accepted {
            info!(action = "abort", component = "pipeline", dir = ?store.dir(), "Overwrite declined");
            println!("[*] Scan aborted by user.");
            return Ok(RunOutcome::Aborted);
        }
    }

    // Resolve keywords before any tool runs so a bad keyword file fails fast.
    let sensitive_keywords = if config.sensitive {
        Some(keywords::load_keywords(config.keywords_file.as_deref())?)
    } else {
        None
    };

    store.prepare()?;
    info!(action = "start", component = "pipeline", domain = %config.domain, dir = ?store.dir(), "Starting recon");

    utils::print_banner();
    let subs = subdomains::find_subdomains(config, runner, &store)?;
    let (wayback_path, archive_urls) = archive::fetch_waybackurls(config, runner, &store, &subs)?;
    println!(
        "\n[✓] Saved:\n - Subdomains: {}\n - WaybackURLs: {}",
        store.path(SUBDOMAINS_FILE).display(),
        wayback_path.display()
    );

    let sensitive = match sensitive_keywords {
        Some(list) => Some(filters::scan_sensitive(&store, &list)?.len()),
        None => None,
    };
    let params = if config.param {
        Some(filters::extract_params(&store)?.len())
    } else {
        None
    };

    info!(
        action = "complete",
        component = "pipeline",
        subdomains = subs.len(),
        archive_urls,
        duration_ms = total_start_time.elapsed().as_millis(),
        "Recon completed"
    );

    Ok(RunOutcome::Completed(ReconSummary {
        domain: config.domain.clone(),
        output_dir: store.dir().to_path_buf(),
        subdomains: subs.len(),
        archive_urls,
        sensitive,
        params,
    }))
}
