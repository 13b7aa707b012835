use anyhow::{Context, Result};
use regex::Regex;
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::info;

use crate::store::{ResultStore, PARAMS_FILE, SENSITIVE_FILE, WAYBACK_FILE};
use crate::utils::{format_number, plural};

/// Case-insensitive substring matcher over a fixed keyword list.
#[derive(Debug, Clone)]
pub struct SensitiveMatcher {
    regex: Regex,
    keyword_count: usize,
}

impl SensitiveMatcher {
    pub fn new(keywords: &[String]) -> Result<Self> {
        if keywords.is_empty() {
            anyhow::bail!("No sensitive keywords configured");
        }

        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let regex = Regex::new(&format!("(?i)(?:{alternation})"))
            .context("Failed to compile sensitive keyword matcher")?;

        Ok(Self {
            regex,
            keyword_count: keywords.len(),
        })
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    pub fn keyword_count(&self) -> usize {
        self.keyword_count
    }
}

/// Crude query-string check: the line has a `?` and an `=` somewhere.
pub fn has_query_params(line: &str) -> bool {
    line.contains('?') && line.contains('=')
}

pub fn filter_sensitive<'a, I>(lines: I, matcher: &SensitiveMatcher) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    lines
        .into_iter()
        .filter(|line| matcher.is_match(line))
        .cloned()
        .collect()
}

pub fn filter_params<'a, I>(lines: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    lines
        .into_iter()
        .filter(|line| has_query_params(line))
        .cloned()
        .collect()
}

/// Re-reads the archive URL file and writes the keyword hits to `sensitive.txt`.
pub fn scan_sensitive(store: &ResultStore, keywords: &[String]) -> Result<BTreeSet<String>> {
    let start_time = Instant::now();
    let matcher = SensitiveMatcher::new(keywords)?;
    let urls = store.read_lines(WAYBACK_FILE)?;

    let hits = filter_sensitive(&urls, &matcher);
    let path = store.write_lines(SENSITIVE_FILE, &hits)?;

    info!(
        action = "complete",
        component = "sensitive_filter",
        keyword_count = matcher.keyword_count(),
        scanned = urls.len(),
        matched = hits.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Sensitive keyword scan completed"
    );
    println!(
        "\n🔍 Found {} potentially sensitive URL{}.",
        format_number(hits.len()),
        plural(hits.len())
    );
    println!(" - Sensitive matches saved to: {}", path.display());
    Ok(hits)
}

/// Re-reads the archive URL file and writes parameterised URLs to `params.txt`.
pub fn extract_params(store: &ResultStore) -> Result<BTreeSet<String>> {
    println!("[*] Extracting URLs with parameters...");
    let urls = store.read_lines(WAYBACK_FILE)?;

    let hits = filter_params(&urls);
    let path = store.write_lines(PARAMS_FILE, &hits)?;

    info!(
        action = "complete",
        component = "param_filter",
        scanned = urls.len(),
        matched = hits.len(),
        "Parameter extraction completed"
    );
    println!(
        "🔍 Found {} URL{} with parameters.",
        format_number(hits.len()),
        plural(hits.len())
    );
    println!(" - Parameterized URLs saved to: {}", path.display());
    Ok(hits)
}
