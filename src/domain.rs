use anyhow::{bail, Context, Result};
use regex::Regex;
use tracing::info;
use url::Url;

const DEFAULT_SCHEME: &str = "http://";
const HOST_PATTERN: &str = r"^[A-Za-z0-9.-]+$";

/// Returns the host component of `raw`, which may be a bare domain or a URL.
/// A missing scheme is treated as `http://`; userinfo and port are dropped.
pub fn extract_host(raw: &str) -> &str {
    let rest = match raw.find("://") {
        Some(idx) => &raw[idx + 3..],
        None => raw,
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host_port)| host_port);

    match host_port.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => host_port,
    }
}

/// Turns user input into the canonical domain used as the result-store key.
///
/// The host text is kept exactly as typed, so an already-canonical domain
/// comes back unchanged.
pub fn normalize_domain(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let host = extract_host(raw);

    if host.is_empty() {
        bail!("Invalid domain or URL: {:?} (no host)", raw);
    }

    let pattern = Regex::new(HOST_PATTERN).context("Failed to compile host pattern")?;
    if !pattern.is_match(host) {
        bail!("Invalid domain or URL: {:?}", raw);
    }

    // One trailing dot is a fully-qualified name; any other empty label
    // (".", "..", ".example.com", "a..b") is not a host.
    let labels = host.strip_suffix('.').unwrap_or(host);
    if labels.split('.').any(str::is_empty) {
        bail!("Invalid domain or URL: {:?} (empty label)", raw);
    }

    let parsed = Url::parse(&format!("{DEFAULT_SCHEME}{host}/"))
        .with_context(|| format!("Invalid domain or URL: {:?}", raw))?;
    if parsed.host_str().is_none() {
        bail!("Invalid domain or URL: {:?} (no host)", raw);
    }

    info!(
        action = "normalize",
        component = "domain",
        input = raw,
        domain = host,
        "Target domain resolved"
    );
    Ok(host.to_string())
}
