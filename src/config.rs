use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::{domain, Args};

pub const DEFAULT_WORKERS: usize = 20;
pub const DEFAULT_ARCHIVE_TIMEOUT: Duration = Duration::from_secs(50);

/// Executables for the three external collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSet {
    pub subfinder: String,
    pub assetfinder: String,
    pub waybackurls: String,
}

impl Default for ToolSet {
    fn default() -> Self {
        Self {
            subfinder: "subfinder".to_string(),
            assetfinder: "assetfinder".to_string(),
            waybackurls: "waybackurls".to_string(),
        }
    }
}

/// Which enumerator's output must contain the target domain to be kept.
///
/// The primary enumerator (subfinder) is trusted by default; the secondary
/// one (assetfinder) is filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopePolicy {
    pub filter_primary: bool,
    pub filter_secondary: bool,
}

impl Default for ScopePolicy {
    fn default() -> Self {
        Self {
            filter_primary: false,
            filter_secondary: true,
        }
    }
}

impl ScopePolicy {
    pub fn strict() -> Self {
        Self {
            filter_primary: true,
            filter_secondary: true,
        }
    }
}

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ReconConfig {
    pub domain: String,
    pub sensitive: bool,
    pub param: bool,
    pub force: bool,
    pub workers: usize,
    pub archive_timeout: Duration,
    pub output_root: PathBuf,
    pub keywords_file: Option<PathBuf>,
    pub scope: ScopePolicy,
    pub tools: ToolSet,
}

impl ReconConfig {
    /// Defaults for `domain`, which must already be canonical.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            sensitive: false,
            param: false,
            force: false,
            workers: DEFAULT_WORKERS,
            archive_timeout: DEFAULT_ARCHIVE_TIMEOUT,
            output_root: PathBuf::from("results"),
            keywords_file: None,
            scope: ScopePolicy::default(),
            tools: ToolSet::default(),
        }
    }

    pub fn from_args(args: &Args) -> Result<Self> {
        let target = args
            .target
            .as_deref()
            .context("No target domain or URL given")?;
        let domain = domain::normalize_domain(target)?;

        Ok(Self {
            domain,
            sensitive: args.sensitive,
            param: args.param,
            force: args.force,
            workers: args.workers,
            archive_timeout: Duration::from_secs(args.timeout),
            output_root: args.output_dir.clone(),
            keywords_file: args.keywords.clone(),
            scope: if args.strict_scope {
                ScopePolicy::strict()
            } else {
                ScopePolicy::default()
            },
            tools: ToolSet {
                subfinder: args.subfinder_bin.clone(),
                assetfinder: args.assetfinder_bin.clone(),
                waybackurls: args.waybackurls_bin.clone(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_from_args_resolves_domain_and_flags() {
        let args = Args::parse_from([
            "bhunty",
            "https://Example.com:8080/app",
            "--sensitive",
            "--strict-scope",
            "--timeout",
            "5",
        ]);
        let config = ReconConfig::from_args(&args).unwrap();
        assert_eq!(config.domain, "Example.com");
        assert!(config.sensitive);
        assert!(!config.param);
        assert_eq!(config.scope, ScopePolicy::strict());
        assert_eq!(config.archive_timeout, Duration::from_secs(5));
        assert_eq!(config.tools, ToolSet::default());
    }

    #[test]
    fn test_from_args_rejects_bad_domain() {
        let args = Args::parse_from(["bhunty", "bad domain!"]);
        assert!(ReconConfig::from_args(&args).is_err());
    }

    #[test]
    fn test_default_scope_trusts_primary() {
        let scope = ScopePolicy::default();
        assert!(!scope.filter_primary);
        assert!(scope.filter_secondary);
    }
}
