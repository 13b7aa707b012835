use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::utils::BANNER;

#[derive(Parser, Debug)]
#[command(
    name = "bhunty",
    about = "Automated recon: subdomains + Wayback URLs + optional sensitive keyword scan and parameter extraction",
    version,
    before_help = BANNER,
    after_help = "OUTPUT:\n  results/<domain>/subdomains.txt\n  results/<domain>/waybackurls.txt\n  results/<domain>/sensitive.txt (if --sensitive)\n  results/<domain>/params.txt (if --param)",
    long_about = None
)]
pub struct Args {
    /// Target domain or URL
    pub target: Option<String>,

    /// Stray positional tokens, accepted and ignored
    #[arg(hide = true)]
    pub extra: Vec<String>,

    /// Scan Wayback URLs for sensitive keywords
    #[arg(long)]
    pub sensitive: bool,

    /// Extract URLs with GET parameters
    #[arg(long)]
    pub param: bool,

    /// Overwrite an existing result folder without asking
    #[arg(short, long)]
    pub force: bool,

    /// Number of concurrent archive lookups
    #[arg(short, long, default_value_t = 20)]
    pub workers: usize,

    /// Per-subdomain archive lookup timeout in seconds
    #[arg(short, long, default_value_t = 50)]
    pub timeout: u64,

    /// Root directory for per-domain results
    #[arg(short, long, default_value = "results")]
    pub output_dir: PathBuf,

    /// Path to custom sensitive keyword file
    #[arg(short, long)]
    pub keywords: Option<PathBuf>,

    /// Require the target domain in the primary enumerator's output too
    #[arg(long)]
    pub strict_scope: bool,

    /// Primary subdomain enumerator executable
    #[arg(long, default_value = "subfinder")]
    pub subfinder_bin: String,

    /// Secondary subdomain enumerator executable
    #[arg(long, default_value = "assetfinder")]
    pub assetfinder_bin: String,

    /// Archive URL retriever executable
    #[arg(long, default_value = "waybackurls")]
    pub waybackurls_bin: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Initialize sensitive_keywords.txt with default keywords
    #[arg(long)]
    pub init: bool,
}

impl Args {
    /// Parses the process arguments, dropping option tokens the CLI does not know.
    pub fn try_parse_lenient() -> Result<Self, clap::Error> {
        Self::try_parse_from(retain_known_flags(std::env::args_os()))
    }
}

/// Short and long option names the CLI understands.
struct KnownFlags {
    longs: Vec<String>,
    switches: Vec<char>,
    valued: Vec<char>,
}

impl KnownFlags {
    fn collect() -> Self {
        let command = Args::command();
        let mut known = Self {
            longs: vec!["help".to_string(), "version".to_string()],
            switches: vec!['h', 'V'],
            valued: Vec::new(),
        };
        for arg in command.get_arguments() {
            if let Some(long) = arg.get_long() {
                known.longs.push(long.to_string());
            }
            if let Some(short) = arg.get_short() {
                if arg.get_action().takes_values() {
                    known.valued.push(short);
                } else {
                    known.switches.push(short);
                }
            }
        }
        known
    }

    fn knows_long(&self, body: &str) -> bool {
        let name = body.split_once('=').map_or(body, |(name, _)| name);
        !name.is_empty() && self.longs.iter().any(|long| long == name)
    }

    /// A short cluster is kept when it is made of switches only, optionally
    /// ending in one value-taking short that is either bare (`-w`) or carries
    /// a numeric value (`-w5`). Anything else, such as `-threads`, is foreign.
    fn knows_short_cluster(&self, cluster: &str) -> bool {
        let mut chars = cluster.char_indices();
        while let Some((idx, c)) = chars.next() {
            if self.switches.contains(&c) {
                continue;
            }
            if self.valued.contains(&c) {
                let value = &cluster[idx + c.len_utf8()..];
                return value.chars().all(|v| v.is_ascii_digit());
            }
            return false;
        }
        true
    }
}

/// Filters an argv so that unrecognised `-x`/`--xyz` tokens are discarded
/// instead of failing the parse. The first token (program name) is kept.
/// A bare `--` is dropped too, so flags count wherever they appear.
pub fn retain_known_flags<I, T>(raw: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let known = KnownFlags::collect();
    let mut tokens = raw.into_iter().map(Into::into);
    let mut kept: Vec<OsString> = tokens.next().into_iter().collect();

    for token in tokens {
        let keep = match token.to_str() {
            Some(text) if text.starts_with("--") => known.knows_long(&text[2..]),
            Some(text) if text.len() > 1 && text.starts_with('-') => {
                known.knows_short_cluster(&text[1..])
            }
            _ => true,
        };
        if keep {
            kept.push(token);
        }
    }

    kept
}
