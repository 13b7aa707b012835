use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconSummary {
    pub domain: String,
    pub output_dir: PathBuf,
    pub subdomains: usize,
    pub archive_urls: usize,
    pub sensitive: Option<usize>,
    pub params: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(ReconSummary),
    /// The user declined to overwrite existing results.
    Aborted,
}
