pub mod archive;
pub mod args;
pub mod config;
pub mod confirm;
pub mod domain;
pub mod filters;
pub mod invoker;
pub mod keywords;
pub mod pipeline;
pub mod stats;
pub mod store;
pub mod subdomains;
pub mod utils;

pub use args::Args;
pub use config::{ReconConfig, ScopePolicy, ToolSet};
pub use invoker::{CommandRunner, SystemRunner, ToolCommand, ToolOutput};
pub use keywords::init_default_keywords;
pub use pipeline::run_recon;
pub use stats::{ReconSummary, RunOutcome};
