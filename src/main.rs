use anyhow::Result;
use bhunty::{confirm, init_default_keywords, run_recon, utils, Args, ReconConfig, RunOutcome, SystemRunner};
use clap::CommandFactory;
use std::io;
use tracing::{error, info};

fn fail(e: anyhow::Error) -> ! {
    info!(action = "fail", component = "main", "Error: {:#}", e);
    eprintln!("[-] {:#}", e);
    std::process::exit(1);
}

fn main() -> Result<()> {
    let args = match Args::try_parse_lenient() {
        Ok(args) => args,
        // --help and --version print to stdout and exit 0
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => fail(e.into()),
    };
    utils::setup_logging(args.verbose);

    if args.init {
        return init_default_keywords();
    }

    if args.target.is_none() {
        Args::command().print_help()?;
        return Ok(());
    }

    if let Err(e) = utils::validate_args(&args) {
        fail(e);
    }

    // Ctrl-C while the overwrite prompt is waiting is a clean abort.
    if let Err(e) = ctrlc::set_handler(|| {
        if confirm::prompt_active() {
            println!("\n[*] Scan aborted by user.");
            std::process::exit(0);
        }
        std::process::exit(130);
    }) {
        error!("Failed to install Ctrl-C handler: {}", e);
    }

    let config = match ReconConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => fail(e),
    };

    match run_recon(&config, &SystemRunner, &mut io::stdin().lock()) {
        Ok(RunOutcome::Completed(summary)) => {
            info!(action = "finish", component = "main", summary = ?summary, "Run finished");
            Ok(())
        }
        Ok(RunOutcome::Aborted) => Ok(()),
        Err(e) => fail(e),
    }
}
