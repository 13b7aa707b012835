use time::macros::format_description;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthStr;

pub const BANNER: &str = r"
    ____  __  __            __
   / __ )/ / / /_  ______  / /___  __
  / __  / /_/ / / / / __ \/ __/ / / /
 / /_/ / __  / /_/ / / / / /_/ /_/ /
/_____/_/ /_/\__,_/_/ /_/\__/\__, /
                            /____/
";

pub fn setup_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let timer = LocalTime::new(format_description!(
        "[hour]:[minute]:[second].[subsecond digits:3]"
    ));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn print_banner() {
    println!("{}", BANNER);
}

pub fn format_number(num: usize) -> String {
    let digits = num.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `"s"` unless `count` is exactly one.
pub fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

pub fn draw_box(msg: &str) -> String {
    let width = UnicodeWidthStr::width(msg) + 2;
    let border = format!("+{}+", "-".repeat(width));
    format!("{border}\n| {msg} |\n{border}")
}

pub fn validate_args(args: &crate::args::Args) -> anyhow::Result<()> {
    if args.workers == 0 {
        anyhow::bail!("--workers must be greater than 0");
    }

    if args.timeout == 0 {
        anyhow::bail!("--timeout must be greater than 0");
    }

    Ok(())
}
