//! CLI command definitions, routing, and tracing setup.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use coursecatalog_core::pipeline::{self, BatchPolicy, ProgressReporter, TermReport};
use coursecatalog_crawler::CatalogClient;
use coursecatalog_shared::{
    AcademicTerm, AppConfig, CatalogError, init_config, load_config, load_config_from,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// coursecatalog: export a department's course listing as CSV.
#[derive(Parser)]
#[command(
    name = "coursecatalog",
    version,
    about = "Export required undergraduate courses from the course catalog as CSV.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.coursecatalog/coursecatalog.toml.
    #[arg(long, global = true, env = "COURSECATALOG_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Export one academic year/term. Prompts for anything not given.
    Fetch {
        /// Academic year in the ROC calendar (e.g. 112).
        #[arg(short, long)]
        year: Option<String>,

        /// Term: 1 (fall) or 2 (spring).
        #[arg(short, long)]
        term: Option<String>,

        /// Output directory (defaults to config `output.dir`).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Export every term of a range of academic years.
    Batch {
        /// First year (defaults to config `batch.start_year`).
        #[arg(long)]
        from: Option<u32>,

        /// Last year, inclusive (defaults to config `batch.end_year` or the current year).
        #[arg(long)]
        to: Option<u32>,

        /// Output directory (defaults to config `output.dir`).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Stop at the first failed term instead of skipping it.
        #[arg(long)]
        fail_fast: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Crates whose events are shown by default.
const LOG_TARGETS: [&str; 4] = [
    "coursecatalog",
    "coursecatalog_core",
    "coursecatalog_crawler",
    "coursecatalog_shared",
];

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone();
    match cli.command {
        Command::Fetch { year, term, out } => {
            let config = resolve_config(config_path.as_deref())?;
            cmd_fetch(&config, year, term, out).await
        }
        Command::Batch {
            from,
            to,
            out,
            fail_fast,
        } => {
            let config = resolve_config(config_path.as_deref())?;
            cmd_batch(&config, from, to, out, fail_fast).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path.as_deref()),
        },
    }
}

/// Load the config from `--config` if given, else the default location.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

fn output_dir(config: &AppConfig, out: Option<PathBuf>) -> PathBuf {
    out.unwrap_or_else(|| PathBuf::from(&config.output.dir))
}

// ---------------------------------------------------------------------------
// Interactive input
// ---------------------------------------------------------------------------

/// Print `prompt` and read one trimmed line from stdin.
fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    std::io::stdout().flush()?;

    let mut line = String::new();
    let read = std::io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Err(eyre!("no input received for: {}", prompt.trim()));
    }
    Ok(line.trim().to_string())
}

/// Use the flag value when present, otherwise ask the operator.
fn value_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => prompt_line(prompt),
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_fetch(
    config: &AppConfig,
    year: Option<String>,
    term: Option<String>,
    out: Option<PathBuf>,
) -> Result<()> {
    let year = value_or_prompt(year, "請輸入學年 (例如: 112): ")?;
    let term = value_or_prompt(term, "請輸入學期 (1 為上學期, 2 為下學期): ")?;

    // Invalid year/term is fatal before any request is made
    let academic_term = AcademicTerm::parse(&year, &term)?;
    let out_dir = output_dir(config, out);

    let client = CatalogClient::new(&config.catalog)?;
    info!(
        term = %academic_term,
        url = %client.listing_url(&academic_term)?,
        "exporting course listing"
    );

    let reporter = CliProgress::new();
    let result = pipeline::run_term(&client, &academic_term, &out_dir, &reporter).await;
    reporter.spinner.finish_and_clear();
    let report = result.map_err(transport_hint)?;

    print_term_summary(&report);
    Ok(())
}

async fn cmd_batch(
    config: &AppConfig,
    from: Option<u32>,
    to: Option<u32>,
    out: Option<PathBuf>,
    fail_fast: bool,
) -> Result<()> {
    let start = from.unwrap_or(config.batch.start_year);
    let end = to.unwrap_or_else(|| config.batch.end_year_or_current());
    if start > end {
        return Err(eyre!("invalid year range: {start} is after {end}"));
    }

    let policy = if fail_fast || config.batch.fail_fast {
        BatchPolicy::Abort
    } else {
        BatchPolicy::Continue
    };

    let terms = AcademicTerm::range(start, end);
    let out_dir = output_dir(config, out);
    let client = CatalogClient::new(&config.catalog)?;

    info!(start, end, terms = terms.len(), ?policy, "starting batch export");

    let reporter = CliProgress::new();
    let result = pipeline::run_batch(&client, &terms, &out_dir, policy, &reporter).await;
    reporter.spinner.finish_and_clear();
    let report = result.map_err(transport_hint)?;

    println!();
    println!("  Batch export finished");
    println!("  Written: {}", report.completed.len());
    for done in &report.completed {
        println!("    {} ({} courses)", done.path.display(), done.accepted);
    }
    println!("  Failed:  {}", report.failed.len());
    for (term, err) in &report.failed {
        println!("    {term}: {err}");
    }
    println!();

    if report.is_clean() {
        Ok(())
    } else {
        Err(eyre!(
            "{} of {} terms failed",
            report.failed.len(),
            terms.len()
        ))
    }
}

/// Attach an operator hint to transport failures.
fn transport_hint(err: CatalogError) -> color_eyre::eyre::Report {
    match &err {
        CatalogError::Http { .. } | CatalogError::Network(_) => eyre!(
            "{err}\n請檢查學年學期是否正確，或網路連線是否正常。 \
             (check the year/term and your network connection)"
        ),
        _ => err.into(),
    }
}

fn print_term_summary(report: &TermReport) {
    println!();
    println!("  Course listing exported!");
    println!("  Term:     {}", report.term);
    println!("  Courses:  {}", report.accepted);
    println!(
        "  Skipped:  {} graduate, {} elective",
        report.rejected_graduate, report.rejected_elective
    );
    println!("  Path:     {}", report.path.display());
    println!("  Time:     {:.1}s", report.elapsed.as_secs_f64());
    println!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, term: &AcademicTerm, name: &str) {
        self.spinner.set_message(format!("[{term}] {name}"));
    }

    fn term_done(&self, report: &TermReport) {
        self.spinner.println(format!(
            "  ✓ {} → {} ({} courses)",
            report.term,
            report.path.display(),
            report.accepted
        ));
    }

    fn term_failed(&self, term: &AcademicTerm, err: &CatalogError) {
        self.spinner.println(format!("  ✗ {term}: {err}"));
    }
}

// ---------------------------------------------------------------------------
// Config commands
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
