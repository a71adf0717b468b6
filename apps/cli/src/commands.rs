//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use keypeople_core::pipeline::{ProgressReporter, RunConfig, ScreeningReport};
use keypeople_graph::GraphClient;
use keypeople_report::ReportFormat;
use keypeople_screening::{ScreeningClient, SearchDefaults};
use keypeople_shared::{AppConfig, Credentials, init_config, load_config, resolve_credentials};
use tracing::info;
use url::Url;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// keypeople — screen a company's beneficial owners against watchlists.
#[derive(Parser)]
#[command(
    name = "keypeople",
    version,
    about = "Screen a company's ultimate beneficial owners against PEP/sanctions watchlists.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

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
    /// Run the screening pipeline for a company and render the report.
    Screen {
        /// Upstream company id to screen.
        company_id: i64,

        /// Ownership-percentage filter threshold (overrides config).
        #[arg(long)]
        threshold: Option<f64>,

        /// Report format: md or html.
        #[arg(long, default_value = "md")]
        format: String,

        /// Output directory for the report file (defaults to config).
        #[arg(short, long)]
        out: Option<String>,

        /// Print the summary table only; skip writing the report file.
        #[arg(long)]
        no_report: bool,
    },

    /// Fetch the raw compliance profile for a watchlist resource id.
    Profile {
        /// Resource id from a previous screening run.
        resource_id: String,
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

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "keypeople=info",
        1 => "keypeople=debug",
        _ => "keypeople=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Screen {
            company_id,
            threshold,
            format,
            out,
            no_report,
        } => cmd_screen(company_id, threshold, &format, out.as_deref(), no_report).await,
        Command::Profile { resource_id } => cmd_profile(&resource_id).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// screen
// ---------------------------------------------------------------------------

async fn cmd_screen(
    company_id: i64,
    threshold: Option<f64>,
    format: &str,
    out: Option<&str>,
    no_report: bool,
) -> Result<()> {
    // Resolve config and credentials before any network call
    let config = load_config()?;
    let creds = resolve_credentials(&config)?;

    let report_format = match format {
        "md" | "markdown" => ReportFormat::Markdown,
        "html" => ReportFormat::Html,
        other => return Err(eyre!("invalid format '{other}': expected 'md' or 'html'")),
    };

    let ownership_threshold = threshold.unwrap_or(config.filter.ownership_threshold);

    let (graph, screening) = build_clients(&config, &creds)?;

    let run_config = RunConfig {
        company_id,
        ownership_threshold,
    };

    info!(company_id, ownership_threshold, "screening company");

    let reporter = CliProgress::new();
    let report =
        keypeople_core::pipeline::run_screening(&run_config, &graph, &screening, &reporter)
            .await?;

    print_summary(&report);

    if !no_report {
        let out_dir = resolve_output_dir(out, &config)?;
        let path = keypeople_report::write_report(
            &out_dir,
            &report.company,
            &report.rows,
            report_format,
        )?;
        println!("  Report: {}", path.display());
        println!();
    }

    Ok(())
}

/// Build both API clients from config and resolved credentials.
fn build_clients(
    config: &AppConfig,
    creds: &Credentials,
) -> Result<(GraphClient, ScreeningClient)> {
    Url::parse(&creds.graph_url)
        .map_err(|e| eyre!("invalid graph endpoint URL '{}': {e}", creds.graph_url))?;
    Url::parse(&creds.watchlist_url)
        .map_err(|e| eyre!("invalid watchlist endpoint URL '{}': {e}", creds.watchlist_url))?;

    let graph = GraphClient::new(
        creds.graph_url.clone(),
        creds.graph_key.clone(),
        config.graph.timeout_secs,
    )?;

    let screening = ScreeningClient::new(
        creds.watchlist_url.clone(),
        creds.watchlist_key.clone(),
        config.watchlist.timeout_secs,
        SearchDefaults {
            threshold: config.watchlist.match_threshold,
            countries: config.watchlist.countries.clone(),
            datasets: config.watchlist.datasets.clone(),
        },
    )?;

    Ok((graph, screening))
}

/// Print the company header and the owner summary table to stdout.
fn print_summary(report: &ScreeningReport) {
    println!();
    println!("  {}", report.company.display_name);
    println!("  Key People Screening Report");
    println!();
    println!(
        "  Owners: {} total, {} screened",
        report.owners_total, report.owners_screened
    );
    println!();
    println!(
        "  {:<24} {:>10} {:>8}  {:<24} {:>10}  {}",
        "Owner", "Own. %", "Degrees", "Matched Name", "Confidence", "Datasets"
    );

    for row in &report.rows {
        println!(
            "  {:<24} {:>10} {:>8}  {:<24} {:>10}  {}",
            row.owner_name,
            row.ownership_percentage,
            row.degree_of_separation,
            row.matched_name.as_deref().unwrap_or("—"),
            row.match_confidence
                .map(|s| s.to_string())
                .unwrap_or_else(|| "—".into()),
            row.datasets.join(", "),
        );
    }

    println!();
    println!("  Time: {:.1}s", report.elapsed.as_secs_f64());
    println!();
}

/// Resolve the report output directory: flag > config, with `~` expansion.
fn resolve_output_dir(out: Option<&str>, config: &AppConfig) -> Result<PathBuf> {
    let raw = out.unwrap_or(&config.report.output_dir);

    if let Some(stripped) = raw.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or_else(|| eyre!("cannot determine home directory"))?;
        Ok(home.join(stripped))
    } else {
        Ok(PathBuf::from(raw))
    }
}

// ---------------------------------------------------------------------------
// profile
// ---------------------------------------------------------------------------

async fn cmd_profile(resource_id: &str) -> Result<()> {
    let config = load_config()?;
    let creds = resolve_credentials(&config)?;
    let (_, screening) = build_clients(&config, &creds)?;

    info!(resource_id, "fetching compliance profile");

    let profile = screening.fetch_profile(resource_id).await?;
    println!("{}", serde_json::to_string_pretty(&profile)?);

    Ok(())
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
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
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn owner_screened(&self, name: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Screening [{current}/{total}] {name}"));
    }

    fn done(&self, _report: &ScreeningReport) {
        self.spinner.finish_and_clear();
    }
}
