//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use dexsync_catalog::CatalogClient;
use dexsync_core::pipeline::{ProgressReporter, UpdateResult, run_update};
use dexsync_shared::{AppConfig, init_config, load_config, resolve_run};
use dexsync_submission::parse_submission;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// dexsync — merge validated Pokédex submissions into the published dataset.
#[derive(Parser)]
#[command(
    name = "dexsync",
    version,
    about = "Validate pull-request Pokédex submissions against the catalog and merge them into the dataset.",
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
    /// Ingest the submissions of one pull request into the dataset.
    Update {
        /// Pull request number to process.
        pr_number: u64,

        /// Repository as owner/repo (defaults to the configured env var,
        /// normally GITHUB_REPOSITORY).
        #[arg(short, long)]
        repo: Option<String>,

        /// Checkout root the changed paths are resolved against.
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },

    /// Check a single submission file without touching the dataset.
    Validate {
        /// Path to the submission YAML file.
        file: PathBuf,

        /// Checkout root holding the optional dexsync.toml.
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,

        /// Checkout root holding the config file.
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a default dexsync.toml into the checkout root.
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
        0 => "dexsync=info",
        1 => "dexsync=debug",
        _ => "dexsync=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Update {
            pr_number,
            repo,
            root,
        } => cmd_update(pr_number, repo.as_deref(), &root).await,
        Command::Validate { file, root } => cmd_validate(&file, &root).await,
        Command::Config { action, root } => match action {
            ConfigAction::Init => cmd_config_init(&root),
            ConfigAction::Show => cmd_config_show(&root),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_update(pr_number: u64, repo: Option<&str>, root: &Path) -> Result<()> {
    let config = load_config(root)?;
    let run = resolve_run(&config, pr_number, repo, root)?;

    info!(pr_number, repository = %run.repository, "starting Pokédex update");

    let reporter = CliProgress::new();
    let result = run_update(&run, &reporter).await?;

    if result.files_seen == 0 {
        println!();
        println!("  No new submissions in PR #{pr_number}. Nothing to do.");
        println!();
        return Ok(());
    }

    println!();
    println!("  Pokédex updated!");
    println!("  Files seen:     {}", result.files_seen);
    println!("  Entries added:  {}", result.entries_added);
    println!("  Duplicates:     {}", result.duplicates);
    println!("  Skipped:        {}", result.skipped_no_sprite);
    println!("  Dataset total:  {}", result.total_entries);
    println!("  Time:           {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_validate(file: &Path, root: &Path) -> Result<()> {
    let config = load_config(root)?;

    let contribution = parse_submission(file)?;
    let catalog = CatalogClient::new(&config.catalog.base_url, config.catalog.timeout_secs)?;
    let hit = catalog.resolve(&contribution.pokemon_name).await?;

    println!();
    println!("  Submission is valid.");
    println!("  Pokémon:  {} (#{})", contribution.pokemon_name, hit.id);
    match hit.sprite {
        Some(sprite) => println!("  Sprite:   {sprite}"),
        None => println!("  Sprite:   none in the catalog — this entry would be skipped"),
    }
    println!("  Credit:   {}", contribution.submitted_by);
    println!();

    Ok(())
}

fn cmd_config_init(root: &Path) -> Result<()> {
    let path = init_config(root)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(root: &Path) -> Result<()> {
    let config: AppConfig = load_config(root)?;
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

    fn file_processed(&self, path: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Validating [{current}/{total}] {path}"));
    }

    fn done(&self, _result: &UpdateResult) {
        self.spinner.finish_and_clear();
    }
}
