//! Doc-Harvest main entry point
//!
//! This is the command-line interface for the Doc-Harvest documentation mirror.

use anyhow::Context;
use clap::{Parser, Subcommand};
use doc_harvest::config::{load_or_default, Config};
use doc_harvest::output::{print_crawl_report, print_store_status};
use doc_harvest::render::HttpRenderer;
use doc_harvest::{status, submit, CrawlRequest};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Doc-Harvest: an incremental documentation mirror
///
/// Doc-Harvest crawls a documentation site from a seed URL, converts each
/// in-scope page to markdown and skips pages already saved by earlier runs.
#[derive(Parser, Debug)]
#[command(name = "doc-harvest")]
#[command(version)]
#[command(about = "An incremental documentation mirror", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a documentation site starting at URL
    Crawl {
        /// Seed URL
        url: String,

        /// Maximum link depth below the seed
        #[arg(short = 'd', long)]
        max_depth: Option<u32>,

        /// Delete previously saved pages and render everything again
        #[arg(short, long)]
        force: bool,

        /// Path prefix links must start with to be followed
        #[arg(long)]
        scope: Option<String>,

        /// Output directory for markdown files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the files currently in the output directory
    Status {
        /// Output directory for markdown files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the configuration and show the effective settings
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = load_or_default(cli.config.as_deref())
        .with_context(|| match &cli.config {
            Some(path) => format!("Failed to load configuration from {}", path.display()),
            None => "Invalid default configuration".to_string(),
        })?;
    if let Some(hash) = &config_hash {
        tracing::info!("Configuration loaded (hash: {})", hash);
    }

    match cli.command {
        Command::Crawl {
            url,
            max_depth,
            force,
            scope,
            output,
            json,
        } => {
            if let Some(scope) = scope {
                config.scope.prefix = scope;
            }
            if let Some(output) = output {
                config.output.directory = output.display().to_string();
            }
            doc_harvest::config::validate(&config).context("Invalid command-line settings")?;
            handle_crawl(&config, url, max_depth, force, json).await
        }
        Command::Status { output, json } => {
            if let Some(output) = output {
                config.output.directory = output.display().to_string();
            }
            handle_status(&config, json)
        }
        Command::CheckConfig => {
            handle_check_config(&config, config_hash.as_deref());
            Ok(())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("doc_harvest=info,warn"),
            1 => EnvFilter::new("doc_harvest=debug,info"),
            2 => EnvFilter::new("doc_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles the crawl command
async fn handle_crawl(
    config: &Config,
    url: String,
    max_depth: Option<u32>,
    force: bool,
    json: bool,
) -> anyhow::Result<()> {
    let renderer = HttpRenderer::new(&config.renderer).context("Failed to set up renderer")?;

    let mut request = CrawlRequest::new(url).with_force(force);
    if let Some(depth) = max_depth {
        request = request.with_max_depth(depth);
    }

    let report = match submit(config, Arc::new(renderer), request).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_crawl_report(&report);
    }

    Ok(())
}

/// Handles the status command
fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let directory = config.output.directory_path();
    let snapshot = status(&directory)
        .with_context(|| format!("Failed to read {}", directory.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("Output directory: {}", directory.display());
        print_store_status(&snapshot);
    }

    Ok(())
}

/// Handles the check-config command
fn handle_check_config(config: &Config, hash: Option<&str>) {
    println!("=== Doc-Harvest Configuration ===\n");

    match hash {
        Some(hash) => println!("Config hash: {}\n", hash),
        None => println!("No config file given, using defaults\n"),
    }

    println!("Crawler:");
    println!("  Default max depth: {}", config.crawler.max_depth);
    println!("  Task timeout: {}ms", config.crawler.task_timeout_ms);
    println!("  Pacing delay: {}ms", config.crawler.pacing_delay_ms);
    println!("  Release timeout: {}ms", config.crawler.release_timeout_ms);

    println!("\nRetry:");
    println!(
        "  Launch: {} attempts, {}ms apart",
        config.retry.launch_attempts, config.retry.launch_delay_ms
    );
    println!(
        "  Load: {} attempts, {}ms apart",
        config.retry.load_attempts, config.retry.load_delay_ms
    );

    println!("\nScope prefix: {}", config.scope.prefix);

    println!("\nRenderer:");
    println!("  User agent: {}", config.renderer.user_agent);
    println!("  Content selector: {}", config.renderer.content_selector);
    println!("  Request timeout: {}ms", config.renderer.request_timeout_ms);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  Failure log: {}", config.output.failure_log_path().display());

    println!("\n✓ Configuration is valid");
}
