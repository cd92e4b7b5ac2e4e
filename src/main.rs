//! mothball main entry point
//!
//! Command-line interface for the mothball message-group archiver.

use anyhow::bail;
use clap::Parser;
use mothball::config::load_config;
use mothball::planner::ArchiveMode;
use mothball::store::{layout, reorganize_group};
use mothball::{FetchClient, GroupArchiver};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// mothball: an incremental, resumable message-group archiver
///
/// Fetches every message in a numeric message-ID space and writes one JSON
/// file per message, surviving interruption and restart without loss or
/// duplication. Groups are processed sequentially over one shared HTTP
/// session.
#[derive(Parser, Debug)]
#[command(name = "mothball")]
#[command(version)]
#[command(about = "Incremental, resumable message-group archiver", long_about = None)]
struct Cli {
    /// Group names to archive; comma-separated lists are split
    #[arg(value_name = "GROUPS", required = true)]
    groups: Vec<String>,

    /// Archive mode: update, retry, restart, reverse-update or reverse-retry
    #[arg(short, long, default_value = "update")]
    mode: ArchiveMode,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Archive root directory (overrides config)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Also fetch and save message attachments (overrides config)
    #[arg(short, long)]
    attachments: bool,

    /// Do not write per-group <group>.txt run logs
    #[arg(long)]
    no_run_log: bool,

    /// Move existing <id>.json files into year/month directories instead of
    /// archiving
    #[arg(long)]
    reorganize: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(output) = cli.output {
        config.output.root_dir = output;
    }
    if cli.attachments {
        config.output.save_attachments = true;
    }
    if cli.no_run_log {
        config.output.run_log = false;
    }

    // The original interface took "a,b,c" as one argument; keep accepting it.
    let groups: Vec<String> = cli
        .groups
        .iter()
        .flat_map(|g| g.split(','))
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect();
    if groups.is_empty() {
        bail!("no group names given");
    }

    let failures = if cli.reorganize {
        handle_reorganize(&config, &groups)
    } else {
        handle_archive(&config, &groups, cli.mode).await?
    };

    if failures > 0 {
        bail!("{} group(s) failed", failures);
    }
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mothball=info,warn"),
            1 => EnvFilter::new("mothball=debug,info"),
            2 => EnvFilter::new("mothball=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the archive modes: one sequential run per group
///
/// A fatal error in one group is reported and the remaining groups still
/// run; the count of failed groups decides the process exit status.
async fn handle_archive(
    config: &mothball::Config,
    groups: &[String],
    mode: ArchiveMode,
) -> anyhow::Result<u32> {
    // One client, one connection pool, shared by every group in the run.
    let client = FetchClient::new(config)?;
    let api = mothball::client::GroupApi::new(&config.api.base_url)?;

    let mut failures = 0u32;
    for group in groups {
        let mut archiver = GroupArchiver::new(group, &client, &api, config);
        match archiver.archive(mode).await {
            Ok(summary) => {
                tracing::info!(
                    "group '{}': archived {}, not found {}, failed {}",
                    group,
                    summary.archived,
                    summary.not_found,
                    summary.failed
                );
            }
            Err(e) => {
                tracing::error!("group '{}' failed: {}", group, e);
                failures += 1;
            }
        }
    }
    Ok(failures)
}

/// Handles the --reorganize mode: year/month partitioning of existing files
fn handle_reorganize(config: &mothball::Config, groups: &[String]) -> u32 {
    let mut failures = 0u32;
    for group in groups {
        let group_dir = layout::group_dir(&config.output.root_dir, group);
        match reorganize_group(&group_dir) {
            Ok(summary) => {
                tracing::info!(
                    "group '{}': moved {}, skipped {}, failed {}",
                    group,
                    summary.moved,
                    summary.skipped,
                    summary.failed
                );
            }
            Err(e) => {
                tracing::error!("group '{}' reorganize failed: {}", group, e);
                failures += 1;
            }
        }
    }
    failures
}
