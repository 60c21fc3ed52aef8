mod cli;
mod logging;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use colored::*;
use datestamp_renamer::config::{self, AppConfig};
use datestamp_renamer::shutdown::{self, ShutdownToken};
use datestamp_renamer::{scanner, sweep, RenameCandidate, RenameExecutor, RenameService};
use dotenv::dotenv;
use tracing::{error, info, warn};

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    let mut config = match config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration, using defaults: {}", err);
            AppConfig::default()
        }
    };
    if let Some(watch_list) = args.watch_list {
        config.watch_list = watch_list;
    }

    match args.command.unwrap_or(Commands::Run) {
        Commands::Run => run_service(&config)?,
        Commands::Sweep => run_sweep(&config)?,
        Commands::Preview => run_preview(&config),
        Commands::PrintConfig => println!("Configuration: {:?}", config),
    }

    Ok(())
}

fn install_shutdown_handler() -> anyhow::Result<ShutdownToken> {
    let (handle, token) = shutdown::channel();
    ctrlc::set_handler(move || {
        info!("Shutdown requested");
        handle.trigger();
    })
    .context("Error installing Ctrl-C handler")?;
    Ok(token)
}

fn run_service(config: &AppConfig) -> anyhow::Result<()> {
    let shutdown = install_shutdown_handler()?;

    let mut service = RenameService::new(config);
    let summary = service.run(&shutdown);

    info!(
        "Startup sweep renamed {}, retries renamed {} over {} sweeps, {} dropped, {} still pending",
        format!("{}", summary.startup.renamed).green(),
        format!("{}", summary.retried_renames).green(),
        summary.retry_sweeps,
        format!("{}", summary.dropped_retries).red(),
        format!("{}", summary.pending_at_shutdown).yellow(),
    );

    Ok(())
}

fn run_sweep(config: &AppConfig) -> anyhow::Result<()> {
    let shutdown = install_shutdown_handler()?;

    let dirs = config::load_watch_dirs_or_empty(&config.watch_list_path());
    let executor = RenameExecutor::new();
    let report = sweep::run_startup_sweep(&dirs, &executor, &shutdown);

    info!(
        "{} renamed, {} failed, {} directories skipped",
        format!("{}", report.renamed).green(),
        format!("{}", report.failed).red(),
        report.skipped_directories,
    );

    let locked = executor.queue().snapshot();
    if !locked.is_empty() {
        warn!(
            "{} files were in use and left unrenamed:",
            format!("{}", locked.len()).yellow()
        );
        for entry in locked {
            warn!("  {}", entry.source.display());
        }
    }

    Ok(())
}

fn run_preview(config: &AppConfig) {
    let dirs = config::load_watch_dirs_or_empty(&config.watch_list_path());
    let mut planned_count = 0usize;

    for dir in &dirs {
        println!("{}", dir.display().to_string().cyan());
        for entry in scanner::list_files(dir) {
            let file = match entry {
                Ok(file) => file,
                Err(err) => {
                    error!("Error listing directory {}: {}", dir.display(), err);
                    break;
                }
            };
            let candidate = RenameCandidate::new(dir, file.name);
            if let Some(planned) = candidate.planned() {
                planned_count += 1;
                println!(
                    "  {} -> {}",
                    candidate.file_name.red(),
                    planned
                        .destination
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default()
                        .green()
                );
            }
        }
    }

    println!("{} files would be renamed", planned_count);
}
