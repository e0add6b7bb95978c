// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod pipeline;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_and_validate, ProjectConfig};
use crate::engine::{ControllerEvent, Runtime, WatchController};
use crate::exec::{CommandSteps, SharedSteps};
use crate::pipeline::{run_build, BuildPlan};
use crate::types::BuildStep;
use crate::watch::{spawn_watcher, SourcePatterns, WatchOptions};

/// High-level entry point used by `main.rs`.
///
/// Without `--watch` this is a single build. With `--watch` it is the
/// series "one full build, then watch mode"; a failing initial build never
/// enters watch mode.
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.clone();
    let cfg = load_and_validate(&config_path)?;
    info!(config = ?config_path, watch = args.watch, "project configuration loaded");

    if args.dry_run {
        print_dry_run(&cfg, args.watch);
        return Ok(());
    }

    let root_dir = config_root_dir(&config_path);
    let steps: SharedSteps = Arc::new(CommandSteps::new(config_path, root_dir.clone()));

    run_build(Arc::clone(&steps)).await?;

    if !args.watch {
        return Ok(());
    }

    watch_mode(&cfg, root_dir, steps).await
}

/// Watch the three source patterns under `root` and rebuild affected steps
/// until Ctrl-C.
pub async fn watch_mode(cfg: &ProjectConfig, root: PathBuf, steps: SharedSteps) -> Result<()> {
    let patterns = SourcePatterns::from_config(cfg)?;

    let (tx, rx) = mpsc::channel::<ControllerEvent>(256);

    let options = WatchOptions {
        verbose: cfg.config().verbose,
    };
    let _watcher_handle = spawn_watcher(root, patterns.clone(), options, tx.clone())?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(ControllerEvent::ShutdownRequested).await;
        });
    }

    let controller = WatchController::new(patterns);
    let debounce = Duration::from_millis(cfg.config().debounce_ms);
    let runtime = Runtime::new(controller, rx, tx, steps, debounce);

    runtime.run().await?;
    Ok(())
}

/// Figure out the project root used for step commands and watching.
///
/// - If the config path has a non-empty parent (e.g. "web/Buildwatch.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Buildwatch.toml" (parent = ""),
///   we fall back to the current working directory.
pub fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Print the pipeline and the watched patterns without executing anything.
fn print_dry_run(cfg: &ProjectConfig, watch: bool) {
    println!("buildwatch dry-run");
    println!("  config.debounce_ms = {}", cfg.config().debounce_ms);
    println!("  config.verbose = {}", cfg.config().verbose);
    println!("  watch = {watch}");
    println!();

    let plan = BuildPlan::full();
    println!("pipeline:");
    println!("  1. read project configuration");
    println!("  2. parallel {plan}:");
    for step in plan.steps() {
        println!("      - {step}");
        if let Some(source) = cfg.source_for(step) {
            println!("          source: {source}");
        }
        match cfg.command_for(step) {
            Some(cmd) => println!("          cmd: {cmd}"),
            None => println!("          cmd: (none)"),
        }
    }
    println!("  3. write bundles");
    match cfg.bundle().cmd.as_deref() {
        Some(cmd) => println!("          cmd: {cmd}"),
        None => println!("          cmd: (none)"),
    }

    if watch {
        println!();
        println!("watch selection:");
        for step in BuildStep::ALL {
            match cfg.source_for(step) {
                Some(source) => println!("  {source} -> {step}"),
                None => println!("  (not watched) -> {step}"),
            }
        }
    }

    debug!("dry-run complete (no execution)");
}
