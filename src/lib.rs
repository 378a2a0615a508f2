// src/lib.rs

pub mod cli;
pub mod clock;
pub mod config;
pub mod console;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod sched;
pub mod types;
pub mod world;

use std::fs;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::clock::MonotonicClock;
use crate::config::model::MIN_TARGET_FPS;
use crate::config::ConfigFile;
use crate::console::LogKind;
use crate::engine::{Host, Runtime, RuntimeEvent, RuntimeOptions};
use crate::errors::TaskError;
use crate::sched::ScriptCompiler;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and CLI overrides
/// - the host (Lua state, scheduler, world, console)
/// - the startup script, if any
/// - console input and Ctrl-C handling
/// - the frame loop
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = effective_config(&args)?;

    if args.check {
        if let Some(path) = &args.script {
            return check_script(&cfg, path);
        }
    }

    let clock = Rc::new(MonotonicClock::new());
    let host = Host::new(&cfg, clock)?;

    match &args.script {
        Some(path) => {
            info!(path = %path.display(), "script provided; trying to load");
            let id = host
                .run_file(path)
                .with_context(|| format!("failed to load lua script {}", path.display()))?;
            info!(task = %id, "script loaded");
        }
        None => info!("no script provided; pass the path to one to run it"),
    }

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    if cfg.console.enabled {
        host.log(LogKind::Normal, "Type 'help' for a list of commands");
        console::input::spawn_console_reader(rt_tx.clone());
    }

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }
    drop(rt_tx);

    let options = RuntimeOptions {
        exit_when_idle: args.once,
    };

    let runtime = Runtime::new(host, rt_rx, options);
    let host = runtime.run().await?;
    debug!(live_tasks = host.live_task_count(), "host shut down");
    Ok(())
}

/// Resolve the config file and apply CLI overrides on top of it.
fn effective_config(args: &CliArgs) -> Result<ConfigFile> {
    let mut cfg = config::resolve(args.config.as_deref())?;

    if let Some(fps) = args.fps {
        if fps < MIN_TARGET_FPS {
            return Err(TaskError::ConfigError(format!(
                "--fps must be >= {MIN_TARGET_FPS} (got {fps})"
            ))
            .into());
        }
        cfg.scheduler.target_fps = fps;
    }

    if args.no_console {
        cfg.console.enabled = false;
    }

    Ok(cfg)
}

/// `--check`: compile the script with the configured options only.
fn check_script(cfg: &ConfigFile, path: &Path) -> Result<()> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    let compiler = ScriptCompiler::from_config(&cfg.compiler);
    compiler.compile(&source)?;
    println!("{}: ok", path.display());
    Ok(())
}
