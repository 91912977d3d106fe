// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod report;
pub mod watch;

use std::future::Future;
use std::io;
use std::sync::Arc;

use tokio::io::BufReader;
use tokio::task::JoinError;
use tracing::{error, info, warn};

use crate::cli::CliArgs;
use crate::config::{RawWatchConfig, WatchConfig};
use crate::engine::{run_stdin_loop, CoreDispatcher, Dispatcher, StdinExit};
use crate::errors::Result;
use crate::exec::ShellBackend;
use crate::fs::{FileSystem, RealFileSystem};
use crate::report::Reporter;
use crate::watch::{register_tree, EventFilter, EventSource};

/// Exit status after Ctrl-C, as if terminated by SIGINT.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// How a watch session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnd {
    /// Both trigger sources finished (or nothing was started, as in a dry run).
    Finished,
    /// Ctrl-C was received.
    Interrupted,
}

impl RunEnd {
    pub fn exit_code(self) -> i32 {
        match self {
            RunEnd::Finished => 0,
            RunEnd::Interrupted => INTERRUPTED_EXIT_CODE,
        }
    }
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config validation
/// - event source + startup tree registration
/// - the background dispatcher (startup build, change-triggered builds)
/// - the foreground stdin trigger loop
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<RunEnd> {
    let cfg = WatchConfig::try_from(RawWatchConfig::from_args(&args, "."))?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(RunEnd::Finished);
    }

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    // Canonical root so notify reports absolute paths we can relativize.
    let root = fs
        .canonicalize(cfg.root())
        .unwrap_or_else(|_| cfg.root().clone());

    let (mut source, streams) = EventSource::new()?;
    let watch_set = register_tree(fs.as_ref(), &root, &mut source)?;
    info!(root = ?root, dirs = watch_set.len(), "directory tree registered");

    let reporter = Reporter::stdout(cfg.color());
    let backend = ShellBackend::new(cfg.serialize_builds());

    let core = CoreDispatcher::new(
        EventFilter::new(root.clone(), cfg.ignore().clone()),
        cfg.watch_new_dirs(),
    );
    let dispatcher = Dispatcher::new(
        core,
        streams,
        Box::new(source),
        Arc::clone(&fs),
        backend.clone(),
        reporter.clone(),
        cfg.command(),
    );

    reporter.watching();
    let watch_task = tokio::spawn(dispatcher.run());

    let stdin_loop = run_stdin_loop(
        BufReader::new(tokio::io::stdin()),
        &backend,
        &reporter,
        cfg.command(),
    );

    Ok(supervise(stdin_loop, watch_task, tokio::signal::ctrl_c).await)
}

/// Wait for both trigger sources to end, or for Ctrl-C.
///
/// `ctrl_c` is called once per wakeup. If it fails (no signal handler could
/// be installed), the failure is logged and the session runs on without
/// Ctrl-C handling.
pub async fn supervise<S, W, F, C>(stdin_loop: S, watch_task: W, mut ctrl_c: F) -> RunEnd
where
    S: Future<Output = (StdinExit, u64)>,
    W: Future<Output = std::result::Result<CoreDispatcher, JoinError>>,
    F: FnMut() -> C,
    C: Future<Output = io::Result<()>>,
{
    tokio::pin!(stdin_loop);
    tokio::pin!(watch_task);

    let mut stdin_done = false;
    let mut watch_done = false;
    let mut ctrl_c_armed = true;
    while !(stdin_done && watch_done) {
        tokio::select! {
            (exit, builds) = &mut stdin_loop, if !stdin_done => {
                stdin_done = true;
                info!(?exit, builds, "stdin trigger loop ended");
            }
            res = &mut watch_task, if !watch_done => {
                watch_done = true;
                log_watch_task_end(res);
            }
            res = ctrl_c(), if ctrl_c_armed => match res {
                Ok(()) => {
                    info!("Ctrl-C received, exiting");
                    return RunEnd::Interrupted;
                }
                Err(err) => {
                    warn!(error = %err, "cannot listen for Ctrl-C");
                    ctrl_c_armed = false;
                }
            },
        }
    }

    RunEnd::Finished
}

fn log_watch_task_end(res: std::result::Result<CoreDispatcher, JoinError>) {
    match res {
        Ok(core) => info!(builds = core.builds_started(), "watch loop finished"),
        Err(err) => error!(error = %err, "watch loop task failed"),
    }
}

/// Simple dry-run output: print the effective configuration.
fn print_dry_run(cfg: &WatchConfig) {
    println!("buildwatch dry-run");
    println!("  command: {}", cfg.command());
    println!("  root: {}", cfg.root().display());
    println!("  ignore: {}", cfg.ignore());
    println!("  serialize_builds: {}", cfg.serialize_builds());
    println!("  watch_new_dirs: {}", cfg.watch_new_dirs());
}
