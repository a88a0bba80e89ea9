//! `rdis` entrypoint: wires the command interpreter, the worker pool, and
//! the terminal rendering loop together. Everything interesting — the ELF
//! parser, the scanner, the pipeline, the presentation model — lives
//! below `core-cmd`; this binary only bootstraps and tears them down.

use anyhow::Result;
use clap::Parser;
use core_cmd::Session;
use core_elf::ArchTuple;
use core_pool::Pool;
use core_term::{CrosstermBackend, TerminalBackend};
use core_view::Model;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Disassembly explorer for ELF objects.
#[derive(Parser, Debug)]
#[command(name = "rdis", version, about = "Terminal ELF disassembly explorer")]
struct Args {
    /// Optional ELF object to open at startup.
    path: Option<PathBuf>,

    /// Number of decode worker threads.
    #[arg(long, default_value_t = 4)]
    workers: usize,

    /// Force the architecture tuple instead of auto-detecting from the
    /// ELF's `e_machine` (one of `x86`, `x86_64`, `arm`, `aarch64`).
    #[arg(long)]
    arch: Option<String>,
}

/// Logs an uncaught panic through `tracing` before re-raising it via the
/// previously installed hook, so a crash is visible in `rdis.log` even
/// though the alternate screen swallows anything printed to stderr.
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        error!(target: "runtime", panic = %info, "uncaught_panic");
        previous(info);
    }));
}

fn configure_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = Path::new(".");
    let file_appender = tracing_appender::rolling::never(log_dir, "rdis.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let init = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .try_init();
    if init.is_ok() {
        Some(guard)
    } else {
        None
    }
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();
    let args = Args::parse();

    let arch_override = match args.arch.as_deref() {
        Some(tag) => match ArchTuple::parse_tag(tag) {
            Some(tuple) => tuple,
            None => anyhow::bail!("unrecognized --arch {tag:?} (expected x86, x86_64, arm, or aarch64)"),
        },
        None => ArchTuple::AUTO,
    };

    let pool = Pool::create(args.workers)?;
    let model = Arc::new(Model::create("rdis", "no object loaded"));
    let mut session = Session::new(Arc::clone(&model), pool).with_arch_override(arch_override);

    if let Some(path) = args.path.as_ref() {
        session.execute_line(&format!("open {}", path.display()));
        info!(target: "runtime", path = %path.display(), "startup_open");
    }

    let mut backend = CrosstermBackend::new();
    backend.set_title("rdis")?;
    let _guard = backend.enter_guard()?;

    core_term::run(&mut session)?;
    Ok(())
}
