//! Global tracing subscriber setup.
//!
//! The TUI owns the terminal, so diagnostics go to a log file. The filter
//! defaults to `codeward=info` and honours `RUST_LOG`.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "codeward=info";

/// What was installed by [`init_global`]
#[derive(Debug, Clone)]
pub struct TracingHandles {
    /// File the subscriber writes to, if logging could be set up
    pub log_path: Option<PathBuf>,
}

/// Default log file location in the system temp dir, one per process
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join(format!("codeward-{}.log", std::process::id()))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber writing to `log_file`.
///
/// Failing to open the log file is not fatal; the editor just runs without
/// logging.
pub fn init_global(log_file: &Path) -> TracingHandles {
    let file = match OpenOptions::new().create(true).append(true).open(log_file) {
        Ok(file) => file,
        Err(e) => {
            eprintln!(
                "Warning: could not open log file {}: {}",
                log_file.display(),
                e
            );
            return TracingHandles { log_path: None };
        }
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file))
        .try_init()
        .is_ok();

    TracingHandles {
        log_path: installed.then(|| log_file.to_path_buf()),
    }
}

/// Install a subscriber writing to stderr, for headless subcommands
pub fn init_stderr(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("codeward=debug")
    } else {
        env_filter()
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
