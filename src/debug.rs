//! Logging bridge for retrack.
//!
//! Routes every `log::info!()`/`log::warn!()`/... call to a debug log file:
//! `/tmp/retrack_debug.log` on Unix/macOS, `%TEMP%\retrack_debug.log` on
//! Windows. When `RUST_LOG` is set, lines are mirrored to stderr as well.
//!
//! Level precedence: `--log-level` CLI flag, then `RUST_LOG`, then the
//! config file's `log_level` (applied later via [`apply_config_level`]).

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use retrack_config::LogLevel;

struct FileLogger {
    file: Mutex<Option<File>>,
    mirror_stderr: bool,
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.write_all(line.as_bytes());
        }
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<FileLogger> = OnceLock::new();

/// Set once the CLI or environment fixed the level; config must not override it.
static LEVEL_PINNED: AtomicBool = AtomicBool::new(false);

pub fn log_path() -> PathBuf {
    #[cfg(unix)]
    {
        PathBuf::from("/tmp/retrack_debug.log")
    }
    #[cfg(not(unix))]
    {
        std::env::temp_dir().join("retrack_debug.log")
    }
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

fn open_log_file() -> Option<File> {
    // Silently fail if the log file can't be opened; stdout/stderr stay clean.
    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(log_path())
        .ok()?;
    let _ = writeln!(
        file,
        "{}\nretrack session started at {}\n{}",
        "=".repeat(80),
        get_timestamp(),
        "=".repeat(80)
    );
    Some(file)
}

fn is_retrack_target(target: &str) -> bool {
    target == "retrack" || target.starts_with("retrack_") || target.starts_with("retrack::")
}

/// Level for retrack from a `RUST_LOG` value.
///
/// Accepts comma-separated directives, either a bare level (`debug`) or
/// `target=level`. A directive whose target is one of retrack's crates wins
/// over a bare level; directives for other targets are ignored.
pub fn level_from_rust_log(value: &str) -> Option<LogLevel> {
    let mut global = None;
    let mut ours = None;
    for directive in value.split(',').map(str::trim).filter(|d| !d.is_empty()) {
        match directive.split_once('=') {
            Some((target, level)) => {
                if is_retrack_target(target.trim())
                    && let Some(level) = LogLevel::from_name(level)
                {
                    ours = Some(level);
                }
            }
            None => {
                if let Some(level) = LogLevel::from_name(directive) {
                    global = Some(level);
                }
            }
        }
    }
    ours.or(global)
}

/// Install the global logger. Safe to call more than once; only the first
/// call has an effect.
pub fn init_log_bridge(cli_level: Option<LogLevel>) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let env_level = rust_log.as_deref().and_then(level_from_rust_log);
    let level = cli_level.or(env_level).unwrap_or_default();

    let logger = LOGGER.get_or_init(|| FileLogger {
        file: Mutex::new(if level == LogLevel::Off {
            None
        } else {
            open_log_file()
        }),
        mirror_stderr: rust_log.is_some(),
    });
    if log::set_logger(logger).is_err() {
        return;
    }
    log::set_max_level(level.to_level_filter());
    LEVEL_PINNED.store(cli_level.is_some() || env_level.is_some(), Ordering::Relaxed);
}

/// Apply the config file's level unless the CLI or `RUST_LOG` pinned one.
pub fn apply_config_level(level: LogLevel) {
    if LEVEL_PINNED.load(Ordering::Relaxed) {
        return;
    }
    log::set_max_level(level.to_level_filter());
    if level != LogLevel::Off
        && let Some(logger) = LOGGER.get()
    {
        let mut file = logger.file.lock();
        if file.is_none() {
            *file = open_log_file();
        }
    }
}
