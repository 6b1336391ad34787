// ============================================================================
// framewatch-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and File Dispatch for the `log` Facade
//
// The core library logs through the `log` macros only. This module installs
// the backend with fern: a colored console dispatch on stderr and, when a log
// directory is given, a plain-text file named after the run's start time.
//
// KEY COMPONENTS:
// - resolve_level: --verbose / --log-level to a LevelFilter
// - init_logging: installs the global logger
// - get_timestamp: timestamp used in log file names

// ---- Internal crate imports ----
use crate::error::CliResult;

// ---- External crate imports ----
use framewatch_core::CoreError;
use log::{Level, LevelFilter};
use owo_colors::OwoColorize;

// ---- Standard library imports ----
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Picks the log level: an explicit level name wins, then `--verbose`.
pub fn resolve_level(verbose: bool, level_name: Option<&str>) -> CliResult<LevelFilter> {
    match level_name {
        Some(name) => name
            .parse::<LevelFilter>()
            .map_err(|_| CoreError::Config(format!("Unknown log level '{name}'"))),
        None if verbose => Ok(LevelFilter::Debug),
        None => Ok(LevelFilter::Info),
    }
}

fn colored_level(level: Level, color: bool) -> String {
    let label = format!("{level:<5}");
    if !color {
        return label;
    }
    match level {
        Level::Error => label.red().bold().to_string(),
        Level::Warn => label.yellow().to_string(),
        Level::Info => label.green().to_string(),
        Level::Debug => label.blue().to_string(),
        Level::Trace => label.dimmed().to_string(),
    }
}

/// Installs the global logger. Returns the log file path when one was opened.
pub fn init_logging(level: LevelFilter, log_dir: Option<&Path>) -> CliResult<Option<PathBuf>> {
    let color = console::colors_enabled_stderr();

    let console_dispatch = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} {} {}",
                chrono::Local::now().format("%H:%M:%S"),
                colored_level(record.level(), color),
                message
            ))
        })
        .chain(std::io::stderr());

    let mut dispatch = fern::Dispatch::new()
        .level(level)
        // ffmpeg-sidecar reports every decoder log line at debug level.
        .level_for("ffmpeg_sidecar", LevelFilter::Warn)
        .chain(console_dispatch);

    let mut log_path = None;
    if let Some(dir) = log_dir {
        fs::create_dir_all(dir).map_err(|e| {
            CoreError::PathError(format!(
                "Failed to create log directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
        let path = dir.join(format!("framewatch_scan_{}.log", get_timestamp()));
        let file = fern::log_file(&path).map_err(|e| {
            CoreError::PathError(format!(
                "Failed to open log file '{}': {}",
                path.display(),
                e
            ))
        })?;
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "[{} {:<5} {}] {}",
                        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                        record.level(),
                        record.target(),
                        message
                    ))
                })
                .chain(file),
        );
        log_path = Some(path);
    }

    dispatch
        .apply()
        .map_err(|e| CoreError::OperationFailed(format!("Failed to initialize logging: {e}")))?;
    Ok(log_path)
}
