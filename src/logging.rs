//! File logging
//!
//! The terminal belongs to the UI, so log records go to
//! ~/.local/share/todo-tui/todo-tui.log instead of stderr.

use anyhow::{Context, Result};
use log::LevelFilter;
use std::fs;
use std::path::PathBuf;

/// Environment variable selecting the log level (error, warn, info, debug, trace)
pub const LOG_ENV: &str = "TODO_TUI_LOG";

pub fn path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .context("Could not determine data directory")?
        .join("todo-tui");
    Ok(data_dir.join("todo-tui.log"))
}

/// Parse a level name, defaulting to `Info`
pub fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Install the global logger
pub fn init() -> Result<PathBuf> {
    let path = path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {:?}", parent))?;
    }

    let level = level_from(std::env::var(LOG_ENV).ok().as_deref());

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {:<5} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(
            fern::log_file(&path)
                .with_context(|| format!("Failed to open log file {:?}", path))?,
        )
        .apply()
        .context("Logger already initialised")?;

    Ok(path)
}
