// Console + file logging shared by the binaries.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Local;
use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode, WriteLogger};

/// Warnings go to stderr; everything from `Info` up goes to
/// `<log_dir>/<timestamp>_<tool>.log`. Returns the log file path.
pub fn init(log_dir: &Path, tool: &str) -> Result<PathBuf> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("cannot create log directory {}", log_dir.display()))?;

    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let log_path = log_dir.join(format!("{timestamp}_{tool}.log"));
    let file = fs::File::create(&log_path)
        .with_context(|| format!("cannot open log file {}", log_path.display()))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Warn,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), file),
    ])
    .context("failed to initialise logger")?;

    Ok(log_path)
}
